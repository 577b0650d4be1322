use chrono::Datelike as _;
use kuchiki::NodeRef;
use serde::de::DeserializeOwned;
use url::Url;

use crate::apps::{APPS_PATH, insert_apps};
use crate::base_path;
use crate::capability::Capabilities;
use crate::dom::{self, Document};
use crate::fetcher::DataSource;
use crate::model::{App, Talk};
use crate::scroll_spy::{self, ScrollSpy, SectionBox, SpyMode, Viewport};
use crate::storage::Storage;
use crate::talks::{TALKS_PATH, insert_talks};
use crate::theme::{Theme, ThemeController, ThemeView};
use crate::widgets::{self, Action, Key};

#[derive(Debug, Clone)]
pub struct PageOptions {
    pub page_url: Url,
    pub prefers_dark: bool,
    pub intersection_observer: bool,
    pub year: Option<i32>,
}

impl PageOptions {
    pub fn new(page_url: Url) -> Self {
        Self {
            page_url,
            prefers_dark: false,
            intersection_observer: true,
            year: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub cards: usize,
    pub talks: usize,
    pub failures: usize,
}

pub struct Page {
    document: Document,
    caps: Capabilities,
    theme: ThemeController,
    base_path: String,
    spy: ScrollSpy,
    year: Option<i32>,
    focused: Option<NodeRef>,
    abstract_scopes: Vec<NodeRef>,
    tablists: Vec<NodeRef>,
}

fn theme_view(caps: &Capabilities) -> ThemeView<'_> {
    ThemeView {
        root: caps.root.as_ref(),
        toggle: caps.theme_toggle.as_ref(),
    }
}

async fn fetch_if<T: DeserializeOwned>(
    wanted: bool,
    source: &DataSource,
    base: &str,
    path: &str,
) -> Option<anyhow::Result<Vec<T>>> {
    if !wanted {
        return None;
    }
    Some(source.load(base, path).await)
}

impl Page {
    pub fn new(document: Document, options: PageOptions, storage: Box<dyn Storage>) -> Self {
        let caps = Capabilities::probe(&document);
        let base_path = base_path::resolve_base_path(&document, &options.page_url);
        let mode = if options.intersection_observer && !caps.sections.is_empty() {
            SpyMode::Observer
        } else {
            SpyMode::ScrollProbe
        };
        let spy = ScrollSpy::new(mode, caps.section_ids());

        Self {
            document,
            caps,
            theme: ThemeController::new(storage, options.prefers_dark),
            base_path,
            spy,
            year: options.year,
            focused: None,
            abstract_scopes: Vec::new(),
            tablists: Vec::new(),
        }
    }

    pub fn parse(html: &str, options: PageOptions, storage: Box<dyn Storage>) -> Self {
        Self::new(Document::parse(html), options, storage)
    }

    pub fn boot(&mut self) {
        let theme = self.theme.init(&theme_view(&self.caps));
        self.stamp_year();
        tracing::info!(
            base_path = %self.base_path,
            theme = theme.as_str(),
            scroll_spy = ?self.spy.mode(),
            "page booted"
        );
    }

    fn stamp_year(&self) {
        if let Some(el) = &self.caps.year {
            let year = self.year.unwrap_or_else(|| chrono::Local::now().year());
            dom::set_text(el.as_node(), &year.to_string());
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn applied_theme(&self) -> Theme {
        theme_view(&self.caps).applied()
    }

    pub fn active_section(&self) -> &str {
        self.spy.active()
    }

    pub fn focused(&self) -> Option<&NodeRef> {
        self.focused.as_ref()
    }

    pub fn to_html(&self) -> anyhow::Result<String> {
        self.document.to_html()
    }

    pub fn toggle_theme(&mut self) -> Option<Theme> {
        self.caps.theme_toggle.as_ref()?;
        Some(self.theme.toggle(&theme_view(&self.caps)))
    }

    pub fn scheme_changed(&mut self, prefers_dark: bool) -> Option<Theme> {
        self.theme.scheme_changed(prefers_dark, &theme_view(&self.caps))
    }

    pub fn click(&mut self, target: &NodeRef) -> bool {
        let on_toggle = self
            .caps
            .theme_toggle
            .as_ref()
            .is_some_and(|toggle| dom::is_inside(target, toggle.as_node()));
        if on_toggle {
            return self.toggle_theme().is_some();
        }

        let Some(el) = target.clone().into_element_ref() else {
            return false;
        };
        match Action::of(target) {
            Some(Action::SelectTab) => {
                let Some(tablist) = widgets::owning_tablist(target) else {
                    return false;
                };
                if !self.tablists.contains(&tablist) {
                    return false;
                }
                widgets::switch_tab(&el, &tablist);
                self.focused = Some(target.clone());
                true
            }
            Some(Action::ToggleAbstract) => {
                if !self
                    .abstract_scopes
                    .iter()
                    .any(|scope| dom::is_inside(target, scope))
                {
                    return false;
                }
                widgets::toggle_abstract(&self.document, &el);
                true
            }
            None => false,
        }
    }

    pub fn focus(&mut self, target: &NodeRef) {
        self.focused = Some(target.clone());
    }

    /// Key press on the focused element. Returns whether the default action
    /// would be prevented.
    pub fn key_down(&mut self, key: Key) -> bool {
        let Some(focused) = self.focused.clone() else {
            return false;
        };
        let Some(tablist) = widgets::owning_tablist(&focused) else {
            return false;
        };
        if !self.tablists.contains(&tablist) {
            return false;
        }
        let buttons = widgets::tab_buttons(&tablist);
        let Some(idx) = buttons.iter().position(|b| *b.as_node() == focused) else {
            return false;
        };

        match key {
            Key::Enter | Key::Space => {
                widgets::switch_tab(&buttons[idx], &tablist);
                true
            }
            _ => match widgets::next_focus(buttons.len(), idx, key) {
                Some(next) => {
                    self.focused = Some(buttons[next].as_node().clone());
                    true
                }
                None => false,
            },
        }
    }

    pub fn viewport_changed(&mut self, viewport: Viewport, boxes: &[SectionBox]) -> Option<String> {
        let changed = self.spy.update(viewport, boxes)?;
        scroll_spy::highlight_nav(&self.caps.nav_links, &changed);
        Some(changed)
    }

    pub fn render_apps(&mut self, apps: &[App]) -> usize {
        let mut inserted = 0;
        for container in self.caps.app_containers() {
            inserted += insert_apps(container.as_node(), apps, &self.base_path);
        }
        tracing::info!(records = apps.len(), inserted, "rendered apps");
        inserted
    }

    pub fn render_talks(&mut self, talks: &[Talk]) -> usize {
        let mut inserted = 0;
        for container in self.caps.talk_containers() {
            inserted += insert_talks(container.as_node(), talks);
        }
        let wired: Vec<NodeRef> = [&self.caps.talks_list, &self.caps.home_talks]
            .into_iter()
            .flatten()
            .map(|el| el.as_node().clone())
            .collect();
        for scope in wired {
            self.wire(scope);
        }
        tracing::info!(records = talks.len(), inserted, "rendered talks");
        inserted
    }

    fn wire(&mut self, scope: NodeRef) {
        for tablist in widgets::tablists_in(&scope) {
            if !self.tablists.contains(&tablist) {
                self.tablists.push(tablist);
            }
        }
        if !self.abstract_scopes.contains(&scope) {
            self.abstract_scopes.push(scope);
        }
    }

    pub async fn load_data(&mut self, source: &DataSource) -> LoadReport {
        let base = self.base_path.clone();
        let (apps, talks) = tokio::join!(
            fetch_if::<App>(self.caps.wants_apps(), source, &base, APPS_PATH),
            fetch_if::<Talk>(self.caps.wants_talks(), source, &base, TALKS_PATH),
        );

        let mut report = LoadReport::default();
        match apps {
            Some(Ok(apps)) => report.cards = self.render_apps(&apps),
            Some(Err(err)) => {
                tracing::error!(error = %format!("{err:#}"), "apps load failed");
                report.failures += 1;
            }
            None => {}
        }
        match talks {
            Some(Ok(talks)) => report.talks = self.render_talks(&talks),
            Some(Err(err)) => {
                tracing::error!(error = %format!("{err:#}"), "talks load failed");
                report.failures += 1;
            }
            None => {}
        }
        report
    }
}
