use crate::dom::{Document, Element};
use crate::scroll_spy::SECTION_IDS;

/// Optional page elements, resolved once at boot. A missing handle
/// disables the feature that needs it.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub root: Option<Element>,
    pub theme_toggle: Option<Element>,
    pub home_apps: Option<Element>,
    pub apps_list: Option<Element>,
    pub home_talks: Option<Element>,
    pub talks_list: Option<Element>,
    pub year: Option<Element>,
    pub nav_links: Vec<Element>,
    pub sections: Vec<Element>,
}

impl Capabilities {
    pub fn probe(document: &Document) -> Self {
        let caps = Self {
            root: document.document_element(),
            theme_toggle: document.element_by_id("themeToggle"),
            home_apps: document.element_by_id("homeApps"),
            apps_list: document.element_by_id("appsList"),
            home_talks: document.element_by_id("homeTalks"),
            talks_list: document.element_by_id("talksList"),
            year: document.element_by_id("year"),
            nav_links: document.query_all(".nav a[data-nav]"),
            sections: SECTION_IDS
                .iter()
                .filter_map(|id| document.element_by_id(id))
                .collect(),
        };
        tracing::debug!(
            theme_toggle = caps.theme_toggle.is_some(),
            apps = caps.wants_apps(),
            talks = caps.wants_talks(),
            nav_links = caps.nav_links.len(),
            sections = caps.sections.len(),
            "probed page capabilities"
        );
        caps
    }

    pub fn app_containers(&self) -> Vec<Element> {
        [&self.home_apps, &self.apps_list]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    pub fn talk_containers(&self) -> Vec<Element> {
        [&self.home_talks, &self.talks_list]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    pub fn wants_apps(&self) -> bool {
        self.home_apps.is_some() || self.apps_list.is_some()
    }

    pub fn wants_talks(&self) -> bool {
        self.home_talks.is_some() || self.talks_list.is_some()
    }

    pub fn section_ids(&self) -> Vec<String> {
        self.sections
            .iter()
            .filter_map(|s| crate::dom::attr(s, "id"))
            .collect()
    }
}
