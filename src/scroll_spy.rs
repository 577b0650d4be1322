use std::collections::HashSet;

use crate::dom::{self, Element};

pub const SECTION_IDS: [&str; 3] = ["home", "apps", "talks"];
pub const DEFAULT_ACTIVE: &str = "home";
pub const ACTIVE_CLASS: &str = "active";

// viewport minus 40% at the top and 50% at the bottom
const BAND_TOP: f64 = 0.40;
const BAND_BOTTOM: f64 = 0.50;
const PROBE_RATIO: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpyMode {
    Observer,
    ScrollProbe,
}

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub scroll_y: f64,
    pub inner_height: f64,
}

#[derive(Debug, Clone)]
pub struct SectionBox {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBox {
    pub fn new(id: &str, top: f64, height: f64) -> Self {
        Self {
            id: id.to_string(),
            top,
            height,
        }
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub id: String,
    pub is_intersecting: bool,
}

#[derive(Debug)]
pub struct ScrollSpy {
    mode: SpyMode,
    active: String,
    sections: Vec<String>,
    intersecting: HashSet<String>,
    observed: bool,
}

impl ScrollSpy {
    pub fn new(mode: SpyMode, sections: Vec<String>) -> Self {
        Self {
            mode,
            active: DEFAULT_ACTIVE.to_string(),
            sections,
            intersecting: HashSet::new(),
            observed: false,
        }
    }

    pub fn mode(&self) -> SpyMode {
        self.mode
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn set_active(&mut self, id: &str) -> bool {
        if id == self.active {
            return false;
        }
        self.active = id.to_string();
        true
    }

    /// Entries in section order for tracked sections whose band intersection
    /// changed since the last call; the first call reports every section.
    pub fn observe(
        &mut self,
        viewport: Viewport,
        boxes: &[SectionBox],
    ) -> Vec<IntersectionEntry> {
        let band_top = viewport.scroll_y + viewport.inner_height * BAND_TOP;
        let band_bottom = viewport.scroll_y + viewport.inner_height * (1.0 - BAND_BOTTOM);
        let first = !self.observed;
        self.observed = true;

        let mut entries = Vec::new();
        for id in &self.sections {
            let Some(section) = boxes.iter().find(|b| b.id == *id) else {
                continue;
            };
            let now = section.top < band_bottom && section.bottom() > band_top;
            let before = self.intersecting.contains(id);
            if first || now != before {
                entries.push(IntersectionEntry {
                    id: id.clone(),
                    is_intersecting: now,
                });
            }
            if now {
                self.intersecting.insert(id.clone());
            } else {
                self.intersecting.remove(id);
            }
        }
        entries
    }

    pub fn on_entries(&mut self, entries: &[IntersectionEntry]) -> Option<String> {
        let mut changed = false;
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            changed |= self.set_active(&entry.id);
        }
        changed.then(|| self.active.clone())
    }

    pub fn on_scroll(&mut self, viewport: Viewport, boxes: &[SectionBox]) -> Option<String> {
        let probe = viewport.scroll_y + viewport.inner_height * PROBE_RATIO;
        let hit = boxes
            .iter()
            .filter(|b| self.sections.contains(&b.id))
            .find(|b| b.top <= probe && b.bottom() > probe)?;
        let id = hit.id.clone();
        self.set_active(&id).then_some(id)
    }

    pub fn update(&mut self, viewport: Viewport, boxes: &[SectionBox]) -> Option<String> {
        match self.mode {
            SpyMode::Observer => {
                let entries = self.observe(viewport, boxes);
                self.on_entries(&entries)
            }
            SpyMode::ScrollProbe => self.on_scroll(viewport, boxes),
        }
    }
}

pub fn highlight_nav(links: &[Element], id: &str) {
    let target = format!("#{id}");
    for link in links {
        let on = dom::attr(link, "href").as_deref() == Some(target.as_str());
        dom::toggle_class(link, ACTIVE_CLASS, on);
    }
}
