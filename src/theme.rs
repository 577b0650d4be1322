use crate::dom::{self, Element};
use crate::storage::{Storage, THEME_KEY};

pub const DARK_CLASS: &str = "dark";
pub const DARK_GLYPH: &str = "🌙";
pub const LIGHT_GLYPH: &str = "🌞";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Any stored value other than `dark` means light.
    pub fn from_stored(value: &str) -> Self {
        if value == "dark" { Theme::Dark } else { Theme::Light }
    }

    pub fn from_scheme(prefers_dark: bool) -> Self {
        if prefers_dark { Theme::Dark } else { Theme::Light }
    }

    pub fn opposite(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Theme::Light => LIGHT_GLYPH,
            Theme::Dark => DARK_GLYPH,
        }
    }
}

pub struct ThemeView<'a> {
    pub root: Option<&'a Element>,
    pub toggle: Option<&'a Element>,
}

impl ThemeView<'_> {
    pub fn apply(&self, theme: Theme) {
        if let Some(root) = self.root {
            dom::toggle_class(root, DARK_CLASS, theme == Theme::Dark);
        }
        if let Some(toggle) = self.toggle {
            dom::set_text(toggle.as_node(), theme.glyph());
        }
    }

    pub fn applied(&self) -> Theme {
        match self.root {
            Some(root) if dom::has_class(root, DARK_CLASS) => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

pub struct ThemeController {
    storage: Box<dyn Storage>,
    prefers_dark: bool,
}

impl ThemeController {
    pub fn new(storage: Box<dyn Storage>, prefers_dark: bool) -> Self {
        Self {
            storage,
            prefers_dark,
        }
    }

    pub fn stored(&self) -> Option<Theme> {
        self.storage
            .get_item(THEME_KEY)
            .filter(|v| !v.is_empty())
            .map(|v| Theme::from_stored(&v))
    }

    pub fn resolve(&self) -> Theme {
        self.stored()
            .unwrap_or_else(|| Theme::from_scheme(self.prefers_dark))
    }

    pub fn init(&self, view: &ThemeView<'_>) -> Theme {
        let theme = self.resolve();
        view.apply(theme);
        tracing::debug!(
            theme = theme.as_str(),
            stored = self.stored().is_some(),
            "theme initialized"
        );
        theme
    }

    pub fn toggle(&mut self, view: &ThemeView<'_>) -> Theme {
        let next = view.applied().opposite();
        if let Err(err) = self.storage.set_item(THEME_KEY, next.as_str()) {
            tracing::warn!(error = %format!("{err:#}"), "failed to persist theme preference");
        }
        view.apply(next);
        next
    }

    /// OS colour scheme changed; only followed while nothing is stored.
    pub fn scheme_changed(&mut self, prefers_dark: bool, view: &ThemeView<'_>) -> Option<Theme> {
        self.prefers_dark = prefers_dark;
        if self.stored().is_some() {
            return None;
        }
        let theme = Theme::from_scheme(prefers_dark);
        view.apply(theme);
        Some(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::storage::MemoryStorage;

    fn page() -> Document {
        Document::parse(r#"<html><body><button id="themeToggle">?</button></body></html>"#)
    }

    #[test]
    fn os_dark_without_preference_applies_dark() {
        let doc = page();
        let root = doc.document_element().unwrap();
        let toggle = doc.element_by_id("themeToggle").unwrap();
        let view = ThemeView {
            root: Some(&root),
            toggle: Some(&toggle),
        };

        let mut controller = ThemeController::new(Box::new(MemoryStorage::default()), true);
        assert_eq!(controller.init(&view), Theme::Dark);
        assert!(dom::has_class(&root, DARK_CLASS));
        assert_eq!(toggle.as_node().text_contents(), DARK_GLYPH);

        assert_eq!(controller.toggle(&view), Theme::Light);
        assert_eq!(toggle.as_node().text_contents(), LIGHT_GLYPH);
        assert_eq!(controller.toggle(&view), Theme::Dark);
        assert_eq!(controller.stored(), Some(Theme::Dark));
        assert!(dom::has_class(&root, DARK_CLASS));
    }

    #[test]
    fn stored_preference_ignores_scheme_changes() {
        let doc = page();
        let root = doc.document_element().unwrap();
        let view = ThemeView {
            root: Some(&root),
            toggle: None,
        };

        let mut controller =
            ThemeController::new(Box::new(MemoryStorage::with_item(THEME_KEY, "light")), false);
        controller.init(&view);
        assert_eq!(controller.scheme_changed(true, &view), None);
        assert_eq!(view.applied(), Theme::Light);
    }

    #[test]
    fn scheme_changes_tracked_until_first_toggle() {
        let doc = page();
        let root = doc.document_element().unwrap();
        let view = ThemeView {
            root: Some(&root),
            toggle: None,
        };

        let mut controller = ThemeController::new(Box::new(MemoryStorage::default()), false);
        controller.init(&view);
        assert_eq!(controller.scheme_changed(true, &view), Some(Theme::Dark));
        assert_eq!(view.applied(), Theme::Dark);

        controller.toggle(&view);
        assert_eq!(controller.scheme_changed(true, &view), None);
        assert_eq!(view.applied(), Theme::Light);
    }

    #[test]
    fn unknown_stored_value_is_light() {
        let controller =
            ThemeController::new(Box::new(MemoryStorage::with_item(THEME_KEY, "sepia")), true);
        assert_eq!(controller.resolve(), Theme::Light);

        let empty = ThemeController::new(Box::new(MemoryStorage::with_item(THEME_KEY, "")), true);
        assert_eq!(empty.resolve(), Theme::Dark);
    }
}
