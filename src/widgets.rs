use kuchiki::NodeRef;

use crate::dom::{self, Document, Element};

pub const ACTION_ATTR: &str = "data-action";
pub const EXPAND_LABEL: &str = "Expand";
pub const COLLAPSE_LABEL: &str = "Collapse";
pub const HIDDEN_CLASS: &str = "hidden";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleAbstract,
    SelectTab,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::ToggleAbstract => "toggle-abstract",
            Action::SelectTab => "select-tab",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "toggle-abstract" => Some(Action::ToggleAbstract),
            "select-tab" => Some(Action::SelectTab),
            _ => None,
        }
    }

    pub fn of(node: &NodeRef) -> Option<Self> {
        let el = node.as_element()?;
        Self::parse(&dom::attr(el, ACTION_ATTR)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    Home,
    End,
    Enter,
    Space,
    Other,
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowRight" => Key::ArrowRight,
            "ArrowLeft" => Key::ArrowLeft,
            "Home" => Key::Home,
            "End" => Key::End,
            "Enter" => Key::Enter,
            " " | "Space" | "Spacebar" => Key::Space,
            _ => Key::Other,
        }
    }
}

pub fn tablists_in(scope: &NodeRef) -> Vec<NodeRef> {
    dom::query_all_in(scope, ".tablist")
        .into_iter()
        .map(|el| el.as_node().clone())
        .collect()
}

pub fn tab_buttons(tablist: &NodeRef) -> Vec<Element> {
    dom::query_all_in(tablist, "button")
}

pub fn owning_tablist(button: &NodeRef) -> Option<NodeRef> {
    let parent = button.parent()?;
    let el = parent.as_element()?;
    dom::has_class(el, "tablist").then_some(parent)
}

pub fn next_focus(len: usize, current: usize, key: Key) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match key {
        Key::ArrowRight => Some((current + 1) % len),
        Key::ArrowLeft => Some((current + len - 1) % len),
        Key::Home => Some(0),
        Key::End => Some(len - 1),
        _ => None,
    }
}

pub fn switch_tab(button: &Element, tablist: &NodeRef) {
    for other in tab_buttons(tablist) {
        dom::set_attr(&other, "aria-selected", "false");
        dom::set_attr(&other, "tabindex", "-1");
    }
    dom::set_attr(button, "aria-selected", "true");
    dom::set_attr(button, "tabindex", "0");

    let Some(talk) = dom::closest(tablist, |el| dom::has_class(el, "talk")) else {
        return;
    };
    let Some(embed) = dom::attr(button, "data-embed") else {
        return;
    };
    if let Some(frame) = dom::query_in(talk.as_node(), "iframe") {
        dom::set_attr(&frame, "src", embed);
    }
}

pub fn toggle_abstract(document: &Document, button: &Element) -> bool {
    let expanded = dom::attr(button, "aria-expanded").as_deref() == Some("true");
    dom::set_attr(button, "aria-expanded", (!expanded).to_string());
    if let Some(panel) = dom::attr(button, "aria-controls")
        .and_then(|id| document.element_by_id(&id))
    {
        dom::toggle_class(&panel, HIDDEN_CLASS, expanded);
    }
    dom::set_text(
        button.as_node(),
        if expanded { EXPAND_LABEL } else { COLLAPSE_LABEL },
    );
    !expanded
}
