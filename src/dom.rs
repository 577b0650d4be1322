use anyhow::Context as _;
use kuchiki::iter::NodeIterator as _;
use kuchiki::traits::TendrilSink as _;
use kuchiki::{ElementData, NodeDataRef, NodeRef};

pub type Element = NodeDataRef<ElementData>;

#[derive(Clone)]
pub struct Document {
    root: NodeRef,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            root: kuchiki::parse_html().one(html),
        }
    }

    pub fn node(&self) -> &NodeRef {
        &self.root
    }

    pub fn document_element(&self) -> Option<Element> {
        self.root.select_first("html").ok()
    }

    pub fn query(&self, selector: &str) -> Option<Element> {
        query_in(&self.root, selector)
    }

    pub fn query_all(&self, selector: &str) -> Vec<Element> {
        query_all_in(&self.root, selector)
    }

    pub fn element_by_id(&self, id: &str) -> Option<Element> {
        find_by_attr(&self.root, "id", id)
    }

    pub fn to_html(&self) -> anyhow::Result<String> {
        let mut out = Vec::new();
        self.root
            .serialize(&mut out)
            .context("serialize document")?;
        String::from_utf8(out).context("document html not utf-8")
    }
}

pub fn query_in(scope: &NodeRef, selector: &str) -> Option<Element> {
    scope.select_first(selector).ok()
}

pub fn query_all_in(scope: &NodeRef, selector: &str) -> Vec<Element> {
    scope
        .select(selector)
        .map(|nodes| nodes.collect())
        .unwrap_or_default()
}

/// Attribute lookup without building a selector, so ids and values with
/// quotes or brackets still match.
pub fn find_by_attr(scope: &NodeRef, name: &str, value: &str) -> Option<Element> {
    scope
        .descendants()
        .elements()
        .find(|el| el.attributes.borrow().get(name) == Some(value))
}

pub fn attr(el: &ElementData, name: &str) -> Option<String> {
    el.attributes.borrow().get(name).map(|v| v.to_string())
}

pub fn set_attr(el: &ElementData, name: &str, value: impl Into<String>) {
    el.attributes.borrow_mut().insert(name, value.into());
}

pub fn has_class(el: &ElementData, class: &str) -> bool {
    el.attributes
        .borrow()
        .get("class")
        .map(|v| v.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// `classList.toggle(class, on)`.
pub fn toggle_class(el: &ElementData, class: &str, on: bool) {
    let mut attrs = el.attributes.borrow_mut();
    if !on && !attrs.contains("class") {
        return;
    }
    let current = attrs.get("class").unwrap_or("").to_string();
    let mut classes: Vec<&str> = current.split_whitespace().filter(|c| *c != class).collect();
    if on {
        classes.push(class);
    }
    attrs.insert("class", classes.join(" "));
}

pub fn set_text(node: &NodeRef, text: &str) {
    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        child.detach();
    }
    node.append(NodeRef::new_text(text));
}

/// `insertAdjacentHTML('beforeend', ...)`.
pub fn append_html(container: &NodeRef, html: &str) {
    let fragment = kuchiki::parse_html().one(html);
    let Ok(body) = fragment.select_first("body") else {
        return;
    };
    let children: Vec<NodeRef> = body.as_node().children().collect();
    for child in children {
        container.append(child);
    }
}

pub fn closest(node: &NodeRef, pred: impl Fn(&ElementData) -> bool) -> Option<Element> {
    node.inclusive_ancestors()
        .elements()
        .find(|el| pred(el))
}

pub fn is_inside(node: &NodeRef, scope: &NodeRef) -> bool {
    node.inclusive_ancestors().any(|n| n == *scope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_class_adds_and_removes() {
        let doc = Document::parse(r#"<html class="js"><body></body></html>"#);
        let root = doc.document_element().unwrap();
        toggle_class(&root, "dark", true);
        assert!(has_class(&root, "dark"));
        assert!(has_class(&root, "js"));
        toggle_class(&root, "dark", true);
        assert_eq!(attr(&root, "class").as_deref(), Some("js dark"));
        toggle_class(&root, "dark", false);
        assert!(!has_class(&root, "dark"));
        assert_eq!(attr(&root, "class").as_deref(), Some("js"));
    }

    #[test]
    fn append_html_moves_fragment_children() {
        let doc = Document::parse(r#"<div id="list"><p>old</p></div>"#);
        let list = doc.element_by_id("list").unwrap();
        append_html(list.as_node(), "<span>a</span><span>b</span>");
        let spans = query_all_in(list.as_node(), "span");
        assert_eq!(spans.len(), 2);
        assert_eq!(list.as_node().children().count(), 3);
    }

    #[test]
    fn find_by_attr_matches_quoted_values() {
        let doc = Document::parse(r#"<div data-app='a"b'></div>"#);
        assert!(find_by_attr(doc.node(), "data-app", "a\"b").is_some());
        assert!(find_by_attr(doc.node(), "data-app", "ab").is_none());
    }
}
