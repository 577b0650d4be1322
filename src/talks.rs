use kuchiki::NodeRef;

use crate::dom;
use crate::model::Talk;
use crate::render;

pub const TALKS_PATH: &str = "data/talks.json";

/// Append every talk to `container`; talks are not de-duplicated.
pub fn insert_talks(container: &NodeRef, talks: &[Talk]) -> usize {
    for talk in talks {
        if talk.videos.is_empty() {
            tracing::warn!(talk = %talk.id, "talk has no videos; rendering without a frame");
        }
        dom::append_html(container, &render::talk_article(talk).into_string());
    }
    talks.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn repeated_insert_appends_again() {
        let doc = Document::parse(r#"<div id="talksList"></div>"#);
        let list = doc.element_by_id("talksList").unwrap();
        let talks: Vec<Talk> = serde_json::from_str(
            r#"[{"id": "t", "title": "T", "videos": [{"embed": "https://v/1", "label": "A"}]}]"#,
        )
        .unwrap();

        insert_talks(list.as_node(), &talks);
        insert_talks(list.as_node(), &talks);
        assert_eq!(dom::query_all_in(list.as_node(), "article.talk").len(), 2);
    }

    #[test]
    fn talk_without_videos_has_no_frame() {
        let doc = Document::parse(r#"<div id="talksList"></div>"#);
        let list = doc.element_by_id("talksList").unwrap();
        let talks: Vec<Talk> = serde_json::from_str(r#"[{"id": "t", "title": "T"}]"#).unwrap();

        assert_eq!(insert_talks(list.as_node(), &talks), 1);
        assert!(dom::query_in(list.as_node(), "iframe").is_none());
        assert!(dom::query_in(list.as_node(), "button.toggle-abstract").is_some());
    }
}
