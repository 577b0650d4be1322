use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct App {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub links: AppLinks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppLinks {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub play: Option<String>,
    #[serde(default)]
    pub appstore: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Talk {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub abstract_short: String,
    #[serde(default)]
    pub abstract_long: String,
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub downloads: Vec<Download>,
    #[serde(default)]
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub embed: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Download {
    pub url: String,
    #[serde(default)]
    pub label: String,
}

impl Download {
    /// `#` marks a download that is announced but not published yet.
    pub fn is_placeholder(&self) -> bool {
        self.url == "#"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn talk_uses_camel_case_keys() {
        let talk: Talk = serde_json::from_str(
            r#"{
  "id": "rust-intro",
  "title": "Intro",
  "audience": "Beginners",
  "abstractShort": "short",
  "abstractLong": "long",
  "videos": [{"embed": "https://video.example/1", "label": "EN"}]
}"#,
        )
        .unwrap();
        assert_eq!(talk.abstract_short, "short");
        assert_eq!(talk.abstract_long, "long");
        assert_eq!(talk.videos.len(), 1);
        assert!(talk.downloads.is_empty());
        assert!(talk.events.is_empty());
    }

    #[test]
    fn app_optional_fields_default() {
        let app: App = serde_json::from_str(r#"{"id": "x", "name": "Ann Bob"}"#).unwrap();
        assert!(app.tech.is_empty());
        assert!(app.links.page.is_none());
        assert!(app.logo.is_none());
        assert_eq!(app.description, "");
    }
}
