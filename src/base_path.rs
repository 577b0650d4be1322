use anyhow::Context as _;
use url::Url;

use crate::dom::{self, Document};

pub const SCRIPT_SUFFIX: &str = "assets/js/main.js";

pub const ROOT: &str = "/";

/// Base path the site is served under (`/` at a domain root, `/Project/`
/// for project-page hosting). Never fails: anything unexpected yields `/`.
pub fn resolve_base_path(document: &Document, page_url: &Url) -> String {
    let selector = format!("script[src*=\"{SCRIPT_SUFFIX}\"]");
    let Some(script) = document.query(&selector) else {
        tracing::debug!("page script not found; using root base path");
        return ROOT.to_string();
    };
    let Some(src) = dom::attr(&script, "src") else {
        return ROOT.to_string();
    };
    match base_from_script_src(page_url, &src) {
        Ok(base) => base,
        Err(err) => {
            tracing::debug!(%src, error = %format!("{err:#}"), "base path fallback");
            ROOT.to_string()
        }
    }
}

pub fn base_from_script_src(page_url: &Url, src: &str) -> anyhow::Result<String> {
    let url = page_url
        .join(src)
        .with_context(|| format!("resolve script src {src}"))?;
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();
    match segments.iter().position(|seg| *seg == "assets") {
        Some(idx) if idx > 0 => Ok(format!("/{}/", segments[..idx].join("/"))),
        _ => Ok(ROOT.to_string()),
    }
}

pub fn join_base(base: &str, path: &str) -> String {
    let rel = path.strip_prefix('/').unwrap_or(path);
    format!("{base}{rel}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(src: &str) -> Document {
        Document::parse(&format!(
            r#"<html><head><script src="{src}" defer></script></head><body></body></html>"#
        ))
    }

    #[test]
    fn root_hosting() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(resolve_base_path(&page("assets/js/main.js"), &url), "/");
        assert_eq!(resolve_base_path(&page("/assets/js/main.js"), &url), "/");
    }

    #[test]
    fn project_page_hosting() {
        let url = Url::parse("https://user.github.io/NowakApps/talks.html").unwrap();
        assert_eq!(
            resolve_base_path(&page("assets/js/main.js"), &url),
            "/NowakApps/"
        );
        assert_eq!(
            resolve_base_path(&page("/NowakApps/assets/js/main.js"), &url),
            "/NowakApps/"
        );

        let nested = Url::parse("https://user.github.io/a/b/apps/index.html").unwrap();
        assert_eq!(
            resolve_base_path(&page("../assets/js/main.js"), &nested),
            "/a/b/"
        );
    }

    #[test]
    fn missing_script_defaults_to_root() {
        let url = Url::parse("https://user.github.io/NowakApps/").unwrap();
        let doc = Document::parse("<html><body><p>no scripts</p></body></html>");
        assert_eq!(resolve_base_path(&doc, &url), "/");
        assert_eq!(resolve_base_path(&page("js/other.js"), &url), "/");
    }

    #[test]
    fn join_strips_one_leading_slash() {
        assert_eq!(join_base("/", "/apps/x.html"), "/apps/x.html");
        assert_eq!(join_base("/Site/", "img/logo.png"), "/Site/img/logo.png");
        assert_eq!(join_base("/Site/", "//cdn"), "/Site//cdn");
    }
}
