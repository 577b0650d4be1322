use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::base_path::{SCRIPT_SUFFIX, join_base};
use crate::builtin;
use crate::model::{App, AppLinks, Talk};
use crate::theme::LIGHT_GLYPH;
use crate::widgets::{Action, EXPAND_LABEL};

const NAV: [(&str, &str); 3] = [("home", "Home"), ("apps", "Apps"), ("talks", "Talks")];

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "APP".to_string()
    } else {
        letters
    }
}

fn secondary_links(links: &AppLinks) -> Vec<(&'static str, &str)> {
    [
        ("Play", present(&links.play)),
        ("App\u{a0}Store", present(&links.appstore)),
        ("GitHub", present(&links.github)),
    ]
    .into_iter()
    .filter_map(|(label, href)| href.map(|h| (label, h)))
    .collect()
}

fn logo_badge(app: &App, base: &str) -> Markup {
    html! {
        @if let Some(logo) = present(&app.logo) {
            img src=(join_base(base, logo)) class="card-logo"
                alt=(format!("{} logo", app.name)) loading="lazy";
        } @else {
            span aria-hidden="true" style="font-weight:600;font-size:.8rem;letter-spacing:.5px;" {
                (initials(&app.name))
            }
        }
    }
}

pub fn app_card(app: &App, base: &str) -> Markup {
    let primary_href = present(&app.links.page)
        .map(|page| join_base(base, page))
        .unwrap_or_else(|| "#".to_string());
    let banner = present(&app.banner);
    let banner_style = banner.map(|b| format!("background-image:url('{}')", join_base(base, b)));
    let media_class = if banner.is_some() {
        "card-media banner"
    } else {
        "card-media"
    };
    let actions = secondary_links(&app.links);

    html! {
        article class="card" data-app=(app.id) {
            a class="card-link" href=(primary_href) {
                div class=(media_class)
                    aria-label=(format!("{} marketing banner", app.name))
                    style=[banner_style] {
                    @if banner.is_some() {
                        span class="card-media-label" { "App" }
                    } @else {
                        (app.name)
                    }
                }
                div class="card-body" {
                    div class="app-header-line" {
                        div class="app-logo-box" { (logo_badge(app, base)) }
                        div class="app-title-wrap" {
                            h3 { (app.name) }
                            @if let Some(tagline) = present(&app.tagline) {
                                p class="app-tagline" { (tagline) }
                            }
                        }
                    }
                    p { (app.description) }
                    div class="tech-tags" {
                        @for tech in &app.tech {
                            span { (tech) }
                        }
                    }
                }
            }
            @if !actions.is_empty() {
                div class="card-actions" {
                    @for (label, href) in &actions {
                        a href=(href) target="_blank" rel="noopener" { (label) }
                    }
                }
            }
        }
    }
}

pub fn talk_article(talk: &Talk) -> Markup {
    let panel_id = format!("abs-{}", talk.id);

    html! {
        article class="talk" id=(talk.id) {
            header class="talk-header" {
                h2 class="talk-title" { (talk.title) }
                div class="talk-meta" { span { (talk.audience) } }
                p class="muted" {
                    (talk.abstract_short) " "
                    button class="toggle-abstract" type="button"
                        data-action=(Action::ToggleAbstract.as_str())
                        aria-expanded="false" aria-controls=(panel_id) { (EXPAND_LABEL) }
                }
                div id=(panel_id) class="hidden max-w-prose" {
                    p { (talk.abstract_long) }
                }
            }
            div class="video-tabs" {
                @if talk.videos.len() > 1 {
                    div class="tablist" role="tablist" {
                        @for (i, video) in talk.videos.iter().enumerate() {
                            button role="tab"
                                data-action=(Action::SelectTab.as_str())
                                aria-selected=(if i == 0 { "true" } else { "false" })
                                tabindex=(if i == 0 { "0" } else { "-1" })
                                data-embed=(video.embed) { (video.label) }
                        }
                    }
                }
                @if let Some(first) = talk.videos.first() {
                    div class="video-frame" {
                        iframe title=(format!("{} video", talk.title)) width="100%" height="100%"
                            src=(first.embed) frameborder="0" allowfullscreen loading="lazy" {}
                    }
                }
            }
            div class="resources" {
                @for download in &talk.downloads {
                    a href=(download.url)
                        aria-disabled=[download.is_placeholder().then_some("true")] {
                        (download.label)
                    }
                }
            }
            @if !talk.events.is_empty() {
                ul class="events-list" aria-label="Events presented at" {
                    @for event in &talk.events {
                        li { (event) }
                    }
                }
            }
        }
    }
}

pub fn build_shell(title: &str) -> String {
    let markup: Markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="color-scheme" content="light dark";
                title { (title) }
                style { (PreEscaped(builtin::BUILTIN_CSS)) }
                script src=(SCRIPT_SUFFIX) defer {}
            }
            body {
                header class="site-header" {
                    nav class="nav" {
                        @for (id, label) in NAV {
                            a data-nav=(id) href=(format!("#{id}")) { (label) }
                        }
                    }
                    button type="button" id="themeToggle" class="theme-toggle"
                        aria-label="Toggle theme" {
                        (LIGHT_GLYPH)
                    }
                }
                main {
                    section id="home" {
                        h1 { (title) }
                        div id="homeApps" class="card-grid" {}
                    }
                    section id="apps" {
                        h2 { "Apps" }
                        div id="appsList" class="card-grid" {}
                    }
                    section id="talks" {
                        h2 { "Talks" }
                        div id="talksList" {}
                    }
                }
                footer class="site-footer" {
                    "© " span id="year" {} " " (title)
                }
            }
        }
    };
    markup.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Download, Video};

    fn app(id: &str, name: &str) -> App {
        App {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            tagline: None,
            banner: None,
            logo: None,
            tech: Vec::new(),
            links: AppLinks::default(),
        }
    }

    fn talk(videos: &[(&str, &str)]) -> Talk {
        Talk {
            id: "t1".to_string(),
            title: "Ownership".to_string(),
            audience: "Everyone".to_string(),
            abstract_short: "Short".to_string(),
            abstract_long: "Long".to_string(),
            videos: videos
                .iter()
                .map(|(embed, label)| Video {
                    embed: embed.to_string(),
                    label: label.to_string(),
                })
                .collect(),
            downloads: Vec::new(),
            events: Vec::new(),
        }
    }

    #[test]
    fn initials_from_first_two_words() {
        assert_eq!(initials("Ann Bob"), "AB");
        assert_eq!(initials("ann  bob carl"), "AB");
        assert_eq!(initials("solo"), "S");
        assert_eq!(initials(""), "APP");
        assert_eq!(initials("   "), "APP");
    }

    #[test]
    fn card_without_logo_shows_initials() {
        let html = app_card(&app("x", "Ann Bob"), "/").into_string();
        assert!(html.contains(">AB</span>"));
        assert!(html.contains(r#"data-app="x""#));
        assert!(html.contains(r##"href="#""##));
        assert!(!html.contains("card-actions"));

        let html = app_card(&app("y", ""), "/").into_string();
        assert!(html.contains(">APP</span>"));
    }

    #[test]
    fn card_links_resolve_against_base() {
        let mut a = app("x", "Ann");
        a.links.page = Some("/apps/ann.html".to_string());
        a.links.github = Some("https://github.com/ann".to_string());
        a.banner = Some("/img/banner.png".to_string());
        a.logo = Some("img/logo.png".to_string());
        let html = app_card(&a, "/Site/").into_string();

        assert!(html.contains(r#"href="/Site/apps/ann.html""#));
        assert!(html.contains("background-image:url('/Site/img/banner.png')"));
        assert!(html.contains(r#"src="/Site/img/logo.png""#));
        assert!(html.contains(r#"<span class="card-media-label">App</span>"#));
        assert!(html.contains(r#"href="https://github.com/ann" target="_blank" rel="noopener""#));
        assert!(!html.contains(">Play<"));
    }

    #[test]
    fn untrusted_text_is_escaped() {
        let mut a = app("x", "<script>alert(1)</script>");
        a.description = "Tom & \"Jerry\"".to_string();
        a.tagline = Some("<b>fast</b>".to_string());
        a.tech = vec!["<rust>".to_string()];
        let html = app_card(&a, "/").into_string();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Tom &amp; &quot;Jerry&quot;"));
        assert!(html.contains("&lt;b&gt;fast&lt;/b&gt;"));
        assert!(html.contains("<span>&lt;rust&gt;</span>"));
    }

    #[test]
    fn single_video_has_no_tabs() {
        let html = talk_article(&talk(&[("https://v.example/1", "EN")])).into_string();
        assert!(!html.contains("tablist"));
        assert!(html.contains(r#"src="https://v.example/1""#));
    }

    #[test]
    fn multiple_videos_render_tabs() {
        let html = talk_article(&talk(&[
            ("https://v.example/1", "EN"),
            ("https://v.example/2", "DE"),
        ]))
        .into_string();
        assert!(html.contains(r#"role="tablist""#));
        assert!(html.contains(
            r#"aria-selected="true" tabindex="0" data-embed="https://v.example/1""#
        ));
        assert!(html.contains(
            r#"aria-selected="false" tabindex="-1" data-embed="https://v.example/2""#
        ));
    }

    #[test]
    fn placeholder_downloads_are_disabled() {
        let mut t = talk(&[("https://v.example/1", "EN")]);
        t.downloads = vec![
            Download {
                url: "#".to_string(),
                label: "Slides".to_string(),
            },
            Download {
                url: "/slides.pdf".to_string(),
                label: "PDF".to_string(),
            },
        ];
        t.events = vec!["RustConf".to_string()];
        let html = talk_article(&t).into_string();
        assert!(html.contains(r##"<a href="#" aria-disabled="true">Slides</a>"##));
        assert!(html.contains(r#"<a href="/slides.pdf">PDF</a>"#));
        assert!(html.contains("<li>RustConf</li>"));
    }

    #[test]
    fn shell_exposes_page_contract() {
        let html = build_shell("Portfolio");
        for needle in [
            r#"id="themeToggle""#,
            r#"id="homeApps""#,
            r#"id="appsList""#,
            r#"id="talksList""#,
            r#"id="year""#,
            r##"data-nav="talks" href="#talks""##,
            "assets/js/main.js",
        ] {
            assert!(html.contains(needle), "missing {needle}");
        }
    }
}
