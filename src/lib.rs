mod builtin;
mod cli;

pub mod apps;
pub mod base_path;
pub mod capability;
pub mod dom;
pub mod fetcher;
pub mod model;
pub mod page;
pub mod progress;
pub mod render;
pub mod scroll_spy;
pub mod storage;
pub mod talks;
pub mod theme;
pub mod widgets;

use std::sync::Arc;

use anyhow::Context as _;
use cli::Args;
use fetcher::{DataSource, Fetcher};
use storage::{FileStorage, MemoryStorage, Storage};

pub use cli::{Args as CliArgs, ProgressMode};
pub use page::{LoadReport, Page, PageOptions};

pub async fn run(args: Args) -> anyhow::Result<()> {
    use std::io::IsTerminal as _;

    let progress_enabled = match args.progress {
        ProgressMode::Always => true,
        ProgressMode::Never => false,
        ProgressMode::Auto => std::io::stderr().is_terminal(),
    };
    let progress = progress::Progress::new(progress_enabled, args.max_concurrency);

    let res = prerender(&args, progress.clone()).await;
    progress.finish();
    res
}

async fn prerender(args: &Args, progress: Arc<progress::Progress>) -> anyhow::Result<()> {
    progress.set_stage("reading page");
    let html = match &args.input {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
        }
        None => render::build_shell(&args.title),
    };

    let storage: Box<dyn Storage> = match &args.storage {
        Some(path) => Box::new(FileStorage::open(path)?),
        None => Box::new(MemoryStorage::default()),
    };
    let options = PageOptions {
        page_url: args.page_url.clone(),
        prefers_dark: args.prefers_dark,
        intersection_observer: true,
        year: args.year,
    };

    progress.set_stage("booting page");
    let mut page = Page::parse(&html, options, storage);
    page.boot();
    if args.toggle_theme {
        match page.toggle_theme() {
            Some(theme) => tracing::info!(theme = theme.as_str(), "theme toggled"),
            None => tracing::warn!("--toggle-theme set but the page has no #themeToggle"),
        }
    }

    progress.set_stage("loading data");
    let source = match &args.data_dir {
        Some(dir) => DataSource::Local(dir.clone()),
        None => DataSource::Remote {
            fetcher: Fetcher::new(&args.user_agent, args.max_concurrency, Some(progress.clone()))?,
            page_url: args.page_url.clone(),
        },
    };
    let report = page.load_data(&source).await;
    progress.rendered(report.cards, report.talks);

    progress.set_stage("writing output");
    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }
    let out = page.to_html()?;
    std::fs::write(&args.out, out).with_context(|| format!("write {}", args.out.display()))?;

    tracing::info!(
        out = %args.out.display(),
        cards = report.cards,
        talks = report.talks,
        failures = report.failures,
        "page prerendered"
    );
    Ok(())
}
