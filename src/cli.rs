use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use url::Url;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProgressMode {
    /// Enable progress UI when stderr is a TTY.
    Auto,
    /// Always enable progress UI (even when piped).
    Always,
    /// Never show progress UI.
    Never,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Page HTML to prerender. When omitted, the default page shell is generated.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// URL the page is served from; the page script and `data/*.json` resolve against it
    /// (e.g. `https://user.github.io/Project/`).
    #[arg(long, default_value = "http://localhost/")]
    pub page_url: Url,

    /// Read `data/apps.json` and `data/talks.json` from this site root instead of over HTTP.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// JSON file backing the persisted theme preference. In-memory when omitted.
    #[arg(long)]
    pub storage: Option<PathBuf>,

    /// Treat the OS colour scheme as dark.
    #[arg(long)]
    pub prefers_dark: bool,

    /// Click the theme toggle once after boot (persisted to `--storage`).
    #[arg(long)]
    pub toggle_theme: bool,

    /// Footer year. Defaults to the current local year.
    #[arg(long)]
    pub year: Option<i32>,

    /// Site title used by the generated shell.
    #[arg(long, default_value = "Portfolio")]
    pub title: String,

    /// Output HTML path.
    #[arg(long, default_value = "index.html")]
    pub out: PathBuf,

    /// Max concurrent downloads.
    #[arg(long, default_value_t = 4)]
    pub max_concurrency: usize,

    /// HTTP User-Agent used for data requests.
    #[arg(long, default_value = "portfolio-page/0.1")]
    pub user_agent: String,

    /// Progress display: `auto`, `always`, or `never`.
    #[arg(long, value_enum, default_value = "auto")]
    pub progress: ProgressMode,
}
