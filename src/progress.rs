use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use indicatif::{
    HumanBytes, HumanDuration, MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle,
};
use url::Url;

pub struct Progress {
    enabled: bool,
    start: Instant,
    max_concurrency: usize,

    mp: Option<MultiProgress>,
    stage: ProgressBar,
    fetches: ProgressBar,

    http_in_flight: AtomicU64,
    http_done: AtomicU64,
    http_bytes: AtomicU64,
    cards: AtomicU64,
    talks: AtomicU64,
    last_http_label: Mutex<String>,
}

impl Progress {
    pub fn new(enabled: bool, max_concurrency: usize) -> Arc<Self> {
        let (mp, stage, fetches) = if enabled {
            let mp = MultiProgress::with_draw_target(ProgressDrawTarget::stderr());
            let stage = mp.add(ProgressBar::new_spinner());
            stage.set_style(spinner_style());
            stage.enable_steady_tick(Duration::from_millis(80));
            stage.set_message("starting");

            let fetches = mp.add(ProgressBar::new_spinner());
            fetches.set_style(spinner_style());
            fetches.enable_steady_tick(Duration::from_millis(120));
            fetches.set_message("fetches");
            (Some(mp), stage, fetches)
        } else {
            (None, ProgressBar::hidden(), ProgressBar::hidden())
        };

        Arc::new(Self {
            enabled,
            start: Instant::now(),
            max_concurrency: max_concurrency.max(1),
            mp,
            stage,
            fetches,
            http_in_flight: AtomicU64::new(0),
            http_done: AtomicU64::new(0),
            http_bytes: AtomicU64::new(0),
            cards: AtomicU64::new(0),
            talks: AtomicU64::new(0),
            last_http_label: Mutex::new(String::new()),
        })
    }

    pub fn set_stage(&self, msg: impl Into<String>) {
        if !self.enabled {
            return;
        }
        self.stage.set_message(msg.into());
    }

    pub fn http_started(&self, url: &Url) {
        self.http_in_flight.fetch_add(1, Ordering::Relaxed);
        if self.enabled {
            if let Ok(mut last) = self.last_http_label.lock() {
                *last = format!("GET {url}");
            }
            self.refresh();
        }
    }

    pub fn http_finished(&self, bytes: usize) {
        self.http_in_flight.fetch_sub(1, Ordering::Relaxed);
        self.http_done.fetch_add(1, Ordering::Relaxed);
        self.http_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
        self.refresh();
    }

    pub fn rendered(&self, cards: usize, talks: usize) {
        self.cards.fetch_add(cards as u64, Ordering::Relaxed);
        self.talks.fetch_add(talks as u64, Ordering::Relaxed);
        self.refresh();
    }

    pub fn finish(&self) {
        if !self.enabled {
            return;
        }
        self.refresh();
        self.stage.finish_with_message("done");
        self.fetches.finish_and_clear();
        if let Some(mp) = &self.mp {
            let _ = mp.println(format!("Done in {}", HumanDuration(self.start.elapsed())));
        }
    }

    fn refresh(&self) {
        if !self.enabled {
            return;
        }
        let in_flight = self.http_in_flight.load(Ordering::Relaxed);
        let done = self.http_done.load(Ordering::Relaxed);
        let bytes = self.http_bytes.load(Ordering::Relaxed);
        let cards = self.cards.load(Ordering::Relaxed);
        let talks = self.talks.load(Ordering::Relaxed);
        let last = self
            .last_http_label
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default();
        self.fetches.set_message(format!(
            "HTTP: done {done} | in-flight {in_flight}/{max} | bytes {bytes} | cards {cards} talks {talks} | {last}",
            max = self.max_concurrency,
            bytes = HumanBytes(bytes),
        ));
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {msg}  [{elapsed_precise}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
