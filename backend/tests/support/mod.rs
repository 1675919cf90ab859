#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tvsl_guide::feed::{FeedSource, StaticFeedSource};
use tvsl_guide::store::ListingsStore;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Builder for small XMLTV documents. Timestamps are given as
/// `yyyyMMddHHmmss` and written with the builder's offset.
pub struct XmltvBuilder {
    offset: String,
    channels: Vec<String>,
    programmes: Vec<String>,
}

impl XmltvBuilder {
    pub fn new() -> Self {
        Self::with_offset("+0000")
    }

    pub fn with_offset(offset: &str) -> Self {
        Self {
            offset: offset.to_string(),
            channels: Vec::new(),
            programmes: Vec::new(),
        }
    }

    pub fn channel(mut self, id: &str, display_names: &[&str]) -> Self {
        let names: String = display_names
            .iter()
            .map(|n| format!("\n    <display-name>{}</display-name>", n))
            .collect();
        self.channels
            .push(format!("  <channel id=\"{}\">{}\n  </channel>", id, names));
        self
    }

    pub fn programme(self, channel: &str, start: &str, stop: &str, title: &str) -> Self {
        self.programme_with(channel, start, stop, title, "")
    }

    /// Programme with extra child elements (category, rating, ...).
    pub fn programme_with(
        mut self,
        channel: &str,
        start: &str,
        stop: &str,
        title: &str,
        extra: &str,
    ) -> Self {
        self.programmes.push(format!(
            "  <programme start=\"{start} {offset}\" stop=\"{stop} {offset}\" channel=\"{channel}\">\n    <title>{title}</title>{extra}\n  </programme>",
            start = start,
            stop = stop,
            offset = self.offset,
            channel = channel,
            title = title,
            extra = extra,
        ));
        self
    }

    pub fn build(&self) -> String {
        let mut out = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE tv SYSTEM \"xmltv.dtd\">\n<tv generator-info-name=\"fixture\">\n",
        );
        for line in self.channels.iter().chain(self.programmes.iter()) {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("</tv>\n");
        out
    }
}

/// Store over an in-memory source, already refreshed once.
pub fn loaded_store(xml: String) -> (Arc<StaticFeedSource>, Arc<ListingsStore>) {
    let source = Arc::new(StaticFeedSource::new("fixture", xml));
    let store = Arc::new(ListingsStore::new(
        Arc::clone(&source) as Arc<dyn FeedSource>
    ));
    store.refresh().expect("fixture feed should load");
    (source, store)
}
