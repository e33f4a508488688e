#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use foresight_core::{resource_keys, ForesightConfig, LoadError, Loader, LoaderRegistry};

resource_keys! {
    pub enum Component {
        Dashboard => "dashboard",
        Reports => "reports",
        Chat => "chat",
    }
}

resource_keys! {
    pub enum Library {
        Charts => "charts",
        Pdf => "pdf",
    }
}

pub fn counting_loader(calls: Arc<AtomicUsize>, value: u32, delay: Duration) -> Loader<u32> {
    Loader::new(move || {
        let calls = Arc::clone(&calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            Ok(value)
        }
    })
}

pub fn failing_loader(calls: Arc<AtomicUsize>) -> Loader<u32> {
    Loader::new(move || {
        let calls = Arc::clone(&calls);
        async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Err::<u32, _>(LoadError::failed(format!("attempt {n} failed")))
        }
    })
}

/// One invocation counter per key.
#[derive(Default)]
pub struct Calls {
    pub dashboard: Arc<AtomicUsize>,
    pub reports: Arc<AtomicUsize>,
    pub chat: Arc<AtomicUsize>,
    pub charts: Arc<AtomicUsize>,
    pub pdf: Arc<AtomicUsize>,
}

impl Calls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instant loaders for every component.
    pub fn components(&self) -> LoaderRegistry<Component, u32> {
        LoaderRegistry::new()
            .with(Component::Dashboard, instant(&self.dashboard, 1))
            .with(Component::Reports, instant(&self.reports, 2))
            .with(Component::Chat, instant(&self.chat, 3))
    }

    /// Instant loaders for every library.
    pub fn libraries(&self) -> LoaderRegistry<Library, u32> {
        LoaderRegistry::new()
            .with(Library::Charts, instant(&self.charts, 10))
            .with(Library::Pdf, instant(&self.pdf, 20))
    }
}

fn instant(calls: &Arc<AtomicUsize>, value: u32) -> Loader<u32> {
    counting_loader(Arc::clone(calls), value, Duration::ZERO)
}

pub fn count(calls: &Arc<AtomicUsize>) -> usize {
    calls.load(Ordering::SeqCst)
}

/// Single attempt, so failures resolve without backoff.
pub fn single_attempt() -> ForesightConfig {
    let mut config = ForesightConfig::default();
    config.retry.max_attempts = 1;
    config
}

/// Let spawned work run to completion under a paused clock.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}
