#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use foresight_core::{resource_keys, LoadError, Loader};

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

/// Loader that counts invocations and resolves after `delay`.
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

/// Loader that fails its first `failures` invocations, then succeeds.
pub fn flaky_loader(calls: Arc<AtomicUsize>, failures: usize) -> Loader<u32> {
    Loader::new(move || {
        let calls = Arc::clone(&calls);
        async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= failures {
                Err(LoadError::failed(format!("attempt {n} failed")))
            } else {
                Ok(n as u32)
            }
        }
    })
}

pub fn failing_loader(calls: Arc<AtomicUsize>) -> Loader<u32> {
    flaky_loader(calls, usize::MAX)
}
