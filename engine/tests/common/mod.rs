#![allow(dead_code)]

use async_trait::async_trait;
use linkguard_engine::{EngineConfig, LinkAnalyzer, NetworkError, RedirectResolver};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

/// In-memory resolver: known URLs redirect per the map, others resolve to themselves.
#[derive(Default)]
pub struct StubResolver {
    redirects: HashMap<String, String>,
    failing: bool,
    calls: AtomicUsize,
}

impl StubResolver {
    pub fn passthrough() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            failing: true,
            ..Self::default()
        })
    }

    pub fn with_redirects(pairs: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            redirects: pairs
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RedirectResolver for StubResolver {
    async fn resolve_redirect(&self, url: &str) -> Result<String, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(NetworkError::Timeout(Duration::from_millis(5000)));
        }
        Ok(self
            .redirects
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string()))
    }
}

pub fn analyzer_with(resolver: Arc<StubResolver>) -> LinkAnalyzer {
    LinkAnalyzer::new(EngineConfig::default(), resolver)
}
