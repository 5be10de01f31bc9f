use crate::config::IntakeConfig;
use crate::dedup::DedupCache;
use crate::signature::SharedSecret;
use crate::trigger::TriggerClassifier;
use notion::RecordSink;
use std::sync::Arc;
use std::time::Duration;

struct AppStateInner {
    sink: Arc<dyn RecordSink>,
    dedup: DedupCache,
    secret: SharedSecret,
    classifier: TriggerClassifier,
    require_signature: bool,
    production: bool,
}

/// State shared by all intake requests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(sink: Arc<dyn RecordSink>, config: &IntakeConfig, production: bool) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                sink,
                dedup: DedupCache::new(
                    Duration::from_secs(config.dedup_window_secs),
                    config.dedup_capacity,
                ),
                secret: SharedSecret::new(),
                classifier: TriggerClassifier::new(config.triggers.iter().cloned()),
                require_signature: config.require_signature,
                production,
            }),
        }
    }

    pub fn sink(&self) -> &dyn RecordSink {
        self.inner.sink.as_ref()
    }

    pub fn dedup(&self) -> &DedupCache {
        &self.inner.dedup
    }

    pub fn secret(&self) -> &SharedSecret {
        &self.inner.secret
    }

    pub fn classifier(&self) -> &TriggerClassifier {
        &self.inner.classifier
    }

    pub fn require_signature(&self) -> bool {
        self.inner.require_signature
    }

    pub fn production(&self) -> bool {
        self.inner.production
    }
}
