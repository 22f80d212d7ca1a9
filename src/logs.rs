//! Capturing `tracing` output as a golden output.

use crate::event::CallSite;
use crate::session::Golden;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Key [`Golden::capture_logs`] records under by default.
pub const LOGS_KEY: &str = "logs";

/// Which events [`Golden::capture_logs`] keeps.
#[derive(Debug, Clone)]
pub struct LogCapture {
    targets: Vec<String>,
    level: Level,
    key: String,
}

impl LogCapture {
    /// Capture events from `targets` (and their submodules) at `INFO` or above.
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            level: Level::INFO,
            key: LOGS_KEY.to_string(),
        }
    }

    /// Least severe level to keep.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    fn matches(&self, target: &str, level: &Level) -> bool {
        // More verbose levels compare greater.
        if *level > self.level {
            return false;
        }
        self.targets.iter().any(|t| {
            target == t
                || (target.starts_with(t.as_str()) && target[t.len()..].starts_with("::"))
        })
    }
}

impl Golden {
    /// Run `body` and assert the events it logged, one `LEVEL:message` line
    /// each, against the capture's output key. No events means absent.
    #[track_caller]
    pub fn capture_logs<R>(&self, capture: LogCapture, body: impl FnOnce() -> R) -> R {
        let site = CallSite::caller();
        let lines = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(CaptureLayer {
            filter: capture.clone(),
            lines: Arc::clone(&lines),
        });

        let result = {
            let _scope = self.approved_scope();
            tracing::subscriber::with_default(subscriber, body)
        };

        let lines = match lines.lock() {
            Ok(mut lines) => std::mem::take(&mut *lines),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        let actual = if lines.is_empty() {
            None
        } else {
            Some(toml::Value::Array(
                lines.into_iter().map(toml::Value::String).collect(),
            ))
        };
        self.check(self.out_opt(&capture.key), actual, site);
        result
    }
}

struct CaptureLayer {
    filter: LogCapture,
    lines: Arc<Mutex<Vec<String>>>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !self.filter.matches(metadata.target(), metadata.level()) {
            return;
        }

        let mut message = MessageVisitor::default();
        event.record(&mut message);
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(format!("{}:{}", metadata.level(), message.0));
        }
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.0 = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_matching() {
        let capture = LogCapture::new(["app"]);
        assert!(capture.matches("app", &Level::INFO));
        assert!(capture.matches("app::db", &Level::ERROR));
        assert!(!capture.matches("application", &Level::INFO));
        assert!(!capture.matches("app", &Level::DEBUG));
        assert!(capture.clone().level(Level::DEBUG).matches("app", &Level::DEBUG));
    }
}
