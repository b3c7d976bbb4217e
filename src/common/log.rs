//! Logging utilities emitting JSON lines through `tracing`.
//!
//! Every request produces one structured event with the module, event name,
//! result code and duration. The host process may already own a global
//! subscriber, so installation is best-effort.

use tracing_subscriber::{fmt, EnvFilter};

use super::config::{AppCfg, LogFormat};

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init(cfg: &AppCfg) -> bool {
    let filter = EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let installed = match cfg.log_format {
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
        LogFormat::Pretty => builder.with_target(false).try_init(),
    };
    installed.is_ok()
}

/// Emit one request-level record matching the documented schema.
pub fn event(module: &'static str, event: &'static str, code: u32, dur_ms: u128) {
    if code == 0 {
        tracing::info!("mod" = module, ev = event, code, dur_ms = dur_ms as u64);
    } else {
        tracing::warn!("mod" = module, ev = event, code, dur_ms = dur_ms as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<(String, String)>>>);

    impl Visit for Captured {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if let Ok(mut fields) = self.0.lock() {
                fields.push((field.name().to_string(), format!("{value:?}")));
            }
        }
    }

    impl<S: Subscriber> Layer<S> for Captured {
        fn on_event(&self, event: &Event<'_>, _: Context<'_, S>) {
            event.record(&mut self.clone());
        }
    }

    #[test]
    fn request_event_uses_the_json_line_schema() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry().with(captured.clone());
        tracing::subscriber::with_default(subscriber, || event("api", "predict", 0, 3));

        let fields = captured.0.lock().unwrap().clone();
        let names: Vec<&str> = fields.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["mod", "ev", "code", "dur_ms"]);
        assert_eq!(fields[0].1, "\"api\"");
        assert_eq!(fields[1].1, "\"predict\"");
    }
}
