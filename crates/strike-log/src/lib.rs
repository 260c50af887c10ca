//! Tracing setup for the simulation.
//!
//! Console output is always on. Debug builds given a log directory also write
//! one JSON object per event to `strike.log` there.

use std::fs::File;
use std::path::{Path, PathBuf};

use strike_config::Config;
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config supplies one.
pub const DEFAULT_FILTER: &str = "info";

/// File name of the JSON event log.
pub const LOG_FILE: &str = "strike.log";

/// Initialize the global tracing subscriber.
///
/// Filter precedence: `RUST_LOG`, then `config.debug.log_level`, then
/// [`DEFAULT_FILTER`]. Panics if a global subscriber is already set.
///
/// ```no_run
/// use strike_config::Config;
/// use strike_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = File::create(log_file_path(log_dir))
    {
        subscriber.with(json_file_layer(log_file)).init();
        return;
    }

    subscriber.init();
}

/// Filter directives taken from the config, falling back to
/// [`DEFAULT_FILTER`] when absent or blank.
pub fn filter_directives(config: Option<&Config>) -> String {
    config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// An `EnvFilter` built from [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE)
}

/// Line-delimited JSON events without ANSI escapes.
fn json_file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::uptime())
        .json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_without_config() {
        assert_eq!(filter_directives(None), "info");
        assert!(default_env_filter().to_string().contains(DEFAULT_FILTER));
    }

    #[test]
    fn test_config_level_wins_over_default() {
        let mut config = Config::default();
        config.debug.log_level = "warn,strike_combat=trace".to_string();
        assert_eq!(filter_directives(Some(&config)), "warn,strike_combat=trace");
    }

    #[test]
    fn test_blank_config_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "   ".to_string();
        assert_eq!(filter_directives(Some(&config)), DEFAULT_FILTER);
    }

    #[test]
    fn test_crate_filters_parse() {
        for directives in [
            "info",
            "debug,strike_collision=trace",
            "warn,strike_combat=debug,strike_player=trace",
        ] {
            let filter = EnvFilter::try_new(directives);
            assert!(filter.is_ok(), "Failed to parse filter: {directives}");
        }
    }

    #[test]
    fn test_log_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_file_path(dir.path());
        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(path.file_name().unwrap(), LOG_FILE);
    }

    #[test]
    fn test_json_layer_writes_structured_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_file_path(dir.path());
        let file = File::create(&path).unwrap();

        let subscriber = tracing_subscriber::registry().with(json_file_layer(file));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(damage = 30, entity = "dmg_1", "Damage applied");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        let line = contents.lines().next().unwrap();
        assert!(!line.contains('\u{1b}'));

        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(event["level"], "INFO");
        assert_eq!(event["fields"]["message"], "Damage applied");
        assert_eq!(event["fields"]["damage"], 30);
        assert_eq!(event["fields"]["entity"], "dmg_1");
    }
}
