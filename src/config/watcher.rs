//! Hot reload of the pool settings from the config file.
//!
//! Only `[pool]` is live. A reload re-reads the whole file, re-applies the
//! command-line overrides, validates, and stores the new [`PoolSettings`]
//! in the pool's shared handle when they differ from the current ones.
//! Monitors pick them up on their next start or restart.

use arc_swap::ArcSwap;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::loader::load_config_with;
use crate::config::schema::MonitorConfig;
use crate::monitor::PoolSettings;

type Overrides = Box<dyn Fn(&mut MonitorConfig) + Send>;

/// Follows the config file and feeds reloaded settings to a pool.
pub struct ConfigWatcher {
    path: PathBuf,
    overrides: Overrides,
    settings: Arc<ArcSwap<PoolSettings>>,
}

impl ConfigWatcher {
    /// `settings` is the handle returned by `Pool::settings_handle`.
    pub fn new(path: &Path, settings: Arc<ArcSwap<PoolSettings>>) -> Self {
        Self {
            path: path.to_path_buf(),
            overrides: Box::new(|_| {}),
            settings,
        }
    }

    /// Patch applied to every reloaded config, so command-line flags keep
    /// winning over the file.
    pub fn with_overrides<F>(mut self, overrides: F) -> Self
    where
        F: Fn(&mut MonitorConfig) + Send + 'static,
    {
        self.overrides = Box::new(overrides);
        self
    }

    /// Reload once. Returns the stored settings, or `None` when the file is
    /// invalid or its pool settings did not change.
    fn reload(&self) -> Option<PoolSettings> {
        let config = match load_config_with(&self.path, |config| (self.overrides)(config)) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(path = ?self.path, error = %e, "Config reload rejected, keeping current settings");
                return None;
            }
        };

        let next = PoolSettings::from(&config.pool);
        if **self.settings.load() == next {
            tracing::debug!(path = ?self.path, "Config changed, pool settings unchanged");
            return None;
        }

        self.settings.store(Arc::new(next));
        tracing::info!(
            interval = ?next.interval,
            fail_limit = next.fail_limit,
            "Pool settings reloaded, applied on next start or restart"
        );
        Some(next)
    }

    /// Start watching on notify's background thread. Reloads stop when the
    /// returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    self.reload();
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Watching config for pool settings changes");
        Ok(watcher)
    }
}
