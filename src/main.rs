use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use hostwatch::adapters::{HttpReceiver, LogNotifier, StaticLoader};
use hostwatch::config::{load_config_with, validate_config, ConfigError, ConfigWatcher, MonitorConfig, ProbeKind};
use hostwatch::lifecycle::signals;
use hostwatch::observability::{logging, metrics};
use hostwatch::probe::{HttpProbe, Probe, TcpProbe};
use hostwatch::{Pool, PoolSettings};

#[derive(Clone, Parser)]
#[command(name = "hostwatch")]
#[command(about = "Monitor host liveness and report UP/DOWN transitions", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Milliseconds between probes of one host.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Consecutive failed probes before a host is considered down.
    #[arg(long)]
    fail_limit: Option<u32>,

    /// Timeout of a single probe in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Probe backend.
    #[arg(long, value_enum)]
    probe: Option<ProbeArg>,

    /// Control endpoint listen address.
    #[arg(long)]
    listen: Option<String>,

    /// Disable the HTTP control endpoint.
    #[arg(long)]
    no_receiver: bool,

    /// Hosts to start monitoring at boot.
    hosts: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProbeArg {
    Tcp,
    Http,
}

impl From<ProbeArg> for ProbeKind {
    fn from(arg: ProbeArg) -> Self {
        match arg {
            ProbeArg::Tcp => ProbeKind::Tcp,
            ProbeArg::Http => ProbeKind::Http,
        }
    }
}

impl Cli {
    /// Load the config file (or defaults) and apply command-line overrides.
    fn resolve_config(&self) -> Result<MonitorConfig, ConfigError> {
        match &self.config {
            Some(path) => load_config_with(path, |config| self.apply_overrides(config)),
            None => {
                let mut config = MonitorConfig::default();
                self.apply_overrides(&mut config);
                validate_config(&config).map_err(ConfigError::Validation)?;
                Ok(config)
            }
        }
    }

    /// Flags win over the file, at startup and on every reload.
    fn apply_overrides(&self, config: &mut MonitorConfig) {
        if let Some(interval_ms) = self.interval_ms {
            config.pool.interval_ms = interval_ms;
        }
        if let Some(fail_limit) = self.fail_limit {
            config.pool.fail_limit = fail_limit;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.probe.timeout_ms = timeout_ms;
        }
        if let Some(probe) = self.probe {
            config.probe.kind = probe.into();
        }
        if let Some(listen) = &self.listen {
            config.receiver.bind_address = listen.clone();
        }
        if self.no_receiver {
            config.receiver.enabled = false;
        }
        config.loader.hosts.extend(self.hosts.iter().cloned());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!("hostwatch v{} starting", env!("CARGO_PKG_VERSION"));

    let settings = PoolSettings::from(&config.pool);
    tracing::info!(
        interval = ?settings.interval,
        fail_limit = settings.fail_limit,
        probe = ?config.probe.kind,
        probe_timeout_ms = config.probe.timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr);
        }
    }

    let timeout = Duration::from_millis(config.probe.timeout_ms);
    let probe: Arc<dyn Probe> = match config.probe.kind {
        ProbeKind::Tcp => Arc::new(TcpProbe::new(timeout, config.probe.default_port)),
        ProbeKind::Http => Arc::new(HttpProbe::new(timeout)),
    };

    let loader = StaticLoader::new(config.loader.hosts.clone());
    if loader.is_empty() && !config.receiver.enabled {
        tracing::warn!("No hosts configured and no control endpoint, nothing will be monitored");
    }
    tracing::info!(hosts = loader.len(), "Boot host list ready");

    let mut pool = Pool::new(settings, probe)
        .with_loader(loader)
        .with_notifier(LogNotifier);
    if config.receiver.enabled {
        pool = pool.with_receiver(HttpReceiver::new(config.receiver.bind_address.clone()));
    }

    // Pool settings follow the config file; other sections need a restart.
    let _watcher = match &cli.config {
        Some(path) => {
            let overrides = cli.clone();
            let watcher = ConfigWatcher::new(path, pool.settings_handle())
                .with_overrides(move |config| overrides.apply_overrides(config));
            match watcher.run() {
                Ok(w) => Some(w),
                Err(e) => {
                    tracing::warn!(error = %e, "Config hot reload unavailable");
                    None
                }
            }
        }
        None => None,
    };

    let _dispatch = pool.start();

    signals::wait_for_shutdown().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
