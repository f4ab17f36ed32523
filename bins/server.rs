use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

use configs::AppConfig;

/// Fractal job API server.
#[derive(Debug, Parser)]
#[command(name = "fractal-api", version, about)]
struct Cli {
    /// Path to a TOML config file; `CONFIG_PATH` or `config.toml` otherwise
    #[arg(short, long)]
    config: Option<String>,

    /// Database URL (postgres://... or sqlite:...)
    #[arg(long)]
    database_url: Option<String>,

    /// Append logs to this file instead of stdout
    #[arg(long)]
    log_file: Option<String>,

    #[arg(long)]
    host: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    /// Command-line flags win over file and environment.
    fn apply(&self, cfg: &mut AppConfig) {
        if let Some(url) = &self.database_url {
            cfg.database.url = url.clone();
        }
        if let Some(file) = &self.log_file {
            cfg.logging.file = Some(file.clone());
        }
        if let Some(host) = &self.host {
            cfg.server.host = host.clone();
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
        if self.json_logs {
            cfg.logging.json = true;
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut cfg = AppConfig::load(cli.config.as_deref())?;
    cli.apply(&mut cfg);
    cfg.normalize_and_validate()?;
    Ok(cfg)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(
            service = "fractal-api",
            event = "signal_error",
            error = %e,
            "failed to listen for Ctrl+C"
        );
        return;
    }
    info!(
        service = "fractal-api",
        event = "shutdown_signal",
        "received Ctrl+C, draining connections"
    );
}

fn main() -> std::process::ExitCode {
    // .env must be loaded before AppConfig reads the environment
    dotenv().ok();
    let cli = Cli::parse();

    let cfg = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("fractal-api: invalid configuration: {e:#}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let log_file = cfg.logging.file.as_deref();
    if let Err(e) = common::utils::logging::init_logging(log_file, cfg.logging.json) {
        eprintln!("fractal-api: failed to initialize logging: {e:#}");
        return std::process::ExitCode::FAILURE;
    }

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "fractal-api",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(
                service = "fractal-api",
                event = "runtime_build_failed",
                error = %e,
                "failed to build tokio runtime"
            );
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "fractal-api",
        event = "start",
        %service_id,
        pid,
        version,
        addr = %cfg.server.bind_addr(),
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "fractal api starting"
    );

    rt.block_on(async move {
        match server::run(&cfg, shutdown_signal()).await {
            Ok(()) => {
                info!(service = "fractal-api", event = "stop", %service_id, pid, "server stopped");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(
                    service = "fractal-api",
                    event = "run_failed",
                    error = %e,
                    "server exited with error"
                );
                std::process::ExitCode::FAILURE
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "fractal-api",
            "--database-url",
            "sqlite::memory:",
            "--host",
            "127.0.0.1",
            "--port",
            "8088",
            "--json-logs",
        ]);
        let mut cfg = AppConfig::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:8088");
        assert!(cfg.logging.json);
        assert!(cfg.logging.file.is_none());
    }

    #[test]
    fn missing_config_path_file_falls_back_to_defaults() {
        std::env::set_var("CONFIG_PATH", "/nonexistent/fractal-api.toml");
        let cli = Cli::parse_from(["fractal-api"]);
        assert!(cli.config.is_none());
        let cfg = load_config(&cli).unwrap();
        assert!(cfg.server.worker_threads.is_some());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let cli = Cli::parse_from(["fractal-api", "--config", "/nonexistent/explicit.toml"]);
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn absent_flags_keep_config() {
        let cli = Cli::parse_from(["fractal-api"]);
        let mut cfg = AppConfig::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.database.url, configs::DEFAULT_DATABASE_URL);
    }
}
