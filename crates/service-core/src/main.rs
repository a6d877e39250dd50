mod config;
mod service;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::info;

use config::ServiceConfig;
use service::ScoringService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let config = ServiceConfig::load();

    let service = ScoringService::initialize(&config).with_context(|| {
        format!(
            "loading artifacts (model: {}, scaler: {})",
            config.model_path.display(),
            config.scaler_path.display()
        )
    })?;

    let health = service.health();
    info!(
        model = %config.model_path.display(),
        scaler = %config.scaler_path.display(),
        alpha = config.alpha,
        model_loaded = health.model_loaded,
        scaler_loaded = health.scaler_loaded,
        "fatigue scoring service started"
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            line = lines.next_line() => {
                match line.context("reading request line")? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => {
                        let response = service.handle_line(&line);
                        stdout.write_all(response.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;
                    }
                    None => {
                        info!("input stream closed");
                        break;
                    }
                }
            }
        }
    }

    info!("fatigue scoring service stopped");
    Ok(())
}
