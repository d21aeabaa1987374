//! HTTP server for the collection schedule.
//!
//! Serves the persisted record set as JSON and the static schedule page, and
//! owns the trigger surface: one schedule update at startup plus one per day
//! at a configured local time.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Result;
use axum::{routing::get, Router};
use clap::Parser;
use svoz_core::{
    cache::ScheduleCache,
    chrono::NaiveTime,
    notify::{EmailNotifier, Notifier},
    schedule::ScheduleConfig,
};
use tower_http::services::ServeDir;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod route;
mod scheduler;

#[derive(Debug, Parser)]
#[command()]
pub struct Arguments {
    /// address to bind
    #[arg(long, default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,
    /// path of the schedule cache file
    #[arg(long, default_value = "cache.json")]
    pub cache: PathBuf,
    /// directory with the static schedule page
    #[arg(long, default_value = "static")]
    pub static_dir: PathBuf,
    /// local wall-clock time of the daily schedule update
    #[arg(long, default_value = "06:30", value_parser = parse_update_time)]
    pub update_time: NaiveTime,
    /// SMTP relay for collection-day alert emails
    #[arg(long, default_value = "smtp.seznam.cz")]
    pub smtp_host: String,
    /// SMTP relay port, 465 connects with implicit TLS
    #[arg(long, default_value_t = 465)]
    pub smtp_port: u16,
    /// alert sender address; without it alerts are log-only
    #[arg(long)]
    pub smtp_from: Option<String>,
    /// alert recipient address, repeatable
    #[arg(long)]
    pub smtp_to: Vec<String>,
}

fn parse_update_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|err| err.to_string())
}

pub struct AppState {
    pub schedule: ScheduleConfig,
    pub cache: ScheduleCache,
    pub notifier: Option<EmailNotifier>,
}

impl AppState {
    pub fn sink(&self) -> Option<&dyn Notifier> {
        self.notifier
            .as_ref()
            .map(|notifier| notifier as &dyn Notifier)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let args = Arguments::parse();
    let notifier = match &args.smtp_from {
        Some(from) if !args.smtp_to.is_empty() => Some(EmailNotifier::from_config(
            &args.smtp_host,
            args.smtp_port,
            from,
            &args.smtp_to,
        )?),
        _ => {
            tracing::info!("no alert sender/recipients configured, collection-day alerts are log-only");
            None
        }
    };
    let state = Arc::new(AppState {
        schedule: ScheduleConfig::default(),
        cache: ScheduleCache::new(&args.cache),
        notifier,
    });

    // One update right away, then one per day at the configured time.
    scheduler::run_once(&state).await;
    tokio::spawn(scheduler::run_daily(Arc::clone(&state), args.update_time));

    let app = Router::new()
        .route("/data", get(route::data::handler))
        .route("/data/:stream", get(route::data::stream_handler))
        .fallback_service(ServeDir::new(&args.static_dir))
        .with_state(Arc::clone(&state));
    tracing::info!(address = %args.bind, "server listening");
    axum::Server::bind(&args.bind)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update_time() {
        let expected = NaiveTime::from_hms_opt(6, 30, 0).unwrap();
        assert_eq!(parse_update_time("06:30").unwrap(), expected);
        assert_eq!(parse_update_time("06:30:00").unwrap(), expected);
        assert!(parse_update_time("half past six").is_err());
    }
}
