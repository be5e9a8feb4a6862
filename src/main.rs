use std::sync::Arc;

use clap::Parser;
use folio::app;
use folio::config::{Cli, Config};
use folio::db::Database;
use folio::handler::AppState;
use tokio::signal;
use tracing;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    tracing_subscriber::fmt().json().init();
    tracing::info!("folio.svc starting");

    let cfg = Config::resolve(args.config_path.as_deref()).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = ?args.config_path, "failed to load config file");
        std::process::exit(1);
    });
    let db = Arc::new(Database::new(&cfg).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup database");
        std::process::exit(1);
    }));

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let app = app(AppState { db }, cfg.app.get_static_dir());

    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    tracing::info!("folio.svc running on http://{}", &address);
    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(err) = result {
                tracing::error!(error = %err, "server exited with error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            tracing::info!("ctrl+c signal received, shutting down");
        }
    }

    tracing::info!("folio.svc going off");
}
