#![warn(clippy::unwrap_used)]

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use quotr::config::Config;
use quotr::server::{self, AppState};
use quotr::store::SupabaseRepository;

#[derive(Parser)]
#[command(version, long_about = None)]
struct CliArguments {
    #[arg(
        long = "bind",
        help = "Socket address to listen on, takes precedence over QUOTR_BIND"
    )]
    bind: Option<String>,
}

fn main() {
    if let Err(error) = fallible_main() {
        log::error!("{}", error);
    }
}

#[tokio::main]
async fn fallible_main() -> Result<()> {
    env_logger::init();

    let CliArguments { bind } = CliArguments::parse();
    let config = Config::from_env(bind)?;

    let repository = SupabaseRepository::new(&config.supabase_url, &config.service_role_key);
    let app = server::router(AppState {
        repository: Arc::new(repository),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    log::info!("Serving quotation documents on {}", config.bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
