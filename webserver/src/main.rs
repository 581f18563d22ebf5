//! WebServer entry point
//!
//! Loads `.env` and the environment, builds the generator and image services
//! and serves the HTTP API until Ctrl+C.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use generator::{Dispatcher, GeneratorConfig};
use shared::logging;

use webserver::{AppState, ClaidClient, ImageOptimizer, WebServer, WebServerConfig};

const COMPONENT: &str = "webserver";
const IMAGE_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Parser, Debug)]
#[command(name = "webserver")]
#[command(about = "Text and image optimization API server")]
struct Args {
    /// Port for the HTTP server
    #[arg(long, default_value = "8000")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Environment file to load instead of `./.env`
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Overrides IMAGES_PATH
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Serve without the X-API-KEY check
    #[arg(long)]
    no_auth: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match &args.env_file {
        Some(path) => {
            dotenvy::from_path(path).with_context(|| format!("loading {}", path.display()))?;
        }
        None => {
            if let Err(e) = dotenvy::dotenv() {
                if !e.not_found() {
                    return Err(e.into());
                }
            }
        }
    }

    logging::init_tracing(Some(&args.log_level));
    logging::log_startup(COMPONENT, &format!("WebServer on {}:{}", args.host, args.port));

    let mut config = WebServerConfig::from_env()?;
    if let Some(dir) = args.images_dir {
        config.images_dir = dir;
    }

    let api_key = if args.no_auth {
        tracing::warn!("API key check disabled by --no-auth");
        None
    } else if config.api_key.is_none() {
        bail!("API_KEY is not set; set it or start with --no-auth");
    } else {
        config.api_key.clone()
    };

    tokio::fs::create_dir_all(&config.images_dir)
        .await
        .with_context(|| format!("creating images directory {}", config.images_dir.display()))?;

    let generator_config = GeneratorConfig::from_env()?;
    let dispatcher = Dispatcher::from_config(generator_config).await?;

    let http = reqwest::Client::builder().timeout(IMAGE_HTTP_TIMEOUT).build()?;
    let claid = ClaidClient::new(http.clone(), config.claid_api_host.clone(), config.claid_api_key.clone());
    let optimizer = ImageOptimizer::new(config.images_dir.clone(), config.image_size_limit, http, Arc::new(claid));

    let state = AppState::new(Arc::new(dispatcher), Arc::new(optimizer), api_key);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;

    if let Err(e) = WebServer::new(state, config.images_dir).run(addr).await {
        logging::log_error(COMPONENT, "WebServer", &e);
        return Err(e.into());
    }

    logging::log_success(COMPONENT, "WebServer stopped gracefully");
    Ok(())
}
