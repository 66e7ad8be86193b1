mod client;
mod collectors;
mod config;
mod http;

use clap::Parser;
use client::sampler::Sampler;
use client::HttpFetcher;
use collectors::system::SysinfoSource;
use config::Config;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hostwatch")]
#[command(version)]
struct Cli {
    #[arg(long, default_value = "./config.yaml")]
    config: String,
    #[arg(long)]
    print_default_config: bool,
    /// Poll the collector and render classified stats instead of serving.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if cli.print_default_config {
        println!("{}", Config::example_yaml());
        return;
    }

    let cfg = match Config::load_or_default(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            error!(error = %err, "failed to load config");
            std::process::exit(1);
        }
    };

    if cli.watch {
        run_watch(&cfg).await;
    } else {
        run_server(&cfg).await;
    }
}

async fn run_server(cfg: &Config) {
    info!(listen = %cfg.listen, "starting hostwatch collector");

    let addr: SocketAddr = match cfg.listen.parse() {
        Ok(addr) => addr,
        Err(err) => {
            error!(error = %err, listen = %cfg.listen, "invalid listen address");
            std::process::exit(1);
        }
    };

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let http_task = tokio::spawn(async move {
        let app = http::build_router(Arc::new(SysinfoSource));
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(err) => {
                error!(error = %err, "failed to bind HTTP listener");
                return;
            }
        };

        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        });
        if let Err(err) = server.await {
            error!(error = %err, "HTTP server error");
        }
    });

    wait_for_ctrl_c().await;
    let _ = shutdown_tx.send(true);
    let _ = http_task.await;
}

async fn run_watch(cfg: &Config) {
    let url = cfg.resolve_stats_url();
    let interval = cfg.poll_interval();
    info!(url = %url, interval_ms = cfg.poll_interval_ms, "starting hostwatch sampling client");

    let mut sampler = Sampler::new(HttpFetcher::new(url), interval);
    let display = sampler.display();
    sampler.start();

    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let state = display.read().await.clone();
                println!("{}\n", client::render::render(&state));
            }
        }
    }

    info!("received Ctrl+C, pausing sampler");
    sampler.pause();
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn wait_for_ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to wait for Ctrl+C");
    }
    info!("received Ctrl+C, shutting down");
}
