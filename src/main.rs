use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use tokio::sync::Notify;

mod checker;
mod config;
mod error;
mod handler;
mod http;
mod logger;
mod model;
mod registry;
mod server;
mod store;
mod views;

#[cfg(test)]
mod test_support;

use store::SqliteStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: config file path without extension
    let cfg = match std::env::args().nth(1) {
        Some(path) => config::Config::load_from(&path)?,
        None => config::Config::load()?,
    };

    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let store = Arc::new(SqliteStore::open(&cfg.database.path)?);
    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(config::AppState::new(cfg, store)?);
    let active_connections = Arc::new(AtomicUsize::new(0));
    let shutdown = Arc::new(Notify::new());

    server::signal::start_signal_handler(Arc::clone(&shutdown))?;
    server::start_server_loop(listener, state, active_connections, shutdown).await;

    Ok(())
}
