use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::relay::{Dispatcher, HttpTransport};
use crate::responses::error_to_response;
use crate::router::{handle, AppState};
use astra::Server;
use std::sync::Arc;

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod logging;
mod relay;
mod responses;
mod router;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    let config = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };
    logging::init(config.log_level);

    // 1️⃣ Create the database handle and apply the schema
    let db = Database::new(config.db_path.clone());
    if let Err(e) = init_db(&db) {
        log::error!("Database initialization failed: {e}");
        std::process::exit(1);
    }

    // 2️⃣ Outbound client for the Apps Script endpoint
    let transport = match HttpTransport::new(config.webhook_timeout, config.webhook_max_redirects) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Webhook client setup failed: {e}");
            std::process::exit(1);
        }
    };

    let addr = config.bind_addr;
    let workers = config.workers;
    let state = AppState {
        dispatcher: Dispatcher::new(db.clone(), Arc::new(transport)),
        db,
        config,
    };

    // 3️⃣ Start the server
    log::info!("Starting server at http://{addr}");
    let server = Server::bind(&addr).max_workers(workers);

    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        log::error!("Server ended with error: {e}");
    }

    log::info!("Server shut down cleanly.");
}
