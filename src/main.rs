use dotenv::dotenv;
use tracing::{error, info, warn};

use planner_crm_backend::app::app::App;
use planner_crm_backend::util::logger::Logger;

#[tokio::main]
async fn main() {
    let dotenv_result = dotenv();

    // Guards must live until shutdown so buffered log lines are flushed.
    let _logger = match Logger::new() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting planner CRM backend");
    match dotenv_result {
        Ok(_) => info!("Loaded .env file"),
        Err(e) => warn!("Failed to load .env file: {} (using system env vars)", e),
    }

    let app = match App::new().await {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = app.start().await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
