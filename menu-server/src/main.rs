use menu_server::{Server, ServerError, ServerState, setup_environment};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // 1. Environment (dotenv, config, logging)
    let config = match setup_environment() {
        Ok(config) => config,
        Err(e) => {
            menu_server::init_logger();
            tracing::error!(error = %e, "ConfigError");
            return Err(e.into());
        }
    };

    tracing::info!(
        environment = %config.environment,
        db_uri = %config.masked_db_uri(),
        "Menu server starting..."
    );

    // 2. Store, accounts, tokens
    let state = ServerState::initialize(&config)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to open menu store"))?;

    // 3. HTTP server
    Server::new(config, state)
        .run()
        .await
        .inspect_err(|e| tracing::error!("Server error: {}", e))
}
