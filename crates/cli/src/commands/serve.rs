//! `persona serve` — start the HTTP gateway.

use persona_gateway::GatewayState;
use std::path::Path;
use std::sync::Arc;

use super::wiring;
use persona_config::AppConfig;

pub async fn run(config_path: &Path, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_from(config_path)?;
    let agent = wiring::build_agent(&config).await?;

    let state = Arc::new(GatewayState {
        agent,
        service_name: config.gateway.service_name.clone(),
    });

    let port = port.unwrap_or(config.gateway.port);
    persona_gateway::start(&config.gateway.host, port, state).await
}
