//! `docquery serve` — Start the HTTP gateway and web UI.

use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("DocQuery Gateway");
    println!("   Listening:  http://{}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:      {} ({})", config.model, config.provider);
    println!("   Collection: {}", config.vector_store.collection);

    docquery_gateway::start(config).await?;

    Ok(())
}
