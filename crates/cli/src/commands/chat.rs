//! `persona chat` — send one message through the local pipeline.
//!
//! Prints the reply and the thread id; pass the id back with `--thread`
//! to continue the conversation.

use persona_agent::GenerationRequest;
use std::path::Path;

use super::wiring;
use persona_config::AppConfig;

pub async fn run(
    config_path: &Path,
    message: String,
    role: String,
    thread: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_from(config_path)?;
    let agent = wiring::build_agent(&config).await?;

    let result = agent
        .generate(GenerationRequest {
            message,
            role,
            thread_id: thread,
        })
        .await?;

    println!("{}", result.text);
    println!("\n[thread: {}]", result.thread_id);

    Ok(())
}
