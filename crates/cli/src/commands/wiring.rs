//! Shared composition: build the agent pipeline from an explicit config.
//!
//! Provider and store are constructed here, once, and handed to the
//! service — nothing in the pipeline reaches for ambient defaults.

use persona_agent::{DynamicAgent, MemoryBackedService, ModelSettings};
use persona_config::AppConfig;
use persona_core::provider::Provider;
use persona_core::store::ThreadStore;
use persona_providers::OpenAiCompatProvider;
use std::sync::Arc;
use tracing::info;

pub async fn build_agent(config: &AppConfig) -> Result<DynamicAgent, Box<dyn std::error::Error>> {
    let provider = build_provider(config)?;
    let store = build_store(config).await?;

    info!(
        provider = provider.name(),
        store = store.name(),
        model = %config.provider.model,
        "Pipeline assembled"
    );

    let service = MemoryBackedService::new(
        provider,
        store,
        ModelSettings {
            model: config.provider.model.clone(),
            temperature: config.provider.temperature,
            max_tokens: Some(config.provider.max_tokens),
        },
    );

    Ok(DynamicAgent::new(Arc::new(service)))
}

fn build_provider(config: &AppConfig) -> Result<Arc<dyn Provider>, Box<dyn std::error::Error>> {
    let api_key = config.api_key.clone().unwrap_or_default();

    let provider = match config.provider.kind.as_str() {
        "openai" => match &config.provider.base_url {
            Some(url) => OpenAiCompatProvider::new("openai", url.as_str(), api_key)?,
            None => OpenAiCompatProvider::openai(api_key)?,
        },
        "openrouter" => OpenAiCompatProvider::openrouter(api_key)?,
        "ollama" => OpenAiCompatProvider::ollama(config.provider.base_url.as_deref())?,
        "custom" => {
            // validate() guarantees base_url is present for "custom"
            let url = config
                .provider
                .base_url
                .as_deref()
                .ok_or("provider.base_url missing for custom provider")?;
            OpenAiCompatProvider::new("custom", url, api_key)?
        }
        other => return Err(format!("unknown provider kind \"{other}\"").into()),
    };

    Ok(Arc::new(provider))
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn ThreadStore>, Box<dyn std::error::Error>> {
    match config.memory.backend.as_str() {
        "sqlite" => {
            // validate() guarantees the path is present
            let path = config
                .memory
                .path
                .as_ref()
                .ok_or("memory.path missing for sqlite backend")?;
            let store = persona_memory::SqliteStore::new(&path.to_string_lossy()).await?;
            Ok(Arc::new(store))
        }
        "in_memory" => Ok(Arc::new(persona_memory::InMemoryStore::new())),
        other => Err(format!("unknown memory backend \"{other}\"").into()),
    }
}
