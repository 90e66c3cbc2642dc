//! `shastho ask` — Ask a single question from the terminal.
//!
//! Runs the same retrieval and prompt assembly as the HTTP gateway, but
//! without any session state: one question, one answer, exit.

use shastho_config::AppConfig;
use shastho_core::message::Turn;
use shastho_core::provider::{CompletionProvider, CompletionRequest};
use shastho_providers::GroqProvider;
use shastho_retrieval::{KnowledgeIndex, build_system_prompt};

pub async fn run(query: String) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let api_key = config
        .groq_api_key
        .clone()
        .ok_or("GROQ_API_KEY is not configured")?;
    let provider = GroqProvider::groq(api_key)?;

    let index = KnowledgeIndex::load_or_empty(&config.document_path, config.max_chunk_size);

    let system_prompt = build_system_prompt(&query, &index, config.top_k);
    let request = CompletionRequest {
        model: config.model.clone(),
        messages: vec![Turn::system(system_prompt), Turn::user(&query)],
        temperature: config.temperature,
        max_tokens: Some(config.max_completion_tokens),
    };

    eprint!("  Thinking...");
    let response = provider.complete(request).await?;
    eprint!("\r             \r");
    println!("{}", response.message.content);

    Ok(())
}
