//! Completion and retrieval example
//!
//! Embeds a question, pulls the nearest passages from Qdrant and asks the
//! completion server to answer with them in the system prompt.
//!
//! To run this example against local backends:
//! ```
//! ADVISOR_LLM_BASE_URL=http://localhost:8000 cargo run --example llm_completion
//! ```

use tool_sdk::{
    config::{LlmConfig, QdrantConfig, DEFAULT_PROVIDER},
    error::Result,
    services::llm::{ChatMessage, LlmClient},
    services::qdrant::QdrantClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let llm = LlmClient::new(LlmConfig::from_provider(DEFAULT_PROVIDER.as_ref())?)?;
    let qdrant = QdrantClient::new(QdrantConfig::from_provider(DEFAULT_PROVIDER.as_ref())?)?;

    let question = "How can I reset my password?";
    println!("Embedding question with {}...", llm.model());
    let vector = llm.embed(question).await?;

    let passages = qdrant.search(&vector, 3).await?;
    println!("Retrieved {} passages from {}", passages.len(), qdrant.collection());

    let mut system = "You are a helpful support assistant.".to_string();
    if !passages.is_empty() {
        system.push_str("\nRetrieved passages:\n");
        system.push_str(&passages.join("\n"));
    }

    let answer = llm
        .complete(vec![ChatMessage::system(system), ChatMessage::user(question)], Vec::new())
        .await?;

    println!("Answer:\n{}", answer);
    Ok(())
}
