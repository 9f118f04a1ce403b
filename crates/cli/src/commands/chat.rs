//! Chat command handler.
//!
//! Runs the question-answering pipeline over the indexed reviews, one-shot
//! or as an interactive loop.

use clap::Args;
use shopqa_chat::{ChatInput, RagChain, RagChainBuilder};
use shopqa_core::{config::AppConfig, AppResult};
use shopqa_llm::create_model;
use shopqa_retrieval::{create_provider, SqliteIndex};
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Chat over the indexed reviews
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Question to ask (omit for an interactive session)
    #[arg(short = 'q', long)]
    pub input: Option<String>,

    /// Session key for conversational memory
    #[arg(short, long, default_value = "default")]
    pub session: String,

    /// Print retrieved context alongside the answer
    #[arg(long)]
    pub show_context: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command (session '{}')", self.session);

        config.validate()?;

        let api_key = config.resolve_api_key();
        let model = create_model(
            &config.provider,
            config.endpoint.as_deref(),
            api_key.as_deref(),
        )?;

        let embedder = create_provider(
            &config.embedding_provider,
            &config.embedding_model,
            None,
        )?;
        let index = Arc::new(SqliteIndex::open(&config.index_path, embedder)?);

        let chain = RagChainBuilder::new(index, model, &config.model)
            .with_temperature(config.temperature)
            .with_top_k(config.top_k)
            .build_chain();

        match &self.input {
            Some(question) => self.ask_once(&chain, question).await,
            None => self.interactive(&chain).await,
        }
    }

    /// Answer a single question and print the result.
    async fn ask_once(&self, chain: &RagChain, question: &str) -> AppResult<()> {
        let output = chain
            .invoke(ChatInput {
                input: question.to_string(),
                session_id: self.session.clone(),
            })
            .await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("{}", output.answer);

        if self.show_context {
            for doc in &output.context {
                println!();
                match doc.product_name() {
                    Some(name) => println!("[{}] {}", name, doc.content.replace('\n', " | ")),
                    None => println!("{}", doc.content.replace('\n', " | ")),
                }
            }
        }

        Ok(())
    }

    /// Read questions from stdin until EOF or "exit".
    async fn interactive(&self, chain: &RagChain) -> AppResult<()> {
        println!("shopqa chat (session '{}'). Type 'exit' to quit.", self.session);

        let stdin = std::io::stdin();
        loop {
            print!("you> ");
            std::io::stdout().flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }

            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if question == "exit" || question == "quit" {
                break;
            }

            match self.ask_once(chain, question).await {
                Ok(()) => {}
                Err(e) => eprintln!("error: {}", e),
            }
        }

        Ok(())
    }
}
