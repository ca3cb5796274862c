//! Terminal chat REPL for the Chitti assistant.
//!
//! Runs the rule engine over an in-memory conversation store. Besides free
//! text, the prompt accepts a few slash commands:
//!
//! ```text
//! /history          show this session's exchanges
//! /good | /bad      rate the previous reply
//! /stats            average confidence and volume
//! /learn            run the feedback learning pass
//! /save <path>      archive the conversation log as JSON
//! /quit             exit
//! ```

use chitti_core::{
    ChatRequest, ChatService, ConversationArchive, Feedback, InMemoryStore,
};
use std::io::{self, Write};
use std::sync::Arc;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present, then honor RUST_LOG.
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let store = Arc::new(InMemoryStore::new());
    let service = ChatService::builtin(store.clone())?;
    let session_id = Uuid::new_v4().to_string();
    let user_id = Uuid::new_v4();
    tracing::info!(session = %session_id, "chat session started");

    println!("Chitti");
    println!("======");
    println!("Namaste! Type a question, /help for commands, /quit to exit.\n");

    let mut last_conversation: Option<Uuid> = None;

    loop {
        print!("you: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break; // EOF
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        match input.split_whitespace().next() {
            Some("/quit") | Some("/exit") => {
                println!("Alvida!");
                break;
            }
            Some("/help") => {
                print_help();
            }
            Some("/history") => {
                let history = service.history(user_id, Some(&session_id)).await?;
                if history.is_empty() {
                    println!("(no exchanges yet)");
                }
                for reply in history.iter().rev() {
                    println!(
                        "[{} {:.2}] {}",
                        reply.language, reply.confidence, reply.response
                    );
                }
            }
            Some("/good") | Some("/bad") => {
                let Some(conversation_id) = last_conversation else {
                    println!("(nothing to rate yet)");
                    continue;
                };
                let feedback = if input.starts_with("/good") {
                    Feedback::Good
                } else {
                    Feedback::Bad
                };
                service.provide_feedback(conversation_id, feedback, None).await?;
                println!("(feedback recorded: {feedback})");
            }
            Some("/stats") => {
                let stats = service.performance_stats().await?;
                let insights = service.learning_insights().await?;
                println!(
                    "{} conversations, average confidence {:.2}, learned {} ({:.0}%)",
                    stats.total_conversations,
                    stats.average_confidence,
                    insights.learned_conversations,
                    insights.learning_rate * 100.0
                );
            }
            Some("/learn") => {
                let flipped = service.learn_from_feedback().await?;
                println!("(learned from {flipped} flagged conversations)");
            }
            Some("/save") => {
                let Some(path) = input.split_whitespace().nth(1) else {
                    println!("usage: /save <path>");
                    continue;
                };
                let archive = ConversationArchive::export(store.as_ref()).await?;
                archive.save_json(path).await?;
                println!("(saved {} conversations to {path})", archive.metadata.conversations);
            }
            _ => {
                let request =
                    ChatRequest::new(input, session_id.clone()).with_user(user_id);
                let reply = service.ask(request).await?;
                last_conversation = Some(reply.conversation_id);
                println!("chitti: {}", reply.response);
                println!("        [{} | confidence {:.2}]", reply.language, reply.confidence);
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("Chitti - rule-based chat assistant");
    println!();
    println!("Ask about the owner, his family, or the assistant itself, in");
    println!("Hindi, English, or a mix of both.");
    println!();
    println!("Commands:");
    println!("  /history       show this session's exchanges");
    println!("  /good, /bad    rate the previous reply");
    println!("  /stats         average confidence and volume");
    println!("  /learn         run the feedback learning pass");
    println!("  /save <path>   archive the conversation log as JSON");
    println!("  /quit          exit");
}
