//! Terminal chat client for the relay
//!
//! Interactive mode reads lines from stdin and renders the streamed reply
//! progressively. `--stress N` instead runs the batch load generator until
//! Ctrl-C, which stops the loop after the in-flight batch completes.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use chat_relay::client::{run_stress_loop, session, ChatSession, RelayClient};

#[derive(Parser, Debug)]
#[command(name = "chat", about = "Terminal client for the chat relay")]
struct Args {
    /// Relay endpoint to talk to
    #[arg(long, default_value = "http://127.0.0.1:8080/api/chat")]
    endpoint: String,

    /// API key forwarded with each request; falls back to the relay's own
    /// configured key when omitted
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name forwarded with each request
    #[arg(long)]
    model: Option<String>,

    /// Run the batch load generator with this many parallel requests per
    /// batch instead of the interactive prompt
    #[arg(long, value_name = "N")]
    stress: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let client = RelayClient::new(&args.endpoint)
        .with_api_key(args.api_key)
        .with_model(args.model);

    match args.stress {
        Some(batch_size) => run_stress(&client, batch_size).await,
        None => run_interactive(&client).await,
    }
}

async fn run_interactive(client: &RelayClient) -> Result<()> {
    let mut session = ChatSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("> ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        if let Some(payload) = session.begin_send(&line) {
            print!("{}", session::PENDING_INDICATOR);
            std::io::stdout().flush()?;
            let mut first_chunk = true;

            let result = client
                .send(payload, |chunk| {
                    if first_chunk {
                        // Overwrite the pending indicator once text arrives.
                        print!("\r   \r");
                        first_chunk = false;
                    }
                    session.apply_chunk(chunk);
                    print!("{chunk}");
                    let _ = std::io::stdout().flush();
                })
                .await;

            match result {
                Ok(()) => session.finish(),
                Err(e) => {
                    tracing::error!("send failed: {e}");
                    session.fail();
                    if first_chunk {
                        print!("\r   \r");
                    }
                    print!("{}", session::ERROR_REPLY);
                }
            }
            println!();
        }
        print!("> ");
        std::io::stdout().flush()?;
    }
    Ok(())
}

async fn run_stress(client: &RelayClient, batch_size: usize) -> Result<()> {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_signal = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nStop signal received, halting after current batch...");
            stop_signal.store(true, Ordering::Relaxed);
        }
    });

    let mut session = ChatSession::new();
    run_stress_loop(client, batch_size, stop, |report| {
        session.push_summary(&report.summary());
        println!("{}", report.summary());
    })
    .await;
    Ok(())
}
