//! `chatrelay chat`: terminal client for a running relay.
//!
//! Reads prompts line by line, posts them to `/chat`, formats the reply and
//! plays it back with the typing reveal.

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use console::style;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use chatrelay_core::format::format_markdown;
use chatrelay_core::format::reveal::reveal;

/// Thin HTTP client for the relay's `/chat` endpoint.
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Send one prompt and return the relay's reply text.
    ///
    /// Relay-side failures come back as errors carrying the relay's message.
    pub async fn send(&self, prompt: &str, session_id: Option<&str>) -> anyhow::Result<String> {
        let mut body = json!({ "prompt": prompt });
        if let Some(id) = session_id {
            body["sessionId"] = json!(id);
        }

        let response = self
            .http
            .post(format!("{}/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("could not reach relay at {}", self.base_url))?;

        let status = response.status();
        let text = response.text().await?;

        let Ok(value) = serde_json::from_str::<Value>(&text) else {
            anyhow::bail!("relay returned {status}: {}", text.trim());
        };

        if status.is_success() {
            if let Some(reply) = value.get("response").and_then(Value::as_str) {
                return Ok(reply.to_string());
            }
        }

        let message = value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unexpected response");
        anyhow::bail!("relay returned {status}: {message}")
    }
}

/// Run the interactive loop until EOF or `/quit`.
pub async fn run_chat_loop(
    server: &str,
    session: Option<String>,
    plain: bool,
    delay: Duration,
) -> anyhow::Result<()> {
    let client = RelayClient::new(server);
    let session_id = session.unwrap_or_else(|| Uuid::now_v7().to_string());

    println!();
    println!(
        "  {} connected to {}",
        style("chatrelay").cyan().bold(),
        style(server).underlined()
    );
    println!("  {}", style(format!("session {session_id}")).dim());
    println!("  {}", style("Type /quit to exit").dim());
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!(
            "{} {} ",
            style(chrono::Local::now().format("%H:%M:%S")).dim(),
            style("you>").green().bold()
        );
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if matches!(prompt, "/quit" | "/exit") {
            break;
        }

        match client.send(prompt, Some(&session_id)).await {
            Ok(reply) => {
                let output = if plain { reply } else { format_markdown(&reply) };
                print!("{} ", style("bot>").magenta().bold());
                play(&output, delay).await?;
                println!();
                println!();
            }
            Err(e) => {
                eprintln!("  {} {e:#}", style("!").red().bold());
            }
        }
    }

    println!("\n  {}", style("Goodbye.").dim());
    Ok(())
}

/// Print `text` with the typing reveal, flushing after every step.
async fn play(text: &str, delay: Duration) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    let mut shown = 0;
    let mut result = Ok(());

    reveal(text, delay, |frame| {
        if result.is_err() {
            return;
        }
        result = write!(stdout, "{}", &frame[shown..]).and_then(|_| stdout.flush());
        shown = frame.len();
    })
    .await;

    Ok(result?)
}
