//! CLI channel: stdin/stdout REPL for local use and testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::channels::channel::Channel;
use crate::error::ChannelError;
use crate::resources::CrisisDirectory;
use crate::session::{ChatService, ChatSession, Message, TurnOutcome};

/// A simple CLI channel that reads from stdin and writes to stdout.
pub struct CliChannel;

impl CliChannel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn run(&self, service: Arc<ChatService>) -> Result<(), ChannelError> {
        let mut session = service.open_session();

        let stdin = tokio::io::stdin();
        let reader = BufReader::new(stdin);
        let mut lines = reader.lines();

        for message in session.state().history() {
            print_bubble(message);
        }

        if !capture_consent(&mut session, &mut lines).await? {
            println!("Ohne beide Zustimmungen kann der Chat nicht gestartet werden.");
            return Ok(());
        }

        eprint!("> ");
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        eprint!("> ");
                        continue;
                    }
                    if line == "/quit" {
                        break;
                    }

                    eprintln!("⏳ Agent antwortet...");
                    match session.submit(&line).await {
                        Ok(TurnOutcome::Reply(message)) => print_bubble(&message),
                        Ok(TurnOutcome::Crisis { notice, directory }) => {
                            print_crisis(&notice, &directory);
                        }
                        Err(e) => eprintln!("⚠️  {}", e),
                    }
                    eprint!("> ");
                }
                Ok(None) => break, // EOF
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Ask for the two consent confirmations. Returns false when either is
/// declined or stdin closes.
async fn capture_consent(
    session: &mut ChatSession,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<bool, ChannelError> {
    println!("Bevor es losgeht, brauchen wir deine Zustimmung.");

    let terms = confirm(lines, "Nutzungsbedingungen akzeptieren? (ja/nein) > ").await?;
    let privacy = confirm(lines, "Datenschutzerklärung akzeptieren? (ja/nein) > ").await?;

    Ok(session.set_consent(terms, privacy))
}

async fn confirm(
    lines: &mut Lines<BufReader<Stdin>>,
    prompt: &str,
) -> Result<bool, ChannelError> {
    eprint!("{prompt}");
    let answer = lines.next_line().await.map_err(ChannelError::Io)?;
    Ok(answer
        .map(|a| a.trim().eq_ignore_ascii_case("ja"))
        .unwrap_or(false))
}

fn print_bubble(message: &Message) {
    let name = message
        .category
        .map(|c| c.display_name())
        .unwrap_or("Agent");
    println!("\n[{}] {}", name, message.content);
    if !message.resources.is_empty() {
        println!("Empfohlene Ressourcen:");
        for link in &message.resources {
            println!("  {}: {} ({})", link.title, link.url, link.summary);
        }
    }
    println!();
}

fn print_crisis(notice: &str, directory: &CrisisDirectory) {
    println!("\n🆘 Akute Krise - Sofortige Hilfe");
    println!("{notice}\n");
    println!("Telefonische Hilfe:");
    for contact in &directory.contacts {
        println!(
            "  {}: {} ({}, {})",
            contact.name, contact.phone, contact.description, contact.available
        );
    }
    println!("\nOnline-Beratung:");
    for resource in &directory.online {
        println!("  {}: {} ({})", resource.name, resource.url, resource.description);
    }
    println!();
}
