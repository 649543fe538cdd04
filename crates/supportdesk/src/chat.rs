// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `supportdesk chat` command implementation.
//!
//! Interactive REPL against a running server. Replies stream to stdout as
//! they arrive. A failed turn keeps the user message but drops the partial
//! reply; `/retry` resends exactly what the failed turn sent.

use std::io::Write;

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use supportdesk_core::{ChatMessage, ChatRole};

use crate::client::{ApiClient, ClientError, TicketDraft};
use crate::tickets::{DEFAULT_TITLE, print_ticket};

const MISSING_FIELDS: &str = "All ticket fields are required.";
const NOTHING_TO_ESCALATE: &str = "Send at least one message before escalating.";

/// Conversation state for one REPL session.
#[derive(Debug, Default)]
struct Conversation {
    messages: Vec<ChatMessage>,
    /// Message list of the last turn that failed.
    failed_turn: Option<Vec<ChatMessage>>,
}

impl Conversation {
    /// Appends the user message and returns the list to send.
    fn begin_turn(&mut self, text: &str) -> Vec<ChatMessage> {
        self.messages.push(ChatMessage::user(text));
        self.messages.clone()
    }

    /// The list the last failed turn sent, restored as the conversation.
    fn begin_retry(&mut self) -> Option<Vec<ChatMessage>> {
        let sent = self.failed_turn.take()?;
        self.messages = sent.clone();
        Some(sent)
    }

    fn finish_turn(&mut self, reply: String) {
        self.failed_turn = None;
        self.messages.push(ChatMessage::assistant(reply));
    }

    fn fail_turn(&mut self, sent: Vec<ChatMessage>) {
        self.failed_turn = Some(sent);
    }

    fn has_user_message(&self) -> bool {
        self.messages.iter().any(|m| m.role == ChatRole::User)
    }
}

/// Runs the `supportdesk chat` REPL.
pub async fn run_chat(client: &ApiClient) -> Result<(), ClientError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| ClientError::Terminal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "supportdesk chat".bold().green());
    println!("Connected to {}", client.base_url().dimmed());
    println!(
        "Commands: {} {} {}\n",
        "/retry".yellow(),
        "/escalate".yellow(),
        "/quit".yellow()
    );

    let prompt = format!("{}> ", "you".green());
    let mut conversation = Conversation::default();

    loop {
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(input);

        match input {
            "/quit" | "/exit" => break,
            "/retry" => match conversation.begin_retry() {
                Some(sent) => run_turn(client, &mut conversation, sent).await,
                None => eprintln!("{}", "Nothing to retry.".yellow()),
            },
            "/escalate" => {
                if !conversation.has_user_message() {
                    eprintln!("{}", NOTHING_TO_ESCALATE.yellow());
                    continue;
                }
                if let Err(e) = escalate(client, &mut rl, &conversation.messages).await {
                    eprintln!("{}: {e}", "error".red());
                }
            }
            text => {
                let sent = conversation.begin_turn(text);
                run_turn(client, &mut conversation, sent).await;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

async fn run_turn(client: &ApiClient, conversation: &mut Conversation, sent: Vec<ChatMessage>) {
    print!("{} ", "assistant>".cyan());
    std::io::stdout().flush().ok();

    let result = client
        .send_chat(&sent, |piece| {
            print!("{piece}");
            std::io::stdout().flush().ok();
        })
        .await;
    println!();

    match result {
        Ok(reply) => conversation.finish_turn(reply),
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            if e.is_retryable() {
                eprintln!("{}", "Type /retry to resend.".dimmed());
            }
            conversation.fail_turn(sent);
        }
    }
}

async fn escalate(
    client: &ApiClient,
    rl: &mut DefaultEditor,
    messages: &[ChatMessage],
) -> Result<(), ClientError> {
    let title = ask(rl, "Ticket title: ", DEFAULT_TITLE)?;
    let name = ask(rl, "Customer name: ", "")?;
    let email = ask(rl, "Customer email: ", "")?;
    if title.is_empty() || name.is_empty() || email.is_empty() {
        return Err(ClientError::Terminal(MISSING_FIELDS.to_string()));
    }

    let ticket = client
        .create_ticket(&TicketDraft {
            title: &title,
            customer_name: &name,
            customer_email: &email,
            messages,
        })
        .await?;
    println!("{} {}", "ticket created".green(), ticket.id);
    print_ticket(&ticket);
    Ok(())
}

fn ask(rl: &mut DefaultEditor, prompt: &str, initial: &str) -> Result<String, ClientError> {
    rl.readline_with_initial(prompt, (initial, ""))
        .map(|answer| answer.trim().to_string())
        .map_err(|e| ClientError::Terminal(format!("escalation cancelled: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_turn_is_replayed_verbatim() {
        let mut conversation = Conversation::default();
        let sent = conversation.begin_turn("my app is down");
        conversation.fail_turn(sent.clone());

        let replay = conversation.begin_retry().unwrap();
        assert_eq!(replay, sent);
        assert_eq!(conversation.messages, sent);
        assert!(conversation.begin_retry().is_none());
    }

    #[test]
    fn failed_turn_drops_no_user_message() {
        let mut conversation = Conversation::default();
        let sent = conversation.begin_turn("hello");
        conversation.fail_turn(sent);
        assert_eq!(conversation.messages.len(), 1);
        assert_eq!(conversation.messages[0].role, ChatRole::User);
    }

    #[test]
    fn successful_turn_appends_reply_and_clears_retry() {
        let mut conversation = Conversation::default();
        let sent = conversation.begin_turn("first");
        conversation.fail_turn(sent);
        let sent = conversation.begin_retry().unwrap();
        assert_eq!(sent.len(), 1);
        conversation.finish_turn("Try restarting.".into());

        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[1].role, ChatRole::Assistant);
        assert!(conversation.begin_retry().is_none());
    }

    #[test]
    fn escalation_needs_a_user_message() {
        let mut conversation = Conversation::default();
        assert!(!conversation.has_user_message());
        conversation.begin_turn("help");
        assert!(conversation.has_user_message());
    }
}
