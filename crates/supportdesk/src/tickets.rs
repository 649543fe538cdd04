// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `supportdesk tickets` command implementations.

use chrono::Local;
use colored::Colorize;
use supportdesk_core::{ChatMessage, SupportTicket, TicketStatus};

use crate::client::{ApiClient, ClientError, TicketDraft};

pub const DEFAULT_TITLE: &str = "Need agent follow-up";

/// `supportdesk tickets list`
pub async fn run_list(client: &ApiClient) -> Result<(), ClientError> {
    let tickets = client.list_tickets().await?;
    if tickets.is_empty() {
        println!("{}", "No tickets yet.".dimmed());
        return Ok(());
    }
    for ticket in &tickets {
        print_ticket(ticket);
    }
    Ok(())
}

/// `supportdesk tickets create`
///
/// Each `--message` becomes one user message of the escalated conversation.
pub async fn run_create(
    client: &ApiClient,
    title: &str,
    name: &str,
    email: &str,
    messages: &[String],
) -> Result<(), ClientError> {
    let messages: Vec<ChatMessage> = messages.iter().map(ChatMessage::user).collect();
    let ticket = client
        .create_ticket(&TicketDraft {
            title,
            customer_name: name,
            customer_email: email,
            messages: &messages,
        })
        .await?;
    println!("{} {}", "created".green(), ticket.id);
    print_ticket(&ticket);
    Ok(())
}

/// `supportdesk tickets status <id> <status>`
pub async fn run_status(client: &ApiClient, id: &str, status: &str) -> Result<(), ClientError> {
    let ticket = client.update_status(id, status).await?;
    println!("{} {} -> {}", "updated".green(), ticket.id, ticket.status);
    Ok(())
}

pub fn print_ticket(ticket: &SupportTicket) {
    let status = match ticket.status {
        TicketStatus::Open => ticket.status.to_string().cyan(),
        TicketStatus::InProgress => ticket.status.to_string().yellow(),
        TicketStatus::Resolved => ticket.status.to_string().green(),
    };
    println!("{} [{status}]", ticket.title.bold());
    println!("{}", format_details(ticket));
}

/// Everything below the title line, uncolored.
fn format_details(ticket: &SupportTicket) -> String {
    let created = ticket
        .created_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M");
    let summary: Vec<String> = ticket
        .summary
        .lines()
        .map(|line| format!("    {line}"))
        .collect();
    format!(
        "  id:       {}\n  customer: {} ({})\n  created:  {created}\n  summary:\n{}\n",
        ticket.id,
        ticket.customer_name,
        ticket.customer_email,
        summary.join("\n")
    )
}
