// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket persistence trait.

use async_trait::async_trait;

use crate::error::SupportError;
use crate::types::{NewTicket, SupportTicket, TicketStatus};

/// Storage for support tickets.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// All tickets, most recently updated first.
    async fn list(&self) -> Result<Vec<SupportTicket>, SupportError>;

    /// Persists a new open ticket and returns it.
    async fn create(&self, input: NewTicket) -> Result<SupportTicket, SupportError>;

    /// Changes a ticket's status. Returns `None` when the id is unknown,
    /// in which case nothing is written.
    async fn update_status(
        &self,
        id: &str,
        status: TicketStatus,
    ) -> Result<Option<SupportTicket>, SupportError>;
}
