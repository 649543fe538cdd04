// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`TicketStore`] backed by a single JSON file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use supportdesk_config::model::StorageConfig;
use supportdesk_core::{NewTicket, SupportError, SupportTicket, TicketStatus, TicketStore};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// JSON-file ticket store.
///
/// The parent directory and an empty `[]` document are created on first
/// access. A document that is valid JSON but not an array reads as empty.
pub struct JsonTicketStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonTicketStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.tickets_path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_store(&self) -> Result<(), SupportError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(SupportError::persistence)?;
        }
        if !fs::try_exists(&self.path)
            .await
            .map_err(SupportError::persistence)?
        {
            debug!(path = %self.path.display(), "creating empty ticket store");
            fs::write(&self.path, "[]")
                .await
                .map_err(SupportError::persistence)?;
        }
        Ok(())
    }

    async fn read_tickets(&self) -> Result<Vec<SupportTicket>, SupportError> {
        self.ensure_store().await?;
        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(SupportError::persistence)?;
        let document: serde_json::Value =
            serde_json::from_str(&raw).map_err(SupportError::persistence)?;
        if !document.is_array() {
            warn!(path = %self.path.display(), "ticket store is not a JSON array, treating as empty");
            return Ok(Vec::new());
        }
        serde_json::from_value(document).map_err(SupportError::persistence)
    }

    /// Replaces the whole document. Written to a sibling file first and
    /// renamed so readers never see a partial write.
    async fn write_tickets(&self, tickets: &[SupportTicket]) -> Result<(), SupportError> {
        self.ensure_store().await?;
        let json = serde_json::to_string_pretty(tickets).map_err(SupportError::persistence)?;
        let staging = staging_path(&self.path);
        fs::write(&staging, json)
            .await
            .map_err(SupportError::persistence)?;
        fs::rename(&staging, &self.path)
            .await
            .map_err(SupportError::persistence)
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait]
impl TicketStore for JsonTicketStore {
    async fn list(&self) -> Result<Vec<SupportTicket>, SupportError> {
        let mut tickets = self.read_tickets().await?;
        // Stable, so tickets updated at the same instant keep file order.
        tickets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(tickets)
    }

    async fn create(&self, input: NewTicket) -> Result<SupportTicket, SupportError> {
        let ticket = SupportTicket::new(input);

        let _guard = self.write_lock.lock().await;
        let mut tickets = self.read_tickets().await?;
        tickets.insert(0, ticket.clone());
        self.write_tickets(&tickets).await?;

        debug!(ticket_id = %ticket.id, total = tickets.len(), "ticket created");
        Ok(ticket)
    }

    async fn update_status(
        &self,
        id: &str,
        status: TicketStatus,
    ) -> Result<Option<SupportTicket>, SupportError> {
        let _guard = self.write_lock.lock().await;
        let mut tickets = self.read_tickets().await?;
        let Some(ticket) = tickets.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        ticket.set_status(status, Utc::now());
        let updated = ticket.clone();
        self.write_tickets(&tickets).await?;

        debug!(ticket_id = %id, %status, "ticket status updated");
        Ok(Some(updated))
    }
}
