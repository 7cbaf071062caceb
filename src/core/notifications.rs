use chrono::{DateTime, Utc};

use crate::domain::model::{Notification, NotificationKind, Recipient, Session};
use crate::utils::error::{PortalError, Result};

/// Append-only feed of events. Entries are never deleted; only the `read`
/// flag ever changes after the fact.
#[derive(Debug, Default)]
pub struct NotificationFeed {
    items: Vec<Notification>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[Notification] {
        &self.items
    }

    #[allow(clippy::too_many_arguments)]
    pub fn append(
        &mut self,
        id: String,
        recipient: Recipient,
        title: &str,
        message: String,
        kind: NotificationKind,
        link_to: Option<String>,
        created_at: DateTime<Utc>,
    ) -> String {
        self.items.push(Notification {
            id: id.clone(),
            recipient,
            title: title.to_string(),
            message,
            read: false,
            created_at,
            kind,
            link_to,
        });
        id
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    /// Everything addressed to the session's user, their role, or broadcast.
    pub fn feed_for(&self, session: &Session) -> Vec<&Notification> {
        self.items
            .iter()
            .filter(|n| n.recipient.includes(&session.user_id, session.role))
            .collect()
    }

    pub fn unread_count_for(&self, session: &Session) -> usize {
        self.feed_for(session).iter().filter(|n| !n.read).count()
    }

    /// Marks one entry read, provided it is visible to the session.
    pub fn mark_read(&mut self, session: &Session, id: &str) -> Result<()> {
        let item = self
            .items
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| PortalError::NotFound {
                entity: "notification",
                id: id.to_string(),
            })?;
        if !item.recipient.includes(&session.user_id, session.role) {
            return Err(PortalError::Forbidden {
                role: session.role,
                action: "read another user's notification",
            });
        }
        item.read = true;
        Ok(())
    }

    pub fn mark_all_read_for(&mut self, session: &Session) {
        for item in &mut self.items {
            if item.recipient.includes(&session.user_id, session.role) {
                item.read = true;
            }
        }
    }
}
