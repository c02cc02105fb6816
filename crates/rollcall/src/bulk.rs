//! Bulk message sessions.
//!
//! A bulk session is a snapshot of the selected contacts and one message.
//! Each recipient starts `Pending` and moves to `Dispatched` when its link is
//! opened. The move is one-way: there is no failure state and no retry, and a
//! dispatched recipient ignores further sends.
//!
//! Sessions are never carried over. Composing a new one always starts every
//! recipient at `Pending`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::contact::{ContactRecord, RecordId};
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::link::LinkComposer;

/// Where a recipient is in the send flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipientState {
    /// Link not opened yet.
    Pending,
    /// Link opened. Says nothing about delivery.
    Dispatched,
}

impl std::fmt::Display for RecipientState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Dispatched => write!(f, "sent"),
        }
    }
}

/// Result of asking a session to dispatch one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The link was opened and the recipient is now dispatched.
    Opened {
        /// The link handed to the dispatcher.
        url: String,
    },
    /// The recipient was already dispatched; nothing was opened.
    AlreadyDispatched,
}

/// Label for the control that closes a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    /// Every recipient has been dispatched.
    Finish,
    /// Some recipients are still pending.
    Close,
}

impl std::fmt::Display for CloseAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finish => write!(f, "finish"),
            Self::Close => write!(f, "close"),
        }
    }
}

/// One bulk message and its per-recipient progress.
#[derive(Debug, Clone)]
pub struct BulkSession {
    recipients: Vec<ContactRecord>,
    message: String,
    dispatched: BTreeMap<RecordId, DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl BulkSession {
    /// Start a session for the given recipients.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySelection`] if there are no recipients, or
    /// [`Error::EmptyField`] if the message is blank.
    pub fn new(recipients: Vec<ContactRecord>, message: &str) -> Result<Self> {
        if recipients.is_empty() {
            return Err(Error::EmptySelection);
        }
        if message.trim().is_empty() {
            return Err(Error::empty_field("message"));
        }
        debug!(recipients = recipients.len(), "Composed bulk session");
        Ok(Self {
            recipients,
            message: message.to_string(),
            dispatched: BTreeMap::new(),
            created_at: Utc::now(),
        })
    }

    /// Recipients in roster order.
    #[must_use]
    pub fn recipients(&self) -> &[ContactRecord] {
        &self.recipients
    }

    /// The message sent to every recipient.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// When the session was composed.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Look up a recipient by id.
    #[must_use]
    pub fn recipient(&self, id: RecordId) -> Option<&ContactRecord> {
        self.recipients.iter().find(|r| r.id == id)
    }

    /// State of one recipient, or `None` if the id is not a recipient.
    #[must_use]
    pub fn state(&self, id: RecordId) -> Option<RecipientState> {
        self.recipient(id).map(|_| {
            if self.dispatched.contains_key(&id) {
                RecipientState::Dispatched
            } else {
                RecipientState::Pending
            }
        })
    }

    /// When the recipient's link was opened, if it has been.
    #[must_use]
    pub fn dispatched_at(&self, id: RecordId) -> Option<DateTime<Utc>> {
        self.dispatched.get(&id).copied()
    }

    /// Open the link for one recipient and mark it dispatched.
    ///
    /// A recipient that is already dispatched is left alone and the
    /// dispatcher is not called. If the dispatcher fails the recipient stays
    /// pending.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRecipient`] if `id` is not a recipient, or the
    /// dispatcher's error.
    pub fn dispatch(
        &mut self,
        id: RecordId,
        dispatcher: &dyn Dispatcher,
        composer: &LinkComposer,
    ) -> Result<DispatchOutcome> {
        let recipient = self
            .recipient(id)
            .ok_or(Error::UnknownRecipient { id })?;

        if self.dispatched.contains_key(&id) {
            debug!(%id, "Recipient already dispatched");
            return Ok(DispatchOutcome::AlreadyDispatched);
        }

        let url = composer.compose(&recipient.phone, &self.message);
        dispatcher.dispatch(&url)?;
        self.dispatched.insert(id, Utc::now());

        info!(
            %id,
            sent = self.dispatched.len(),
            total = self.recipients.len(),
            "Opened bulk message link"
        );
        Ok(DispatchOutcome::Opened { url })
    }

    /// Number of recipients dispatched so far.
    #[must_use]
    pub fn dispatched_count(&self) -> usize {
        self.dispatched.len()
    }

    /// Recipients still pending, in roster order.
    #[must_use]
    pub fn pending(&self) -> Vec<&ContactRecord> {
        self.recipients
            .iter()
            .filter(|r| !self.dispatched.contains_key(&r.id))
            .collect()
    }

    /// First recipient still pending.
    #[must_use]
    pub fn next_pending(&self) -> Option<&ContactRecord> {
        self.recipients
            .iter()
            .find(|r| !self.dispatched.contains_key(&r.id))
    }

    /// Phones of the dispatched recipients.
    #[must_use]
    pub fn sent_phones(&self) -> BTreeSet<&str> {
        self.recipients
            .iter()
            .filter(|r| self.dispatched.contains_key(&r.id))
            .map(|r| r.phone.as_str())
            .collect()
    }

    /// `true` once every recipient has been dispatched.
    #[must_use]
    pub fn all_dispatched(&self) -> bool {
        !self.recipients.is_empty() && self.dispatched.len() == self.recipients.len()
    }

    /// Label for the closing control.
    #[must_use]
    pub fn close_action(&self) -> CloseAction {
        if self.all_dispatched() {
            CloseAction::Finish
        } else {
            CloseAction::Close
        }
    }
}
