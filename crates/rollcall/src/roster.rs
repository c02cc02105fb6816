//! In-memory record store for rollcall.
//!
//! The roster owns the contact records of one session together with the
//! selection used for bulk messages. Nothing is written to disk; the roster
//! is gone when the process exits.

use tracing::debug;

use crate::bulk::BulkSession;
use crate::contact::{ContactRecord, RecordId};
use crate::error::{Error, Result};
use crate::selection::Selection;

/// Ordered collection of contact records plus the bulk selection.
///
/// Invariants:
/// - record ids are unique and never reused, even after removal
/// - every selected id refers to a live record
#[derive(Debug, Clone)]
pub struct Roster {
    records: Vec<ContactRecord>,
    selection: Selection,
    next_id: u64,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            selection: Selection::new(),
            next_id: 1,
        }
    }
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contact.
    ///
    /// Both fields must be non-empty after trimming; they are stored as
    /// entered. Duplicate phones are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyField`] if the name or phone is blank. The
    /// roster is left unchanged in that case.
    pub fn add(&mut self, name: &str, phone: &str) -> Result<RecordId> {
        if name.trim().is_empty() {
            return Err(Error::empty_field("name"));
        }
        if phone.trim().is_empty() {
            return Err(Error::empty_field("phone"));
        }

        let id = RecordId::new(self.next_id);
        self.next_id += 1;
        self.records.push(ContactRecord::new(id, name, phone));

        debug!(%id, "Added contact");
        Ok(id)
    }

    /// Remove a contact, returning it if it existed.
    ///
    /// The id is also dropped from the selection.
    pub fn remove(&mut self, id: RecordId) -> Option<ContactRecord> {
        let index = self.records.iter().position(|r| r.id == id)?;
        let record = self.records.remove(index);
        if self.selection.remove(id) {
            debug!(%id, "Removed contact from selection");
        }
        debug!(%id, "Removed contact");
        Some(record)
    }

    /// Look up a contact by id.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&ContactRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// All contacts in insertion order.
    #[must_use]
    pub fn records(&self) -> &[ContactRecord] {
        &self.records
    }

    /// Contacts whose name contains `query`, ignoring case.
    #[must_use]
    pub fn find_by_name(&self, query: &str) -> Vec<&ContactRecord> {
        let needle = query.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Number of contacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the roster has no contacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // === Selection ===

    /// Flip selection of one contact, returning whether it is now selected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRecord`] if no contact has this id.
    pub fn toggle(&mut self, id: RecordId) -> Result<bool> {
        if self.get(id).is_none() {
            return Err(Error::UnknownRecord { id });
        }
        Ok(self.selection.toggle(id))
    }

    /// Select every contact, or deselect all of them if all are selected.
    pub fn toggle_all(&mut self) {
        if self.all_selected() {
            self.selection.clear();
        } else {
            self.selection.select_only(self.records.iter().map(|r| r.id));
        }
        debug!(selected = self.selection.len(), "Toggled selection of all contacts");
    }

    /// Deselect every contact.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Check whether a contact is selected.
    #[must_use]
    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selection.contains(id)
    }

    /// Number of selected contacts.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// `true` when the roster is non-empty and every contact is selected.
    #[must_use]
    pub fn all_selected(&self) -> bool {
        !self.records.is_empty() && self.selection.len() == self.records.len()
    }

    /// The selection itself.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected contacts in roster order.
    #[must_use]
    pub fn selected_records(&self) -> Vec<&ContactRecord> {
        self.records
            .iter()
            .filter(|r| self.selection.contains(r.id))
            .collect()
    }

    /// Snapshot the selected contacts into a new bulk session.
    ///
    /// Recipients are chosen by id, so two contacts sharing a phone number are
    /// only both included when both are selected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySelection`] if nothing is selected, or
    /// [`Error::EmptyField`] if the message is blank.
    pub fn compose_bulk(&self, message: &str) -> Result<BulkSession> {
        if self.selection.is_empty() {
            return Err(Error::EmptySelection);
        }
        let recipients = self.selected_records().into_iter().cloned().collect();
        BulkSession::new(recipients, message)
    }
}
