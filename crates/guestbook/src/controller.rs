//! The guestbook controller.
//!
//! [`Guestbook`] owns the sequence, the current filter text, the persistence
//! accessor and the display surface. Each operation is one
//! read-mutate-persist-render step; when persisting fails the in-memory
//! change is undone so memory and storage never diverge.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::persistence::GuestStore;
use crate::record::{GuestForm, GuestRecord, RecordId};
use crate::storage::SlotBackend;
use crate::surface::{Confirm, Notice, NoticeTiming, Surface, CLEAR_ALL_PROMPT};
use crate::view::{self, GuestbookView, ViewOptions};

/// Which required input was empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    /// Name was empty after trimming.
    Name,
    /// Message was empty after trimming.
    Message,
}

/// Result of an add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A record was created.
    Added(RecordId),
    /// The form was ignored; nothing changed.
    Rejected(MissingField),
}

/// Result of a clear-all request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The sequence was already empty; nobody was asked.
    NothingToClear,
    /// The user declined.
    Declined,
    /// Every record was removed.
    Cleared(usize),
}

/// Presentation settings for a controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestbookOptions {
    /// How rows are rendered.
    pub view: ViewOptions,
    /// Timing of the thank-you notice.
    pub notice: NoticeTiming,
}

/// Counts over the current sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestbookStats {
    /// Number of records.
    pub total: usize,
    /// Records marked as attended.
    pub attended: usize,
    /// Creation time of the newest record.
    pub newest: Option<DateTime<Utc>>,
    /// Creation time of the oldest record.
    pub oldest: Option<DateTime<Utc>>,
}

/// Guestbook state container and action handlers.
#[derive(Debug)]
pub struct Guestbook<B, S> {
    store: GuestStore<B>,
    surface: S,
    records: Vec<GuestRecord>,
    filter: String,
    options: GuestbookOptions,
}

impl<B: SlotBackend, S: Surface> Guestbook<B, S> {
    /// Load the sequence from `store` and render it unfiltered.
    #[must_use]
    pub fn open(store: GuestStore<B>, surface: S, options: GuestbookOptions) -> Self {
        let records = store.load();
        info!("Loaded {} guest records from slot '{}'", records.len(), store.key());
        let mut guestbook = Self {
            store,
            surface,
            records,
            filter: String::new(),
            options,
        };
        guestbook.refresh();
        guestbook
    }

    /// Records, newest first.
    #[must_use]
    pub fn records(&self) -> &[GuestRecord] {
        &self.records
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&GuestRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Current filter text.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The surface this guestbook renders to.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The persistence accessor.
    #[must_use]
    pub fn store(&self) -> &GuestStore<B> {
        &self.store
    }

    /// The view for the current sequence and filter.
    #[must_use]
    pub fn view(&self) -> GuestbookView {
        view::render(&self.records, &self.filter, &self.options.view)
    }

    /// Counts over the current sequence.
    #[must_use]
    pub fn stats(&self) -> GuestbookStats {
        GuestbookStats {
            total: self.records.len(),
            attended: self.records.iter().filter(|r| r.attended).count(),
            newest: self.records.iter().map(|r| r.timestamp).max(),
            oldest: self.records.iter().map(|r| r.timestamp).min(),
        }
    }

    /// Sign the guestbook.
    ///
    /// Empty name or message (after trimming) is silently rejected. On
    /// success the record is prepended, the filter is reset, the form is
    /// reset and a thank-you notice is shown.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated sequence cannot be persisted; the
    /// sequence is left unchanged.
    pub fn add(&mut self, form: &GuestForm) -> Result<AddOutcome> {
        let name = form.trimmed_name();
        let message = form.trimmed_message();
        if name.is_empty() {
            debug!("Ignoring guest form without a name");
            return Ok(AddOutcome::Rejected(MissingField::Name));
        }
        if message.is_empty() {
            debug!("Ignoring guest form without a message");
            return Ok(AddOutcome::Rejected(MissingField::Message));
        }

        let record = self.unique_record(GuestRecord::new(name, message, form.attended));
        let id = record.id.clone();

        self.records.insert(0, record);
        if let Err(e) = self.store.save(&self.records) {
            self.records.remove(0);
            warn!(error = %e, "Failed to persist new guest, discarded");
            return Err(e);
        }
        info!(id = %id, "Guest added");

        self.filter.clear();
        self.refresh();
        self.surface.reset_form();
        self.surface
            .show_notice(&Notice::thank_you(self.options.notice));
        Ok(AddOutcome::Added(id))
    }

    /// Remove the record with `id`, keeping the current filter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no record has that id, or a
    /// storage error if the change cannot be persisted (the record is put
    /// back).
    pub fn delete(&mut self, id: &RecordId) -> Result<GuestRecord> {
        let position = self.position(id)?;
        let removed = self.records.remove(position);

        if let Err(e) = self.store.save(&self.records) {
            self.records.insert(position, removed);
            warn!(id = %id, error = %e, "Failed to persist deletion, restored");
            return Err(e);
        }
        info!(id = %id, "Guest deleted");

        self.refresh();
        Ok(removed)
    }

    /// Flip the attendance flag of the record with `id`, keeping the current
    /// filter. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no record has that id, or a
    /// storage error if the change cannot be persisted (the flag is restored).
    pub fn toggle_attendance(&mut self, id: &RecordId) -> Result<bool> {
        let position = self.position(id)?;
        let attended = !self.records[position].attended;
        self.records[position].attended = attended;

        if let Err(e) = self.store.save(&self.records) {
            self.records[position].attended = !attended;
            warn!(id = %id, error = %e, "Failed to persist attendance, restored");
            return Err(e);
        }
        debug!(id = %id, attended, "Attendance toggled");

        self.refresh();
        Ok(attended)
    }

    /// Remove every record after asking `confirm`.
    ///
    /// Nothing is asked when the sequence is already empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be removed; the sequence is left
    /// unchanged.
    pub fn clear_all<C: Confirm + ?Sized>(&mut self, confirm: &mut C) -> Result<ClearOutcome> {
        if self.records.is_empty() {
            return Ok(ClearOutcome::NothingToClear);
        }
        if !confirm.confirm(CLEAR_ALL_PROMPT) {
            debug!("Clear all declined");
            return Ok(ClearOutcome::Declined);
        }

        self.store.clear()?;
        let cleared = self.records.len();
        self.records.clear();
        info!("Cleared {} guests", cleared);

        self.filter.clear();
        self.refresh();
        self.surface.clear_filter_input();
        Ok(ClearOutcome::Cleared(cleared))
    }

    /// Set the filter text and re-render.
    pub fn search(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.refresh();
    }

    /// Re-render the current view to the surface.
    pub fn refresh(&mut self) {
        let view = self.view();
        self.surface.replace(&view);
    }

    fn position(&self, id: &RecordId) -> Result<usize> {
        self.records
            .iter()
            .position(|record| &record.id == id)
            .ok_or_else(|| Error::not_found(id))
    }

    /// Re-derive `record`'s id until it is unused in the sequence.
    fn unique_record(&self, mut record: GuestRecord) -> GuestRecord {
        let taken: HashSet<&RecordId> = self.records.iter().map(|r| &r.id).collect();
        let mut salt = 0;
        while taken.contains(&record.id) {
            salt += 1;
            record.rederive_id(salt);
        }
        record
    }
}
