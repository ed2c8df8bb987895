//! The record list synchronizer.
//!
//! One [`RecordSynchronizer`] owns the loaded records of one module and
//! drives the load, render, mutate, reload cycle against a
//! [`RecordTransport`]. Loads are stamped with a [`LoadGeneration`]; a
//! response is applied only when its generation is still the newest one
//! issued, so an older response arriving late never overwrites a newer one.
//!
//! Failures surface the same way everywhere: the user is alerted through
//! the [`Prompt`] and the failure is logged.
//!
//! The query parameters of the latest load are kept, so the reload that
//! follows a save or delete shows the list under the same filters.

use crate::error::{SyncError, SyncResult};
use crate::prompt::Prompt;
use crate::state::{ModalMode, ModalState, SyncState};
use crate::transport::RecordTransport;
use healthcard_model::filter::ListQuery;
use healthcard_model::{
    Attachment, FieldError, FieldValue, FormValues, ListView, ModuleSchema, Record, StatTile,
    StatsView, render_list,
};
use healthcard_types::{Envelope, LoadGeneration, RecordId};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Fallback alert text when a rejected save carries no message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Result of a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the displayed records.
    Applied {
        generation: LoadGeneration,
        count: usize,
    },
    /// The server answered `success: false`; displayed records are unchanged.
    Rejected { message: String },
    /// A newer load was issued, or pending loads were cancelled, before
    /// this one finished.
    Discarded { generation: LoadGeneration },
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Result of a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Stored; the modal is closed and the list was reloaded.
    Saved { id: Option<RecordId> },
    /// The server refused with `message`; the modal stays open.
    Rejected { message: String },
    /// Local validation failed; nothing was sent.
    Invalid(Vec<FieldError>),
}

/// Result of a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(RecordId),
    Rejected { message: String },
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
}

/// Load/render/mutate/reload coordinator for one record module.
pub struct RecordSynchronizer<R: Record> {
    transport: Arc<dyn RecordTransport>,
    prompt: Arc<dyn Prompt>,
    state: Arc<RwLock<SyncState<R>>>,
}

impl<R: Record> Clone for RecordSynchronizer<R> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            prompt: Arc::clone(&self.prompt),
            state: Arc::clone(&self.state),
        }
    }
}

impl<R: Record> RecordSynchronizer<R> {
    /// Creates a synchronizer with no records loaded and no modal open.
    pub fn new(transport: Arc<dyn RecordTransport>, prompt: Arc<dyn Prompt>) -> Self {
        Self {
            transport,
            prompt,
            state: Arc::new(RwLock::new(SyncState::default())),
        }
    }

    pub fn schema(&self) -> &'static ModuleSchema {
        R::schema()
    }

    // ── Loading ──────────────────────────────────────────────────

    /// Fetches the module's records, with no query parameters, and replaces
    /// the displayed list.
    pub async fn load(&self) -> SyncResult<LoadOutcome> {
        self.load_with(&()).await
    }

    /// Like [`load`](Self::load) with query parameters.
    pub async fn load_with(&self, query: &(dyn ListQuery + Sync)) -> SyncResult<LoadOutcome> {
        self.load_params(query.params()).await
    }

    /// Loads again with the query parameters of the latest load.
    pub async fn reload(&self) -> SyncResult<LoadOutcome> {
        let params = self.state.read().await.query.clone();
        self.load_params(params).await
    }

    /// Query parameters the next [`reload`](Self::reload) will send.
    pub async fn current_query(&self) -> Vec<(&'static str, String)> {
        self.state.read().await.query.clone()
    }

    async fn load_params(&self, params: Vec<(&'static str, String)>) -> SyncResult<LoadOutcome> {
        let schema = R::schema();
        let generation = {
            let mut state = self.state.write().await;
            state.query = params.clone();
            state.issue()
        };
        debug!("[{}] load {generation} started", schema.name);

        let envelope = match self.transport.list(schema, params).await {
            Ok(envelope) => envelope,
            Err(e) => {
                if !self.is_current(generation).await {
                    warn!("[{}] load {generation} failed after being superseded: {e}", schema.name);
                    return Ok(LoadOutcome::Discarded { generation });
                }
                error!("[{}] load {generation} failed: {e}", schema.name);
                self.prompt.alert(&schema.load_failure_text());
                return Err(e);
            }
        };

        if !envelope.success {
            if !self.is_current(generation).await {
                return Ok(LoadOutcome::Discarded { generation });
            }
            let message = envelope
                .failure_message_or(&schema.load_failure_text())
                .to_string();
            warn!("[{}] load {generation} rejected: {message}", schema.name);
            self.prompt.alert(&message);
            return Ok(LoadOutcome::Rejected { message });
        }

        let (records, reported) = match Self::decode(&envelope) {
            Ok(decoded) => decoded,
            Err(e) => {
                if !self.is_current(generation).await {
                    return Ok(LoadOutcome::Discarded { generation });
                }
                error!("[{}] load {generation} returned malformed records: {e}", schema.name);
                self.prompt.alert(&schema.load_failure_text());
                return Err(e);
            }
        };
        let stats = R::derive_stats(&records, reported);

        let mut state = self.state.write().await;
        if !generation.is_current(state.issued) {
            warn!(
                "[{}] discarding stale load {generation} (latest is {})",
                schema.name, state.issued
            );
            return Ok(LoadOutcome::Discarded { generation });
        }
        let count = records.len();
        state.records = records;
        state.stats = stats;
        state.applied = generation;
        info!("[{}] loaded {count} records ({generation})", schema.name);
        Ok(LoadOutcome::Applied { generation, count })
    }

    fn decode(envelope: &Envelope) -> SyncResult<(Vec<R>, Option<R::Stats>)> {
        let schema = R::schema();
        let records = envelope.collection::<R>(schema.collection_key)?;
        let reported = match schema.stats_key {
            Some(key) => match envelope.field::<R::Stats>(key) {
                Ok(stats) => stats,
                Err(e) => {
                    warn!("[{}] ignoring malformed stats: {e}", schema.name);
                    None
                }
            },
            None => None,
        };
        Ok((records, reported))
    }

    async fn is_current(&self, generation: LoadGeneration) -> bool {
        generation.is_current(self.state.read().await.issued)
    }

    /// Invalidates every in-flight load. Their results will be discarded.
    pub async fn cancel_pending(&self) -> LoadGeneration {
        let generation = self.state.write().await.issue();
        debug!("[{}] pending loads cancelled ({generation})", R::schema().name);
        generation
    }

    /// Generation of the load whose records are displayed.
    pub async fn applied_generation(&self) -> LoadGeneration {
        self.state.read().await.applied
    }

    // ── Reading ──────────────────────────────────────────────────

    pub async fn records(&self) -> Vec<R> {
        self.state.read().await.records.clone()
    }

    pub async fn record(&self, id: RecordId) -> Option<R> {
        self.state.read().await.find(id).cloned()
    }

    pub async fn stats(&self) -> Option<R::Stats> {
        self.state.read().await.stats.clone()
    }

    /// The list view of the loaded records.
    pub async fn render(&self) -> ListView {
        render_list(&self.state.read().await.records)
    }

    pub async fn stat_tiles(&self) -> Vec<StatTile> {
        self.state
            .read()
            .await
            .stats
            .as_ref()
            .map(StatsView::tiles)
            .unwrap_or_default()
    }

    // ── Modal ────────────────────────────────────────────────────

    /// Opens the add modal (`None`) or the edit modal for a loaded record.
    ///
    /// The add modal always starts from a blank form. An id that is no
    /// longer loaded opens the add modal as well.
    pub async fn open_modal(&self, id: Option<RecordId>) -> SyncResult<ModalState> {
        let schema = R::schema();
        let editing = id.is_some() && schema.endpoints.update.is_none();
        if schema.is_read_only() || editing {
            return Err(SyncError::Unsupported {
                module: schema.name,
                operation: "edit",
            });
        }
        let mut state = self.state.write().await;
        if state.modal.as_ref().is_some_and(|m| m.submitting) {
            return Err(SyncError::Busy);
        }

        let (mode, form) = match id.map(|id| (id, state.find(id))) {
            Some((id, Some(record))) => (ModalMode::Edit(id), record.to_form()),
            Some((id, None)) => {
                warn!("[{}] record {id} is not loaded; opening add modal", schema.name);
                (ModalMode::Add, FormValues::blank(schema))
            }
            None => (ModalMode::Add, FormValues::blank(schema)),
        };
        let title = match mode {
            ModalMode::Edit(_) => schema.edit_title(),
            _ => schema.add_title(),
        };
        let suggestions = Self::suggestions_for(schema, &form);
        let modal = ModalState {
            mode,
            title,
            form,
            suggestions,
            submitting: false,
        };
        state.modal = Some(modal.clone());
        debug!("[{}] modal opened: {:?}", schema.name, mode);
        Ok(modal)
    }

    /// Opens the read-only detail modal for a loaded record.
    pub async fn open_view(&self, id: RecordId) -> SyncResult<ModalState> {
        let schema = R::schema();
        let mut state = self.state.write().await;
        if state.modal.as_ref().is_some_and(|m| m.submitting) {
            return Err(SyncError::Busy);
        }
        let form = state
            .find(id)
            .map(Record::to_form)
            .ok_or(SyncError::UnknownRecord(id))?;
        let modal = ModalState {
            mode: ModalMode::View(id),
            title: schema.view_title(),
            form,
            suggestions: Vec::new(),
            submitting: false,
        };
        state.modal = Some(modal.clone());
        Ok(modal)
    }

    /// Closes the modal. A modal with a save in flight stays open.
    pub async fn close_modal(&self) -> bool {
        let mut state = self.state.write().await;
        match &state.modal {
            Some(modal) if modal.submitting => false,
            Some(_) => {
                state.modal = None;
                true
            }
            None => false,
        }
    }

    pub async fn modal(&self) -> Option<ModalState> {
        self.state.read().await.modal.clone()
    }

    /// Sets one control of the open form. Changing the suggestion category
    /// repopulates the suggestions.
    pub async fn set_field(&self, name: &str, value: impl Into<FieldValue>) -> SyncResult<()> {
        let schema = R::schema();
        if schema.field(name).is_none() {
            return Err(SyncError::UnknownField(name.to_string()));
        }
        let mut state = self.state.write().await;
        let modal = Self::editable(&mut state.modal)?;
        modal.form.set(name, value);
        if let Some(catalog) = schema.suggestions {
            if catalog.category_field == name {
                modal.suggestions = catalog.lookup(modal.form.text(name)).to_vec();
            }
        }
        Ok(())
    }

    /// Adds a file to the open form.
    pub async fn attach(&self, attachment: Attachment) -> SyncResult<()> {
        let schema = R::schema();
        if schema.attachments.is_none() {
            return Err(SyncError::Unsupported {
                module: schema.name,
                operation: "attachments",
            });
        }
        let mut state = self.state.write().await;
        Self::editable(&mut state.modal)?.form.attach(attachment);
        Ok(())
    }

    /// Suggestions for `category`. When a modal is open they replace its
    /// current suggestions.
    pub async fn update_suggestions(&self, category: &str) -> Vec<&'static str> {
        let Some(catalog) = R::schema().suggestions else {
            return Vec::new();
        };
        let suggestions = catalog.lookup(category).to_vec();
        if let Some(modal) = self.state.write().await.modal.as_mut() {
            modal.suggestions = suggestions.clone();
        }
        suggestions
    }

    fn suggestions_for(schema: &ModuleSchema, form: &FormValues) -> Vec<&'static str> {
        schema
            .suggestions
            .map(|c| c.lookup(form.text(c.category_field)).to_vec())
            .unwrap_or_default()
    }

    fn editable(modal: &mut Option<ModalState>) -> SyncResult<&mut ModalState> {
        let modal = modal.as_mut().ok_or(SyncError::NoModal)?;
        match modal.mode {
            ModalMode::View(_) => Err(SyncError::ViewOnly),
            _ if modal.submitting => Err(SyncError::Busy),
            _ => Ok(modal),
        }
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Submits the open modal: create in add mode, update in edit mode.
    pub async fn save(&self) -> SyncResult<SaveOutcome> {
        let schema = R::schema();
        let (mode, body) = {
            let mut state = self.state.write().await;
            let modal = Self::editable(&mut state.modal)?;
            if let Err(errors) = modal.form.validate(schema) {
                let message = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n");
                warn!("[{}] save blocked by validation: {message}", schema.name);
                self.prompt.alert(&message);
                return Ok(SaveOutcome::Invalid(errors));
            }
            modal.submitting = true;
            (modal.mode, schema.body_from_form(&modal.form))
        };

        let result = match mode {
            ModalMode::Edit(id) => self.transport.update(schema, id, body).await,
            _ => self.transport.create(schema, body).await,
        };

        let mut state = self.state.write().await;
        if let Some(modal) = state.modal.as_mut() {
            modal.submitting = false;
        }
        match result {
            Ok(envelope) if envelope.success => {
                state.modal = None;
                drop(state);
                let id = mode.record_id();
                info!("[{}] saved {:?}", schema.name, mode);
                if let Err(e) = self.reload().await {
                    warn!("[{}] reload after save failed: {e}", schema.name);
                }
                let notice = match mode {
                    ModalMode::Edit(_) => schema.messages.updated,
                    _ => schema.messages.created,
                };
                if let Some(text) = notice {
                    self.prompt.alert(text);
                }
                Ok(SaveOutcome::Saved { id })
            }
            Ok(envelope) => {
                drop(state);
                let message = envelope.failure_message_or(UNKNOWN_ERROR).to_string();
                warn!("[{}] save rejected: {message}", schema.name);
                self.prompt.alert(&message);
                Ok(SaveOutcome::Rejected { message })
            }
            Err(e) => {
                drop(state);
                error!("[{}] save failed: {e}", schema.name);
                self.prompt.alert(&schema.save_failure_text());
                Err(e)
            }
        }
    }

    /// Deletes a record after the user confirms.
    pub async fn delete(&self, id: RecordId) -> SyncResult<DeleteOutcome> {
        let schema = R::schema();
        if schema.endpoints.delete.is_none() {
            return Err(SyncError::Unsupported {
                module: schema.name,
                operation: "delete",
            });
        }
        if !self.prompt.confirm(&schema.delete_prompt()) {
            debug!("[{}] delete of {id} cancelled", schema.name);
            return Ok(DeleteOutcome::Cancelled);
        }

        match self.transport.delete(schema, id).await {
            Ok(envelope) if envelope.success => {
                info!("[{}] deleted {id}", schema.name);
                if let Err(e) = self.reload().await {
                    warn!("[{}] reload after delete failed: {e}", schema.name);
                }
                Ok(DeleteOutcome::Deleted(id))
            }
            Ok(envelope) => {
                let message = envelope
                    .failure_message_or(&schema.delete_failure_text())
                    .to_string();
                warn!("[{}] delete of {id} rejected: {message}", schema.name);
                self.prompt.alert(&message);
                Ok(DeleteOutcome::Rejected { message })
            }
            Err(e) => {
                error!("[{}] delete of {id} failed: {e}", schema.name);
                self.prompt.alert(&schema.delete_failure_text());
                Err(e)
            }
        }
    }
}
