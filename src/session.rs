// 🎛️ Session - the single application-state object
//
// Owns the catalog, the visual list, the editable text, the validation
// report, both reorder state machines, the modal stack and the credential.
// Created once the catalog is loaded, dropped when the client exits.

use crate::catalog::Catalog;
use crate::client::InstanceApi;
use crate::credential::CredentialStore;
use crate::errors::ClientError;
use crate::instance::{normalize_blob, pokemon_ids, with_pokemon_ids, InstanceSummary};
use crate::modal::{ModalBody, ModalManager};
use crate::priority_list::PriorityList;
use crate::reorder::{DragController, RankCommit, RankEditor, RowBounds};
use crate::text_buffer::TextBuffer;
use crate::validation::{ValidationReport, Validator};
use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

pub const AUTH_FAILED_MESSAGE: &str = "Failed to authenticate. Please log in again.";
pub const COPIED_MESSAGE: &str = "Priority order copied to clipboard!";
pub const EMPTY_PASSWORD_MESSAGE: &str = "Please enter a password";

pub struct Session {
    catalog: Catalog,
    list: PriorityList,
    text: TextBuffer,
    report: ValidationReport,
    pub drag: DragController,
    pub rank_editor: RankEditor,
    pub modals: ModalManager,
    credential: CredentialStore,
    status: Option<String>,
}

impl Session {
    /// Initial state: every catalog id in catalog order, ranks 1..N
    pub fn new(catalog: Catalog, credential: CredentialStore) -> Self {
        let list = PriorityList::from_catalog(&catalog);
        let text = TextBuffer::from_text(&list.serialize());

        Self {
            catalog,
            list,
            text,
            report: ValidationReport::default(),
            drag: DragController::new(),
            rank_editor: RankEditor::new(),
            modals: ModalManager::new(),
            credential,
            status: None,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn list(&self) -> &PriorityList {
        &self.list
    }

    pub fn text(&self) -> &TextBuffer {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut TextBuffer {
        &mut self.text
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn is_logged_in(&self) -> bool {
        self.credential.is_logged_in()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    // ========================================================================
    // LIST ⇄ TEXT
    // ========================================================================

    /// Re-validate the text. A clean text is canonical and rebuilds the
    /// visual list; otherwise the list stays as it was.
    pub fn text_changed(&mut self) {
        let text = self.text.text();
        self.report = Validator::new(&self.catalog).validate(&text);
        if self.report.is_valid() {
            self.list = PriorityList::from_text(&text, &self.catalog);
        }
    }

    /// The list moved: rewrite the text from it
    fn list_changed(&mut self) {
        self.text.set_text(&self.list.serialize());
        self.report = Validator::new(&self.catalog).validate(&self.list.serialize());
    }

    /// Replace the text with the repaired permutation and rebuild
    pub fn apply_fix(&mut self) {
        let fixed = Validator::new(&self.catalog).fix(&self.text.text());
        self.text.set_text(&fixed.join("\n"));
        self.list = PriorityList::from_ids(&fixed, &self.catalog);
        self.text_changed();
        info!(entries = self.list.len(), "priority order fixed");
    }

    /// Load an id sequence from a saved instance. The list is rebuilt from
    /// it even when the saved list no longer matches the catalog exactly.
    pub fn import_ids(&mut self, ids: &[String]) {
        let text = ids.join("\n");
        self.text.set_text(&text);
        self.list = PriorityList::from_text(&text, &self.catalog);
        self.report = Validator::new(&self.catalog).validate(&text);
    }

    // ========================================================================
    // REORDER
    // ========================================================================

    pub fn begin_drag(&mut self, row: usize) {
        if let Some(id) = self.list.get(row) {
            let id = id.to_string();
            self.drag.begin(id);
        }
    }

    /// Pointer moved over `row`. Returns whether the list changed.
    pub fn drag_over(&mut self, row: usize, bounds: RowBounds, pointer_y: f64, now: Instant) -> bool {
        let Some(target) = self.list.get(row).map(str::to_string) else {
            return false;
        };
        self.drag.hover(&mut self.list, &target, bounds, pointer_y, now)
    }

    /// Finish the drag gesture. The text is rewritten from the list only
    /// when the gesture actually moved a row; a plain click leaves it alone.
    pub fn end_drag(&mut self) -> Option<usize> {
        let id = self.drag.drop_row()?;
        let moved = self.drag.moved();
        self.drag.finish();
        if moved {
            self.list_changed();
        }
        self.list.position(&id)
    }

    pub fn begin_rank_edit(&mut self, row: usize) {
        if row < self.list.len() {
            self.rank_editor.begin(row);
        }
    }

    pub fn commit_rank_edit(&mut self) -> RankCommit {
        let commit = self.rank_editor.commit(&mut self.list);
        if let RankCommit::Moved { .. } = commit {
            self.list_changed();
        }
        commit
    }

    // ========================================================================
    // CREDENTIAL
    // ========================================================================

    pub fn login(&mut self, password: &str) -> Result<bool> {
        if password.is_empty() {
            return Ok(false);
        }
        self.credential.set(password)?;
        self.set_status("Logged in");
        Ok(true)
    }

    pub fn logout(&mut self) {
        if let Err(err) = self.credential.clear() {
            warn!("failed to remove stored credential: {err:#}");
        }
        self.set_status("Logged out");
    }

    /// Run one API call with the stored credential. Every failure opens the
    /// error modal; a 401 also drops the credential so the UI shows the login
    /// button again. The error is still returned so callers stop.
    fn call_api<T>(
        &mut self,
        call: impl FnOnce(&str) -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let result = match self.credential.password() {
            Some(password) => {
                let password = password.to_string();
                call(&password)
            }
            None => Err(ClientError::NoCredential),
        };

        if let Err(err) = &result {
            let message = if err.is_unauthorized() {
                if let Err(clear_err) = self.credential.clear() {
                    warn!("failed to remove stored credential: {clear_err:#}");
                }
                AUTH_FAILED_MESSAGE.to_string()
            } else {
                err.to_string()
            };
            warn!("instance API call failed: {err}");
            self.modals.open(ModalBody::Error { message });
        }

        result
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    pub fn list_instances(&mut self, api: &dyn InstanceApi) -> Result<Vec<InstanceSummary>, ClientError> {
        self.call_api(|password| api.list_instances(password))
    }

    /// Fetch a saved blob, then rebuild the list from its `pokemon_ids`
    pub fn load_instance(&mut self, api: &dyn InstanceApi, id: i64) -> Result<(), ClientError> {
        let ids = self.call_api(|password| {
            let blob = normalize_blob(api.fetch_instance(id, password)?)?;
            pokemon_ids(&blob)
        })?;

        self.import_ids(&ids);
        info!(instance = id, entries = ids.len(), "instance loaded");
        Ok(())
    }

    /// Overlay the current order onto the instance's existing blob and put
    /// it back; unrelated blob fields survive.
    pub fn save_instance(&mut self, api: &dyn InstanceApi, id: i64) -> Result<(), ClientError> {
        let ids = self.list.to_vec();
        self.call_api(|password| {
            let previous = normalize_blob(api.fetch_instance(id, password)?)?;
            let merged = with_pokemon_ids(previous, &ids);
            api.put_instance(id, password, &merged)
        })?;

        info!(instance = id, entries = ids.len(), "instance saved");
        Ok(())
    }

    // ========================================================================
    // MODAL FLOWS
    // ========================================================================

    pub fn open_login(&mut self) {
        self.modals.open(ModalBody::Login { input: String::new() });
    }

    pub fn open_import(&mut self, api: &dyn InstanceApi) {
        if let Ok(instances) = self.list_instances(api) {
            self.modals.open(ModalBody::Import { instances, selected: 0 });
        }
    }

    pub fn open_save(&mut self, api: &dyn InstanceApi) {
        if let Ok(instances) = self.list_instances(api) {
            self.modals.open(ModalBody::Save { instances, selected: 0 });
        }
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.modals.open(ModalBody::Notice { message: message.into() });
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.modals.open(ModalBody::Error { message: message.into() });
    }

    /// Confirm the top modal and run whatever it stands for
    pub fn confirm_modal(&mut self, api: &dyn InstanceApi) {
        let Some(body) = self.modals.top().map(|modal| modal.body.clone()) else {
            return;
        };

        match body {
            ModalBody::Login { input } => match self.login(&input) {
                Ok(true) => {
                    self.modals.confirm();
                }
                Ok(false) => self.notify(EMPTY_PASSWORD_MESSAGE),
                Err(err) => self.show_error(format!("{err:#}")),
            },
            ModalBody::Import { .. } => {
                let Some(instance) = body.selected_instance().cloned() else {
                    return;
                };
                if self.load_instance(api, instance.id).is_ok() {
                    self.modals.confirm();
                    self.set_status(format!("Loaded {}", instance.name));
                }
            }
            ModalBody::Save { .. } => {
                if let Some(instance) = body.selected_instance().cloned() {
                    self.modals.open(ModalBody::ConfirmSave { instance });
                }
            }
            ModalBody::ConfirmSave { instance } => {
                self.modals.confirm();
                if self.save_instance(api, instance.id).is_ok() {
                    // The picker underneath
                    self.modals.confirm();
                    self.set_status(format!("Saved to {}", instance.name));
                }
            }
            ModalBody::Error { .. } => self.modals.close_all(),
            ModalBody::Notice { .. } => {
                self.modals.confirm();
            }
        }
    }

    pub fn cancel_modal(&mut self) {
        match self.modals.top().map(|modal| &modal.body) {
            Some(ModalBody::Error { .. }) => self.modals.close_all(),
            Some(_) => {
                self.modals.cancel();
            }
            None => {}
        }
    }
}
