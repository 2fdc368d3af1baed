// 🪟 Modals - explicit state machine per dialog
//
// Lifecycle: Closed → Open → (Confirmed | Cancelled) → Closed
//
// Modals stack: a confirmation opens on top of the save picker, an error
// opens on top of whatever triggered it. Dismissing an error closes the
// whole stack.

use crate::instance::InstanceSummary;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Closed,
    Open,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    Show,
    Confirm,
    Cancel,
    Close,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("modal cannot handle {event:?} while {phase:?}")]
pub struct InvalidTransition {
    pub phase: ModalPhase,
    pub event: ModalEvent,
}

impl ModalPhase {
    pub fn apply(self, event: ModalEvent) -> Result<ModalPhase, InvalidTransition> {
        match (self, event) {
            (ModalPhase::Closed, ModalEvent::Show) => Ok(ModalPhase::Open),
            (ModalPhase::Open, ModalEvent::Confirm) => Ok(ModalPhase::Confirmed),
            (ModalPhase::Open, ModalEvent::Cancel) => Ok(ModalPhase::Cancelled),
            (ModalPhase::Confirmed | ModalPhase::Cancelled, ModalEvent::Close) => {
                Ok(ModalPhase::Closed)
            }
            (phase, event) => Err(InvalidTransition { phase, event }),
        }
    }
}

// ============================================================================
// MODAL CONTENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalBody {
    /// Password prompt
    Login { input: String },

    /// Pick a saved instance to load
    Import {
        instances: Vec<InstanceSummary>,
        selected: usize,
    },

    /// Pick an instance to overwrite
    Save {
        instances: Vec<InstanceSummary>,
        selected: usize,
    },

    /// "Are you sure you want to save to {name}?"
    ConfirmSave { instance: InstanceSummary },

    Error { message: String },

    /// Informational message, dismissed with either key
    Notice { message: String },
}

impl ModalBody {
    pub fn title(&self) -> &str {
        match self {
            ModalBody::Login { .. } => "Login",
            ModalBody::Import { .. } => "Import Instance",
            ModalBody::Save { .. } => "Save To Instance",
            ModalBody::ConfirmSave { .. } => "Confirm Save",
            ModalBody::Error { .. } => "Error",
            ModalBody::Notice { .. } => "Notice",
        }
    }

    pub fn select_next(&mut self) {
        if let ModalBody::Import { instances, selected } | ModalBody::Save { instances, selected } =
            self
        {
            if !instances.is_empty() {
                *selected = (*selected + 1) % instances.len();
            }
        }
    }

    pub fn select_previous(&mut self) {
        if let ModalBody::Import { instances, selected } | ModalBody::Save { instances, selected } =
            self
        {
            if !instances.is_empty() {
                *selected = (*selected + instances.len() - 1) % instances.len();
            }
        }
    }

    /// Instance under the cursor in a picker
    pub fn selected_instance(&self) -> Option<&InstanceSummary> {
        match self {
            ModalBody::Import { instances, selected } | ModalBody::Save { instances, selected } => {
                instances.get(*selected)
            }
            ModalBody::ConfirmSave { instance } => Some(instance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub body: ModalBody,
    phase: ModalPhase,
}

impl Modal {
    pub fn new(body: ModalBody) -> Self {
        Self {
            body,
            phase: ModalPhase::Closed,
        }
    }

    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn handle(&mut self, event: ModalEvent) -> Result<ModalPhase, InvalidTransition> {
        self.phase = self.phase.apply(event)?;
        Ok(self.phase)
    }
}

// ============================================================================
// MODAL MANAGER
// ============================================================================

/// Resolution of the top modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub body: ModalBody,
    pub outcome: ModalPhase,
}

#[derive(Debug, Default)]
pub struct ModalManager {
    stack: Vec<Modal>,
}

impl ModalManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, body: ModalBody) {
        let mut modal = Modal::new(body);
        // Closed → Open cannot fail for a fresh modal
        let _ = modal.handle(ModalEvent::Show);
        self.stack.push(modal);
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.stack.last_mut()
    }

    /// Top modal: Open → Confirmed → Closed, then removed
    pub fn confirm(&mut self) -> Option<Resolved> {
        self.resolve(ModalEvent::Confirm)
    }

    /// Top modal: Open → Cancelled → Closed, then removed
    pub fn cancel(&mut self) -> Option<Resolved> {
        self.resolve(ModalEvent::Cancel)
    }

    fn resolve(&mut self, event: ModalEvent) -> Option<Resolved> {
        let mut modal = self.stack.pop()?;
        let outcome = match modal.handle(event) {
            Ok(outcome) => outcome,
            Err(_) => {
                self.stack.push(modal);
                return None;
            }
        };
        let _ = modal.handle(ModalEvent::Close);
        Some(Resolved {
            body: modal.body,
            outcome,
        })
    }

    /// Cancel and close every open modal, top first
    pub fn close_all(&mut self) {
        while self.cancel().is_some() {}
        self.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summaries() -> Vec<InstanceSummary> {
        vec![
            InstanceSummary { id: 1, name: "Hundos".to_string() },
            InstanceSummary { id: 2, name: "PvP".to_string() },
        ]
    }

    #[test]
    fn test_phase_transitions() {
        let mut modal = Modal::new(ModalBody::Notice { message: "hi".to_string() });
        assert_eq!(modal.phase(), ModalPhase::Closed);

        assert!(modal.handle(ModalEvent::Confirm).is_err());
        assert_eq!(modal.handle(ModalEvent::Show), Ok(ModalPhase::Open));
        assert_eq!(modal.handle(ModalEvent::Cancel), Ok(ModalPhase::Cancelled));
        assert!(modal.handle(ModalEvent::Confirm).is_err());
        assert_eq!(modal.handle(ModalEvent::Close), Ok(ModalPhase::Closed));
        assert_eq!(modal.handle(ModalEvent::Show), Ok(ModalPhase::Open));
    }

    #[test]
    fn test_stack_confirm_and_cancel() {
        let mut modals = ModalManager::new();
        modals.open(ModalBody::Save { instances: summaries(), selected: 0 });
        modals.open(ModalBody::ConfirmSave { instance: summaries()[1].clone() });
        assert_eq!(modals.len(), 2);

        let resolved = modals.cancel().unwrap();
        assert_eq!(resolved.outcome, ModalPhase::Cancelled);
        assert!(matches!(resolved.body, ModalBody::ConfirmSave { .. }));

        let resolved = modals.confirm().unwrap();
        assert_eq!(resolved.outcome, ModalPhase::Confirmed);
        assert!(modals.is_empty());
        assert!(modals.confirm().is_none());
    }

    #[test]
    fn test_close_all() {
        let mut modals = ModalManager::new();
        modals.open(ModalBody::Import { instances: summaries(), selected: 0 });
        modals.open(ModalBody::Error { message: "boom".to_string() });

        modals.close_all();
        assert!(modals.is_empty());
    }

    #[test]
    fn test_picker_selection_wraps() {
        let mut body = ModalBody::Import { instances: summaries(), selected: 0 };

        body.select_previous();
        assert_eq!(body.selected_instance().map(|i| i.id), Some(2));
        body.select_next();
        assert_eq!(body.selected_instance().map(|i| i.id), Some(1));

        let mut empty = ModalBody::Save { instances: vec![], selected: 0 };
        empty.select_next();
        assert!(empty.selected_instance().is_none());
    }
}
