use std::collections::BTreeSet;

use serde::Serialize;

use super::catalog::{DocumentCatalog, DocumentCategory};
use super::domain::{ChecklistError, GeoPosition, LocationState, UserType};
use super::report::{CategoryProgress, ChecklistReport, DocumentPreview, DocumentRow};

/// Result of recording one upload completion. `Completed` is returned only
/// by the call that causes the transition into the fully-satisfied state,
/// so the one-shot completion side effects key off the transition rather
/// than off re-derived global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadOutcome {
    Recorded,
    AlreadyRecorded,
    Completed,
}

/// Pure checklist state machine for one form session: the uploaded-document
/// set, the dropdown selection, the captured location, and a completion
/// latch. Transitions mutate state and report outcomes; all side effects
/// (notifications, navigation, the capability call) belong to the caller.
#[derive(Debug, Clone)]
pub struct ChecklistSession {
    user_type: UserType,
    categories: Vec<DocumentCategory>,
    required: Vec<&'static str>,
    uploaded: BTreeSet<String>,
    selected: Option<String>,
    location: LocationState,
    completed: bool,
}

impl ChecklistSession {
    pub fn new(catalog: &DocumentCatalog, user_type: UserType) -> Self {
        Self {
            user_type,
            categories: catalog.categories(user_type).to_vec(),
            required: catalog.required_documents(user_type),
            uploaded: BTreeSet::new(),
            selected: None,
            location: LocationState::default(),
            completed: false,
        }
    }

    pub fn user_type(&self) -> UserType {
        self.user_type
    }

    pub fn location(&self) -> &LocationState {
        &self.location
    }

    pub fn selected_document(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The flattened requirement list, duplicate positions preserved.
    pub fn required_documents(&self) -> &[&'static str] {
        &self.required
    }

    /// Required positions whose name has not been uploaded yet, in stable
    /// order. Duplicate positions disappear together once their shared name
    /// is recorded.
    pub fn remaining_documents(&self) -> Vec<&'static str> {
        self.required
            .iter()
            .copied()
            .filter(|name| !self.uploaded.contains(*name))
            .collect()
    }

    pub fn is_uploaded(&self, name: &str) -> bool {
        self.uploaded.contains(name)
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Store one capability fix. Repeated captures overwrite; the fetched
    /// gate never reverts.
    pub fn apply_location(&mut self, position: GeoPosition) {
        self.location.capture(position);
    }

    /// Choose an outstanding document for upload. The control only exists
    /// once the location gate is open, and only offers remaining names.
    pub fn select_document(&mut self, name: &str) -> Result<(), ChecklistError> {
        if !self.location.fetched {
            return Err(ChecklistError::LocationNotCaptured);
        }

        let remaining = self.remaining_documents();
        if remaining.is_empty() {
            return Err(ChecklistError::NothingRemaining);
        }
        if !remaining.contains(&name) {
            return Err(ChecklistError::DocumentNotPending(name.to_string()));
        }

        self.selected = Some(name.to_string());
        Ok(())
    }

    /// Record that the external upload widget reported completion for a
    /// document. Names outside the requirement list are tolerated and stay
    /// inert. The selection is always cleared so the next document must be
    /// re-selected.
    pub fn record_upload(&mut self, name: &str) -> Result<UploadOutcome, ChecklistError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChecklistError::EmptyDocumentName);
        }

        let newly_recorded = self.uploaded.insert(name.to_string());
        self.selected = None;

        let all_satisfied = self
            .required
            .iter()
            .all(|required| self.uploaded.contains(*required));

        if all_satisfied && !self.completed {
            self.completed = true;
            return Ok(UploadOutcome::Completed);
        }

        if newly_recorded {
            Ok(UploadOutcome::Recorded)
        } else {
            Ok(UploadOutcome::AlreadyRecorded)
        }
    }

    /// Placeholder preview for a clicked checklist row. Keyed by the clicked
    /// name alone, never by the current dropdown selection. Real preview
    /// rendering is a future surface.
    pub fn preview(&self, name: &str) -> DocumentPreview {
        DocumentPreview {
            document: name.to_string(),
            uploaded: self.is_uploaded(name),
            available: false,
            placeholder: DocumentPreview::PLACEHOLDER,
        }
    }

    /// Derived checklist view, recomputed on demand.
    pub fn report(&self) -> ChecklistReport {
        let categories = self
            .categories
            .iter()
            .map(|category| {
                let documents: Vec<DocumentRow> = category
                    .documents
                    .iter()
                    .copied()
                    .map(|name| DocumentRow {
                        name,
                        uploaded: self.uploaded.contains(name),
                    })
                    .collect();
                let uploaded = documents.iter().filter(|row| row.uploaded).count();
                let total = documents.len();

                CategoryProgress {
                    category: category.label,
                    documents,
                    uploaded,
                    total,
                }
            })
            .collect();

        let remaining = self.remaining_documents();

        ChecklistReport {
            user_type: self.user_type,
            user_type_label: self.user_type.label(),
            categories,
            required_positions: self.required.len(),
            remaining_positions: remaining.len(),
            remaining,
            complete: self.completed,
        }
    }
}
