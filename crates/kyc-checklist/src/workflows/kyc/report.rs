use serde::Serialize;

use super::domain::UserType;

/// One checklist row: a required document and its checkmark state.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRow {
    pub name: &'static str,
    pub uploaded: bool,
}

/// Per-category progress for the checklist panel.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryProgress {
    pub category: &'static str,
    pub documents: Vec<DocumentRow>,
    pub uploaded: usize,
    pub total: usize,
}

/// Derived checklist view for one session. Never cached by the session;
/// always recomputed from the upload state.
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistReport {
    pub user_type: UserType,
    pub user_type_label: &'static str,
    pub categories: Vec<CategoryProgress>,
    pub required_positions: usize,
    pub remaining_positions: usize,
    pub remaining: Vec<&'static str>,
    pub complete: bool,
}

/// Stub payload for the checklist-row preview dialog. No real document
/// rendering exists yet; consumers get the clicked name and a placeholder.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentPreview {
    pub document: String,
    pub uploaded: bool,
    pub available: bool,
    pub placeholder: &'static str,
}

impl DocumentPreview {
    pub const PLACEHOLDER: &'static str = "Document preview is not available yet";
}
