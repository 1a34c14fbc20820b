use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{FiStatus, SubjectDetails, UserType};
use super::report::ChecklistReport;
use super::session::ChecklistSession;

/// Identifier wrapper for open checklist sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Repository record for one field-investigation session: subject metadata
/// plus the checklist state machine itself.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub user_id: String,
    pub subject: SubjectDetails,
    pub applied_on: NaiveDate,
    pub status: FiStatus,
    pub session: ChecklistSession,
}

impl SessionRecord {
    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.session_id.0.clone(),
            user_id: self.user_id.clone(),
            subject_name: self.subject.display_name().to_string(),
            user_type: self.session.user_type(),
            user_type_label: self.session.user_type().label(),
            applied_on: self.applied_on,
            status: self.status,
            status_label: self.status.label(),
            location: LocationView::from_session(&self.session),
            selected_document: self.session.selected_document().map(str::to_string),
            checklist: self.session.report(),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;

    /// Apply one mutation to a stored session. Implementations backed by a
    /// lock should run `apply` under it so state transitions (the completion
    /// latch in particular) observe the latest record even with concurrent
    /// callers. The default is a plain fetch-apply-update sequence.
    fn mutate<T>(
        &self,
        id: &SessionId,
        apply: impl FnOnce(&mut SessionRecord) -> T,
    ) -> Result<T, RepositoryError>
    where
        Self: Sized,
    {
        let mut record = self.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        let value = apply(&mut record);
        self.update(record)?;
        Ok(value)
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Serializable projection of one session for API responses and the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub user_id: String,
    pub subject_name: String,
    pub user_type: UserType,
    pub user_type_label: &'static str,
    pub applied_on: NaiveDate,
    pub status: FiStatus,
    pub status_label: &'static str,
    pub location: LocationView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_document: Option<String>,
    pub checklist: ChecklistReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationView {
    pub latitude: String,
    pub longitude: String,
    pub fetched: bool,
}

impl LocationView {
    pub(crate) fn from_session(session: &ChecklistSession) -> Self {
        let location = session.location();
        Self {
            latitude: location.latitude.clone(),
            longitude: location.longitude.clone(),
            fetched: location.fetched,
        }
    }
}
