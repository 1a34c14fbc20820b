use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::config::ChecklistConfig;

use super::catalog::{CatalogListing, DocumentCatalog};
use super::domain::{ChecklistError, FiStatus, SubjectDetails};
use super::effects::{
    GeolocationProvider, NavigationError, Navigator, Notification, NotificationError,
    NotificationSink,
};
use super::report::DocumentPreview;
use super::repository::{
    LocationView, RepositoryError, SessionId, SessionRecord, SessionRepository, SessionView,
};
use super::session::{ChecklistSession, UploadOutcome};

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("fi-{id:06}"))
}

/// Where the agent lands after full completion, and how long the completion
/// notification gets to surface before the redirect fires.
#[derive(Debug, Clone)]
pub struct RedirectPolicy {
    pub destination: String,
    pub delay: Duration,
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self {
            destination: "/dashboard".to_string(),
            delay: Duration::from_millis(1000),
        }
    }
}

impl RedirectPolicy {
    pub fn from_config(config: &ChecklistConfig) -> Self {
        Self {
            destination: config.redirect_path.clone(),
            delay: Duration::from_millis(config.redirect_delay_ms),
        }
    }
}

/// Intake payload for opening a checklist session.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenSessionRequest {
    pub user_id: String,
    pub user_type: String,
    #[serde(default)]
    pub subject: SubjectDetails,
}

/// Outcome of a location capture attempt. Failures are absorbed into an
/// error notification rather than propagated as faults.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LocationCapture {
    Captured { location: LocationView },
    Failed { reason: String },
}

/// Response to one recorded upload, pairing the transition outcome with the
/// refreshed session view.
#[derive(Debug, Serialize)]
pub struct UploadReceipt {
    pub outcome: UploadOutcome,
    pub session: SessionView,
}

/// Service composing the catalog, session repository, and the external
/// collaborators (notification sink, geolocation capability, navigator).
/// State transitions stay inside [`ChecklistSession`]; this layer sequences
/// the side effects around them.
pub struct ChecklistService<R, N, G, V> {
    catalog: Arc<DocumentCatalog>,
    repository: Arc<R>,
    notifications: Arc<N>,
    geolocation: Arc<G>,
    navigator: Arc<V>,
    redirect: RedirectPolicy,
}

impl<R, N, G, V> ChecklistService<R, N, G, V>
where
    R: SessionRepository + 'static,
    N: NotificationSink + 'static,
    G: GeolocationProvider + 'static,
    V: Navigator + 'static,
{
    pub fn new(
        repository: Arc<R>,
        notifications: Arc<N>,
        geolocation: Arc<G>,
        navigator: Arc<V>,
        redirect: RedirectPolicy,
    ) -> Self {
        Self {
            catalog: Arc::new(DocumentCatalog::standard()),
            repository,
            notifications,
            geolocation,
            navigator,
            redirect,
        }
    }

    /// Open a session for the given user. An unknown or missing user type is
    /// terminal: no session is created and no catalog data is exposed.
    pub fn open(&self, request: OpenSessionRequest) -> Result<SessionRecord, ChecklistServiceError> {
        let user_type = self.catalog.resolve(&request.user_type)?;
        let session = ChecklistSession::new(&self.catalog, user_type);

        let record = SessionRecord {
            session_id: next_session_id(),
            user_id: request.user_id,
            subject: request.subject,
            applied_on: Local::now().date_naive(),
            status: FiStatus::Pending,
            session,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    pub fn get(&self, session_id: &SessionId) -> Result<SessionRecord, ChecklistServiceError> {
        let record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Resolve a user type straight against the catalog, without a session.
    pub fn catalog_listing(&self, raw_user_type: &str) -> Result<CatalogListing, ChecklistServiceError> {
        let user_type = self.catalog.resolve(raw_user_type)?;
        Ok(self.catalog.listing(user_type))
    }

    /// Ask the capability for one position fix. Both failure modes (not
    /// supported, request rejected) surface as an error notification and a
    /// failed outcome; the session state stays at its prior value.
    pub fn capture_location(
        &self,
        session_id: &SessionId,
    ) -> Result<LocationCapture, ChecklistServiceError> {
        self.get(session_id)?;

        match self.geolocation.current_position() {
            Ok(position) => {
                let location = self.repository.mutate(session_id, |record| {
                    record.session.apply_location(position);
                    LocationView::from_session(&record.session)
                })?;
                self.notifications
                    .notify(Notification::success("Location fetched successfully"))?;
                Ok(LocationCapture::Captured { location })
            }
            Err(err) => {
                self.notifications
                    .notify(Notification::error("Failed to fetch location"))?;
                Ok(LocationCapture::Failed {
                    reason: err.to_string(),
                })
            }
        }
    }

    pub fn select_document(
        &self,
        session_id: &SessionId,
        document: &str,
    ) -> Result<SessionView, ChecklistServiceError> {
        let view = self.repository.mutate(session_id, |record| {
            record.session.select_document(document).map(|_| record.view())
        })??;
        Ok(view)
    }

    /// Record an upload completion reported by the external widget. When the
    /// call causes the transition into full completion, the session is
    /// approved and exactly one success notification names the subject; the
    /// caller is expected to schedule [`Self::completion_redirect`] once.
    /// The transition runs inside the repository's `mutate` so concurrent
    /// final uploads cannot both observe the latch open.
    pub fn record_upload(
        &self,
        session_id: &SessionId,
        document: &str,
    ) -> Result<UploadReceipt, ChecklistServiceError> {
        let (outcome, view) = self.repository.mutate(session_id, |record| {
            let outcome = record.session.record_upload(document)?;
            if outcome == UploadOutcome::Completed {
                record.status = FiStatus::Approved;
            }
            Ok::<_, ChecklistError>((outcome, record.view()))
        })??;

        if outcome == UploadOutcome::Completed {
            let message = format!("{}'s KYC has been approved", view.subject_name);
            self.notifications.notify(Notification::success(message))?;
        }

        Ok(UploadReceipt {
            outcome,
            session: view,
        })
    }

    /// Preview payload for a clicked checklist row, keyed by the clicked
    /// name alone regardless of the current dropdown selection.
    pub fn preview(
        &self,
        session_id: &SessionId,
        document: &str,
    ) -> Result<DocumentPreview, ChecklistServiceError> {
        let record = self.get(session_id)?;
        Ok(record.session.preview(document))
    }

    /// Deferred post-completion navigation: wait out the configured delay,
    /// then dispatch a single navigation. Intended to be spawned
    /// fire-and-forget by the caller that observed the completion.
    pub async fn completion_redirect(&self) -> Result<(), ChecklistServiceError> {
        tokio::time::sleep(self.redirect.delay).await;
        self.navigator.navigate(&self.redirect.destination)?;
        Ok(())
    }

    pub fn redirect_policy(&self) -> &RedirectPolicy {
        &self.redirect
    }
}

/// Error raised by the checklist service.
#[derive(Debug, thiserror::Error)]
pub enum ChecklistServiceError {
    #[error(transparent)]
    Checklist(#[from] ChecklistError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}
