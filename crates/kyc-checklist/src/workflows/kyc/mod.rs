//! KYC field-investigation document checklist workflow.
//!
//! The checklist itself is a small pure state machine ([`ChecklistSession`]);
//! everything around it (catalog data, session storage, the notification,
//! navigation, and geolocation collaborators, the HTTP surface) hangs off
//! trait seams so the workflow can run against real adapters or test doubles.

pub mod catalog;
pub mod domain;
pub mod effects;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
mod session;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogListing, CategoryListing, DocumentCatalog, DocumentCategory};
pub use domain::{
    ChecklistError, FiStatus, GeoPosition, LocationState, SubjectDetails, UserType,
};
pub use effects::{
    GeolocationError, GeolocationProvider, NavigationError, Navigator, Notification,
    NotificationError, NotificationKind, NotificationSink,
};
pub use report::{CategoryProgress, ChecklistReport, DocumentPreview, DocumentRow};
pub use repository::{
    LocationView, RepositoryError, SessionId, SessionRecord, SessionRepository, SessionView,
};
pub use router::checklist_router;
pub use service::{
    ChecklistService, ChecklistServiceError, LocationCapture, OpenSessionRequest, RedirectPolicy,
    UploadReceipt,
};
pub use session::{ChecklistSession, UploadOutcome};
