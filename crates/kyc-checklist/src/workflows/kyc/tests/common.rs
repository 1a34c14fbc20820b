use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::kyc::domain::{GeoPosition, SubjectDetails};
use crate::workflows::kyc::effects::{
    GeolocationError, GeolocationProvider, NavigationError, Navigator, Notification,
    NotificationError, NotificationKind, NotificationSink,
};
use crate::workflows::kyc::repository::{
    RepositoryError, SessionId, SessionRecord, SessionRepository,
};
use crate::workflows::kyc::service::{ChecklistService, OpenSessionRequest, RedirectPolicy};
use crate::workflows::kyc::checklist_router;

pub(super) type TestService =
    ChecklistService<MemorySessions, MemoryNotifications, StubGeolocation, MemoryNavigator>;

#[derive(Default, Clone)]
pub(super) struct MemorySessions {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for MemorySessions {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.session_id) {
            guard.insert(record.session_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn mutate<T>(
        &self,
        id: &SessionId,
        apply: impl FnOnce(&mut SessionRecord) -> T,
    ) -> Result<T, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        Ok(apply(record))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }

    pub(super) fn successes(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter(|event| event.kind == NotificationKind::Success)
            .collect()
    }

    pub(super) fn errors(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter(|event| event.kind == NotificationKind::Error)
            .collect()
    }
}

impl NotificationSink for MemoryNotifications {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNavigator {
    destinations: Arc<Mutex<Vec<String>>>,
}

impl MemoryNavigator {
    pub(super) fn destinations(&self) -> Vec<String> {
        self.destinations
            .lock()
            .expect("navigator mutex poisoned")
            .clone()
    }
}

impl Navigator for MemoryNavigator {
    fn navigate(&self, path: &str) -> Result<(), NavigationError> {
        self.destinations
            .lock()
            .expect("navigator mutex poisoned")
            .push(path.to_string());
        Ok(())
    }
}

/// Navigator that always refuses, for exercising the redirect error path.
pub(super) struct RefusingNavigator;

impl Navigator for RefusingNavigator {
    fn navigate(&self, _path: &str) -> Result<(), NavigationError> {
        Err(NavigationError::Unavailable(
            "history handle dropped".to_string(),
        ))
    }
}

pub(super) enum StubFix {
    Position(GeoPosition),
    Unsupported,
    Rejected,
}

pub(super) struct StubGeolocation {
    pub(super) fix: StubFix,
}

impl GeolocationProvider for StubGeolocation {
    fn current_position(&self) -> Result<GeoPosition, GeolocationError> {
        match &self.fix {
            StubFix::Position(position) => Ok(*position),
            StubFix::Unsupported => Err(GeolocationError::Unsupported),
            StubFix::Rejected => Err(GeolocationError::Failed(
                "position request rejected".to_string(),
            )),
        }
    }
}

pub(super) fn field_position() -> GeoPosition {
    GeoPosition {
        latitude: 18.5204303,
        longitude: 73.8567437,
    }
}

pub(super) fn fast_redirect() -> RedirectPolicy {
    RedirectPolicy {
        destination: "/dashboard".to_string(),
        delay: Duration::from_millis(5),
    }
}

pub(super) fn build_service(
    fix: StubFix,
) -> (
    Arc<TestService>,
    Arc<MemorySessions>,
    Arc<MemoryNotifications>,
    Arc<MemoryNavigator>,
) {
    let repository = Arc::new(MemorySessions::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let navigator = Arc::new(MemoryNavigator::default());
    let geolocation = Arc::new(StubGeolocation { fix });
    let service = Arc::new(ChecklistService::new(
        repository.clone(),
        notifications.clone(),
        geolocation,
        navigator.clone(),
        fast_redirect(),
    ));
    (service, repository, notifications, navigator)
}

pub(super) fn open_request(user_type: &str, full_name: Option<&str>) -> OpenSessionRequest {
    OpenSessionRequest {
        user_id: "FI-1042".to_string(),
        user_type: user_type.to_string(),
        subject: match full_name {
            Some(name) => SubjectDetails::named(name),
            None => SubjectDetails::default(),
        },
    }
}

pub(super) fn open_retailer(service: &TestService) -> SessionRecord {
    service
        .open(open_request("retailer", Some("Asha Rao")))
        .expect("retailer session opens")
}

/// The ten distinct retailer document names; "Shop Act License" occupies two
/// checklist positions but carries a single completion flag.
pub(super) fn retailer_distinct_documents() -> Vec<&'static str> {
    vec![
        "GST Certificate",
        "Shop Act License",
        "Udyam Registration",
        "Business Registration Certificate",
        "Electricity Bill",
        "Rental Agreement",
        "Property Tax Receipt",
        "Owner Photo",
        "Cancelled Cheque",
        "Shop / Office Photographs",
    ]
}

pub(super) fn checklist_router_with_service(service: Arc<TestService>) -> axum::Router {
    checklist_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
