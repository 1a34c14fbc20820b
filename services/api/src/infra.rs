use kyc_checklist::config::GeolocationConfig;
use kyc_checklist::workflows::kyc::{
    GeoPosition, GeolocationError, GeolocationProvider, NavigationError, Navigator, Notification,
    NotificationError, NotificationKind, NotificationSink, RepositoryError, SessionId,
    SessionRecord, SessionRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for InMemorySessionRepository {
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

/// Bridges checklist notifications onto the service log. The toast surface
/// belongs to the client; the API keeps a structured record instead.
#[derive(Default, Clone)]
pub(crate) struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
        match notification.kind {
            NotificationKind::Success => {
                info!(message = %notification.message, "checklist notification")
            }
            NotificationKind::Error => {
                warn!(message = %notification.message, "checklist notification")
            }
        }
        Ok(())
    }
}

/// Records the post-completion redirect in the service log. Client-side
/// routing performs the actual navigation.
#[derive(Default, Clone)]
pub(crate) struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) -> Result<(), NavigationError> {
        info!(%path, "post-completion redirect dispatched");
        Ok(())
    }
}

/// Position capability bridged through configuration. Deployments without a
/// fixed position report the capability as unsupported.
pub(crate) struct ConfiguredGeolocation {
    fixed: Option<GeoPosition>,
}

impl ConfiguredGeolocation {
    pub(crate) fn from_config(config: &GeolocationConfig) -> Self {
        Self {
            fixed: config
                .fixed_position()
                .map(|(latitude, longitude)| GeoPosition {
                    latitude,
                    longitude,
                }),
        }
    }
}

impl GeolocationProvider for ConfiguredGeolocation {
    fn current_position(&self) -> Result<GeoPosition, GeolocationError> {
        self.fixed.ok_or(GeolocationError::Unsupported)
    }
}
