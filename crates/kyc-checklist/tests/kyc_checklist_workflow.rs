//! Integration specifications for the KYC document checklist workflow.
//!
//! Scenarios run end to end through the public service facade so the
//! location gate, the upload ledger, and the one-shot completion effects
//! are validated without reaching into private modules.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use kyc_checklist::workflows::kyc::{
        ChecklistService, GeoPosition, GeolocationError, GeolocationProvider, NavigationError,
        Navigator, Notification, NotificationError, NotificationKind, NotificationSink,
        OpenSessionRequest, RedirectPolicy, RepositoryError, SessionId, SessionRecord,
        SessionRepository, SubjectDetails,
    };

    #[derive(Default, Clone)]
    pub(super) struct MemoryRepository {
        records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
    }

    impl SessionRepository for MemoryRepository {
        fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            if guard.contains_key(&record.session_id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(record.session_id.clone(), record.clone());
            Ok(record)
        }

        fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            guard.insert(record.session_id.clone(), record);
            Ok(())
        }

        fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
            Ok(guard.get(id).cloned())
        }

        fn mutate<T>(
            &self,
            id: &SessionId,
            apply: impl FnOnce(&mut SessionRecord) -> T,
        ) -> Result<T, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
            Ok(apply(record))
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryToasts {
        events: Arc<Mutex<Vec<Notification>>>,
    }

    impl MemoryToasts {
        pub(super) fn events(&self) -> Vec<Notification> {
            self.events.lock().expect("lock").clone()
        }

        pub(super) fn messages_of(&self, kind: NotificationKind) -> Vec<String> {
            self.events()
                .into_iter()
                .filter(|event| event.kind == kind)
                .map(|event| event.message)
                .collect()
        }
    }

    impl NotificationSink for MemoryToasts {
        fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
            self.events.lock().expect("lock").push(notification);
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryNavigator {
        destinations: Arc<Mutex<Vec<String>>>,
    }

    impl MemoryNavigator {
        pub(super) fn destinations(&self) -> Vec<String> {
            self.destinations.lock().expect("lock").clone()
        }
    }

    impl Navigator for MemoryNavigator {
        fn navigate(&self, path: &str) -> Result<(), NavigationError> {
            self.destinations.lock().expect("lock").push(path.to_string());
            Ok(())
        }
    }

    pub(super) struct FixedFix(pub(super) Result<GeoPosition, &'static str>);

    impl GeolocationProvider for FixedFix {
        fn current_position(&self) -> Result<GeoPosition, GeolocationError> {
            match &self.0 {
                Ok(position) => Ok(*position),
                Err(reason) => Err(GeolocationError::Failed(reason.to_string())),
            }
        }
    }

    pub(super) type Service =
        ChecklistService<MemoryRepository, MemoryToasts, FixedFix, MemoryNavigator>;

    pub(super) fn pune_office() -> GeoPosition {
        GeoPosition {
            latitude: 18.5204303,
            longitude: 73.8567437,
        }
    }

    pub(super) fn build_service(
        fix: Result<GeoPosition, &'static str>,
    ) -> (
        Arc<Service>,
        Arc<MemoryRepository>,
        Arc<MemoryToasts>,
        Arc<MemoryNavigator>,
    ) {
        let repository = Arc::new(MemoryRepository::default());
        let toasts = Arc::new(MemoryToasts::default());
        let navigator = Arc::new(MemoryNavigator::default());
        let service = Arc::new(ChecklistService::new(
            repository.clone(),
            toasts.clone(),
            Arc::new(FixedFix(fix)),
            navigator.clone(),
            RedirectPolicy {
                destination: "/dashboard".to_string(),
                delay: Duration::from_millis(5),
            },
        ));
        (service, repository, toasts, navigator)
    }

    pub(super) fn open_request(user_type: &str) -> OpenSessionRequest {
        OpenSessionRequest {
            user_id: "FI-2071".to_string(),
            user_type: user_type.to_string(),
            subject: SubjectDetails::named("Ravi Kulkarni"),
        }
    }

    pub(super) fn customer_documents() -> Vec<&'static str> {
        vec![
            "Aadhaar Card",
            "PAN Card",
            "Passport",
            "Voter ID",
            "Driving License",
            "Utility Bill",
            "Rent Agreement",
        ]
    }
}

mod intake {
    use super::common::*;
    use kyc_checklist::workflows::kyc::{
        ChecklistError, ChecklistServiceError, FiStatus, SessionRepository, UserType,
    };

    #[test]
    fn sessions_open_pending_with_the_full_checklist() {
        let (service, repository, _, _) = build_service(Ok(pune_office()));

        let record = service.open(open_request("customer")).expect("opens");
        assert_eq!(record.status, FiStatus::Pending);
        assert_eq!(record.session.user_type(), UserType::Customer);
        assert_eq!(record.session.required_documents(), &customer_documents()[..]);

        let stored = repository
            .fetch(&record.session_id)
            .expect("repo fetch")
            .expect("record present");
        assert!(!stored.session.location().fetched);
    }

    #[test]
    fn unknown_user_types_never_open_a_session() {
        let (service, _, toasts, _) = build_service(Ok(pune_office()));

        match service.open(open_request("wholesaler")) {
            Err(ChecklistServiceError::Checklist(ChecklistError::UnknownUserType(raw))) => {
                assert_eq!(raw, "wholesaler");
            }
            other => panic!("expected unknown user type, got {other:?}"),
        }
        assert!(toasts.events().is_empty());
    }
}

mod location {
    use super::common::*;
    use kyc_checklist::workflows::kyc::{
        ChecklistError, ChecklistServiceError, LocationCapture, NotificationKind,
    };

    #[test]
    fn a_successful_fix_opens_the_upload_surface() {
        let (service, _, toasts, _) = build_service(Ok(pune_office()));
        let record = service.open(open_request("customer")).expect("opens");

        let capture = service.capture_location(&record.session_id).expect("runs");
        match capture {
            LocationCapture::Captured { location } => {
                assert_eq!(location.latitude, "18.520430");
                assert_eq!(location.longitude, "73.856744");
            }
            other => panic!("expected a captured fix, got {other:?}"),
        }
        assert_eq!(
            toasts.messages_of(NotificationKind::Success),
            vec!["Location fetched successfully".to_string()]
        );

        service
            .select_document(&record.session_id, "PAN Card")
            .expect("selection allowed after capture");
    }

    #[test]
    fn a_failed_fix_leaves_the_surface_hidden() {
        let (service, _, toasts, _) = build_service(Err("permission denied"));
        let record = service.open(open_request("customer")).expect("opens");

        let capture = service.capture_location(&record.session_id).expect("runs");
        assert!(matches!(capture, LocationCapture::Failed { .. }));
        assert_eq!(
            toasts.messages_of(NotificationKind::Error),
            vec!["Failed to fetch location".to_string()]
        );

        match service.select_document(&record.session_id, "PAN Card") {
            Err(ChecklistServiceError::Checklist(ChecklistError::LocationNotCaptured)) => {}
            other => panic!("expected location gate, got {other:?}"),
        }
    }
}

mod completion {
    use super::common::*;
    use kyc_checklist::workflows::kyc::{
        FiStatus, NotificationKind, SessionRepository, UploadOutcome,
    };

    #[test]
    fn the_final_upload_approves_and_notifies_once() {
        let (service, repository, toasts, _) = build_service(Ok(pune_office()));
        let record = service.open(open_request("customer")).expect("opens");
        service.capture_location(&record.session_id).expect("runs");

        let documents = customer_documents();
        let (last, head) = documents.split_last().expect("non-empty");

        for name in head {
            let receipt = service
                .record_upload(&record.session_id, name)
                .expect("upload records");
            assert_eq!(receipt.outcome, UploadOutcome::Recorded);
        }

        let receipt = service
            .record_upload(&record.session_id, last)
            .expect("final upload");
        assert_eq!(receipt.outcome, UploadOutcome::Completed);

        let stored = repository
            .fetch(&record.session_id)
            .expect("repo fetch")
            .expect("record present");
        assert_eq!(stored.status, FiStatus::Approved);
        assert!(stored.session.is_complete());

        let approvals: Vec<_> = toasts
            .messages_of(NotificationKind::Success)
            .into_iter()
            .filter(|message| message.ends_with("KYC has been approved"))
            .collect();
        assert_eq!(approvals, vec!["Ravi Kulkarni's KYC has been approved"]);

        // Re-recording after approval must stay quiet.
        let receipt = service
            .record_upload(&record.session_id, "PAN Card")
            .expect("repeat tolerated");
        assert_eq!(receipt.outcome, UploadOutcome::AlreadyRecorded);
        assert_eq!(
            toasts
                .messages_of(NotificationKind::Success)
                .into_iter()
                .filter(|message| message.ends_with("KYC has been approved"))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn the_deferred_redirect_lands_on_the_dashboard() {
        let (service, _, _, navigator) = build_service(Ok(pune_office()));

        service
            .completion_redirect()
            .await
            .expect("redirect dispatches");
        assert_eq!(navigator.destinations(), vec!["/dashboard".to_string()]);
    }
}
