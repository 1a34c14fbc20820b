use crate::infra::InMemorySessionRepository;
use clap::Args;
use kyc_checklist::error::AppError;
use kyc_checklist::workflows::kyc::{
    ChecklistService, ChecklistServiceError, DocumentCatalog, GeoPosition, GeolocationError,
    GeolocationProvider, LocationCapture, NavigationError, Navigator, Notification,
    NotificationError, NotificationKind, NotificationSink, OpenSessionRequest, RedirectPolicy,
    SubjectDetails, UploadOutcome,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub(crate) struct CatalogArgs {
    /// User type to list ("customer" or "retailer")
    #[arg(long, default_value = "customer")]
    pub(crate) user_type: String,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// User type for the demo session
    #[arg(long, default_value = "retailer")]
    pub(crate) user_type: String,
    /// Subject name shown in the completion notification
    #[arg(long, default_value = "Asha Rao")]
    pub(crate) full_name: String,
    /// Latitude reported by the stubbed device capability
    #[arg(long, default_value_t = 18.5204303)]
    pub(crate) latitude: f64,
    /// Longitude reported by the stubbed device capability
    #[arg(long, default_value_t = 73.8567437)]
    pub(crate) longitude: f64,
    /// Skip the deferred dashboard redirect at the end of the demo
    #[arg(long)]
    pub(crate) skip_redirect: bool,
}

struct StdoutToasts;

impl NotificationSink for StdoutToasts {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
        let label = match notification.kind {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        };
        println!("  [toast:{label}] {}", notification.message);
        Ok(())
    }
}

struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn navigate(&self, path: &str) -> Result<(), NavigationError> {
        println!("  -> navigating to {path}");
        Ok(())
    }
}

struct FixedDevice(GeoPosition);

impl GeolocationProvider for FixedDevice {
    fn current_position(&self) -> Result<GeoPosition, GeolocationError> {
        Ok(self.0)
    }
}

pub(crate) fn run_catalog_listing(args: CatalogArgs) -> Result<(), AppError> {
    let catalog = DocumentCatalog::standard();
    let user_type = catalog
        .resolve(&args.user_type)
        .map_err(ChecklistServiceError::from)?;
    let listing = catalog.listing(user_type);

    println!("Required documents for {}", listing.user_type_label);
    for category in &listing.categories {
        println!("- {}", category.category);
        for document in &category.documents {
            println!("    - {document}");
        }
    }
    println!("Total required positions: {}", listing.required_positions);

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        user_type,
        full_name,
        latitude,
        longitude,
        skip_redirect,
    } = args;

    println!("KYC checklist demo");
    let repository = Arc::new(InMemorySessionRepository::default());
    let service = Arc::new(ChecklistService::new(
        repository,
        Arc::new(StdoutToasts),
        Arc::new(FixedDevice(GeoPosition {
            latitude,
            longitude,
        })),
        Arc::new(StdoutNavigator),
        RedirectPolicy {
            destination: "/dashboard".to_string(),
            delay: Duration::from_millis(250),
        },
    ));

    let record = service.open(OpenSessionRequest {
        user_id: "FI-DEMO-001".to_string(),
        user_type,
        subject: SubjectDetails::named(full_name),
    })?;
    let session_id = record.session_id.clone();
    println!(
        "- Opened session {} for {} ({})",
        session_id.0,
        record.subject.display_name(),
        record.session.user_type().label()
    );
    println!(
        "  Applied on {} | status {}",
        record.applied_on,
        record.status.label()
    );

    match service.capture_location(&session_id)? {
        LocationCapture::Captured { location } => {
            println!(
                "  Location fixed at {}, {}",
                location.latitude, location.longitude
            );
        }
        LocationCapture::Failed { reason } => {
            println!("  Location unavailable: {reason}");
            return Ok(());
        }
    }

    // Duplicate catalog positions share one flag, so skip names that an
    // earlier iteration already recorded.
    let documents: Vec<String> = record
        .session
        .remaining_documents()
        .iter()
        .map(|name| name.to_string())
        .collect();
    for name in &documents {
        if service.get(&session_id)?.session.is_uploaded(name) {
            continue;
        }
        service.select_document(&session_id, name)?;
        let receipt = service.record_upload(&session_id, name)?;
        match receipt.outcome {
            UploadOutcome::Recorded => println!(
                "  Uploaded {name} ({} positions remaining)",
                receipt.session.checklist.remaining_positions
            ),
            UploadOutcome::AlreadyRecorded => println!("  {name} was already recorded"),
            UploadOutcome::Completed => println!(
                "  Uploaded {name}; checklist complete, session status {}",
                receipt.session.status_label
            ),
        }
    }

    let stored = service.get(&session_id)?;
    match serde_json::to_string_pretty(&stored.view()) {
        Ok(json) => println!("  Final session payload:\n{json}"),
        Err(err) => println!("  Final session payload unavailable: {err}"),
    }

    if !skip_redirect {
        println!("  Waiting out the completion delay before the redirect");
        service.completion_redirect().await?;
    }

    Ok(())
}
