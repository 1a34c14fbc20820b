use serde::{Deserialize, Serialize};

/// User categories the field investigation distinguishes between. Each maps
/// to its own required-document catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Customer,
    Retailer,
}

impl UserType {
    pub const fn ordered() -> [Self; 2] {
        [Self::Customer, Self::Retailer]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Retailer => "Retailer",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Retailer => "retailer",
        }
    }

    /// Case-insensitive resolution of a free-form user-type string.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "customer" => Some(Self::Customer),
            "retailer" => Some(Self::Retailer),
            _ => None,
        }
    }
}

/// Verification status of one field-investigation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiStatus {
    Pending,
    Approved,
}

impl FiStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "FI Pending",
            Self::Approved => "Approved",
        }
    }
}

/// Personal details of the subject under verification. Only the display
/// name is consumed, and it may legitimately be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectDetails {
    #[serde(default)]
    pub full_name: Option<String>,
}

impl SubjectDetails {
    pub fn named(full_name: impl Into<String>) -> Self {
        Self {
            full_name: Some(full_name.into()),
        }
    }

    /// Degrades to an empty fragment when no name was supplied.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or_default()
    }
}

/// One position fix as yielded by the geolocation capability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

/// Captured coordinates, stored as 6-decimal strings the way the form
/// displays them. `fetched` is one-way for the life of the session and
/// gates the selection/upload surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationState {
    pub latitude: String,
    pub longitude: String,
    pub fetched: bool,
}

impl LocationState {
    /// Repeated captures overwrite the coordinates; `fetched` never reverts.
    pub fn capture(&mut self, position: GeoPosition) {
        self.latitude = format!("{:.6}", position.latitude);
        self.longitude = format!("{:.6}", position.longitude);
        self.fetched = true;
    }
}

/// Errors raised by checklist state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChecklistError {
    #[error("unknown or missing user type '{0}': no document list available")]
    UnknownUserType(String),
    #[error("a document name is required")]
    EmptyDocumentName,
    #[error("location must be captured before documents can be selected")]
    LocationNotCaptured,
    #[error("all required documents are already uploaded")]
    NothingRemaining,
    #[error("document '{0}' is not awaiting upload")]
    DocumentNotPending(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_type_parse_is_case_insensitive() {
        assert_eq!(UserType::parse("Customer"), Some(UserType::Customer));
        assert_eq!(UserType::parse("RETAILER"), Some(UserType::Retailer));
        assert_eq!(UserType::parse("  customer  "), Some(UserType::Customer));
        assert_eq!(UserType::parse("distributor"), None);
        assert_eq!(UserType::parse(""), None);
    }

    #[test]
    fn location_capture_rounds_to_six_decimals() {
        let mut location = LocationState::default();
        location.capture(GeoPosition {
            latitude: 18.520430299,
            longitude: -73.8567436999,
        });
        assert_eq!(location.latitude, "18.520430");
        assert_eq!(location.longitude, "-73.856744");
        assert!(location.fetched);
    }

    #[test]
    fn subject_display_name_tolerates_missing_name() {
        assert_eq!(SubjectDetails::default().display_name(), "");
        assert_eq!(SubjectDetails::named("Asha Rao").display_name(), "Asha Rao");
    }
}
