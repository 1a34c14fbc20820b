use super::domain::{ChecklistError, UserType};
use serde::Serialize;

/// One labeled group of required documents, in display order.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentCategory {
    pub label: &'static str,
    pub documents: Vec<&'static str>,
}

/// Static requirement data mapping a user type to its ordered document
/// categories. Document names are not unique across categories; completion
/// tracking collapses duplicates by name.
#[derive(Debug)]
pub struct DocumentCatalog {
    entries: Vec<(UserType, Vec<DocumentCategory>)>,
}

impl DocumentCatalog {
    pub fn standard() -> Self {
        Self {
            entries: vec![
                (UserType::Customer, customer_categories()),
                (UserType::Retailer, retailer_categories()),
            ],
        }
    }

    /// Resolve a free-form user-type string against the catalog. Unknown or
    /// empty input is the form's terminal invalid state.
    pub fn resolve(&self, raw: &str) -> Result<UserType, ChecklistError> {
        UserType::parse(raw)
            .filter(|user_type| {
                self.entries
                    .iter()
                    .any(|(entry_type, _)| entry_type == user_type)
            })
            .ok_or_else(|| ChecklistError::UnknownUserType(raw.to_string()))
    }

    pub fn categories(&self, user_type: UserType) -> &[DocumentCategory] {
        self.entries
            .iter()
            .find(|(entry_type, _)| *entry_type == user_type)
            .map(|(_, categories)| categories.as_slice())
            .unwrap_or_default()
    }

    /// Per-category document lists concatenated in category order then
    /// document order. Duplicate names keep their positions.
    pub fn required_documents(&self, user_type: UserType) -> Vec<&'static str> {
        self.categories(user_type)
            .iter()
            .flat_map(|category| category.documents.iter().copied())
            .collect()
    }

    pub fn listing(&self, user_type: UserType) -> CatalogListing {
        let categories = self
            .categories(user_type)
            .iter()
            .map(|category| CategoryListing {
                category: category.label,
                documents: category.documents.clone(),
            })
            .collect();

        CatalogListing {
            user_type,
            user_type_label: user_type.label(),
            categories,
            required_positions: self.required_documents(user_type).len(),
        }
    }
}

/// Serializable catalog projection for API and CLI consumers.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogListing {
    pub user_type: UserType,
    pub user_type_label: &'static str,
    pub categories: Vec<CategoryListing>,
    pub required_positions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryListing {
    pub category: &'static str,
    pub documents: Vec<&'static str>,
}

fn customer_categories() -> Vec<DocumentCategory> {
    vec![
        DocumentCategory {
            label: "Identity Proof",
            documents: vec![
                "Aadhaar Card",
                "PAN Card",
                "Passport",
                "Voter ID",
                "Driving License",
            ],
        },
        DocumentCategory {
            label: "Address Proof",
            documents: vec!["Utility Bill", "Rent Agreement"],
        },
    ]
}

fn retailer_categories() -> Vec<DocumentCategory> {
    vec![
        DocumentCategory {
            label: "Business Proof",
            documents: vec![
                "GST Certificate",
                "Shop Act License",
                "Udyam Registration",
                "Business Registration Certificate",
            ],
        },
        DocumentCategory {
            // "Shop Act License" doubles as address proof and shares one
            // completion flag with its business-proof occurrence.
            label: "Address Proof",
            documents: vec![
                "Shop Act License",
                "Electricity Bill",
                "Rental Agreement",
                "Property Tax Receipt",
            ],
        },
        DocumentCategory {
            label: "Other Supporting",
            documents: vec![
                "Owner Photo",
                "Cancelled Cheque",
                "Shop / Office Photographs",
            ],
        },
    ]
}
