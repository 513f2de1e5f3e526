// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the store, services, and application layers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of external collaborator behind an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Store,
    Generator,
}

// --- Pets ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Adoption status of a pet.
///
/// Only moves forward: available -> under-review -> approved.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PetStatus {
    #[default]
    Available,
    UnderReview,
    Approved,
}

impl PetStatus {
    /// Whether the workflow allows moving from `self` to `next`.
    pub fn can_advance_to(self, next: PetStatus) -> bool {
        matches!(
            (self, next),
            (PetStatus::Available, PetStatus::UnderReview)
                | (PetStatus::UnderReview, PetStatus::Approved)
        )
    }
}

/// A pet row from the `pets` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub breed: String,
    /// Display string, e.g. "2 years".
    pub age: String,
    pub gender: Gender,
    /// Display string, e.g. "4.2 kg".
    pub weight: String,
    pub distance: String,
    pub location: String,
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub status: PetStatus,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Insert payload for a new pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPet {
    pub name: String,
    pub breed: String,
    pub age: String,
    pub gender: Gender,
    pub weight: String,
    pub distance: String,
    pub location: String,
    pub image: String,
    pub tags: Vec<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PetStatus>,
    pub price: f64,
}

/// Partial update for a pet. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PetStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl PetUpdate {
    pub fn status(status: PetStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

// --- Applications ---

/// Review status of an adoption application.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ApplicationStatus {
    #[default]
    InReview,
    Approved,
    Completed,
    Rejected,
    /// Any status string this build does not recognize.
    #[serde(other)]
    Unknown,
}

impl ApplicationStatus {
    /// Progress percentage shown for an application in this status.
    pub fn progress(self) -> u8 {
        match self {
            ApplicationStatus::InReview => 50,
            ApplicationStatus::Approved => 75,
            ApplicationStatus::Completed => 100,
            ApplicationStatus::Rejected | ApplicationStatus::Unknown => 0,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OwnershipType {
    #[default]
    Rental,
    Owned,
}

/// An application row from the `applications` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub pet_id: String,
    pub user_name: String,
    pub user_email: String,
    #[serde(default)]
    pub user_phone: String,
    #[serde(default)]
    pub house_type: String,
    #[serde(default)]
    pub ownership_type: OwnershipType,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub reason: String,
    pub status: ApplicationStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Insert payload for the `applications` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewApplication {
    pub pet_id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub house_type: String,
    pub ownership_type: OwnershipType,
    pub experience: String,
    pub reason: String,
    pub status: ApplicationStatus,
}

/// An application with its pet attached.
///
/// `pet` is `None` when the referenced pet could not be found.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub record: ApplicationRecord,
    pub pet: Option<Pet>,
}

impl Application {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn status(&self) -> ApplicationStatus {
        self.record.status
    }

    /// Derived from the status on every call, never stored.
    pub fn progress(&self) -> u8 {
        self.record.status.progress()
    }
}

// --- Favorites ---

/// A favorite row from the `favorites` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: String,
    pub user_id: String,
    pub pet_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFavorite {
    pub user_id: String,
    pub pet_id: String,
}

/// A favorite with its pet attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Favorite {
    pub record: FavoriteRecord,
    pub pet: Option<Pet>,
}

impl Favorite {
    pub fn pet_id(&self) -> &str {
        &self.record.pet_id
    }
}

// --- Chat ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A persisted chat message from the `messages` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub role: Role,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewChatMessage {
    pub user_id: String,
    pub content: String,
    pub role: Role,
}

// --- Generation ---

/// A request to the generative-AI endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Ask the endpoint to ground the answer with web search.
    pub grounded: bool,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            grounded: false,
        }
    }

    pub fn grounded(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            grounded: true,
        }
    }
}

/// A source link the endpoint used to ground its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingLink {
    pub title: String,
    pub uri: String,
}

/// Text produced by the generative-AI endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    pub text: String,
    pub links: Vec<GroundingLink>,
}

impl Generation {
    /// The generated text, or `None` when the endpoint returned nothing usable.
    pub fn non_blank_text(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    #[test]
    fn progress_table() {
        assert_eq!(ApplicationStatus::InReview.progress(), 50);
        assert_eq!(ApplicationStatus::Approved.progress(), 75);
        assert_eq!(ApplicationStatus::Completed.progress(), 100);
        assert_eq!(ApplicationStatus::Rejected.progress(), 0);
        assert_eq!(ApplicationStatus::Unknown.progress(), 0);
    }

    #[test]
    fn unrecognized_status_deserializes_to_unknown() {
        let status: ApplicationStatus = serde_json::from_str("\"withdrawn\"").unwrap();
        assert_eq!(status, ApplicationStatus::Unknown);
        let status: ApplicationStatus = serde_json::from_str("\"in-review\"").unwrap();
        assert_eq!(status, ApplicationStatus::InReview);
    }

    #[test]
    fn pet_status_wire_names() {
        assert_eq!(PetStatus::UnderReview.to_string(), "under-review");
        assert_eq!(
            PetStatus::from_str("under-review").unwrap(),
            PetStatus::UnderReview
        );
        let json = serde_json::to_string(&PetStatus::Available).unwrap();
        assert_eq!(json, "\"available\"");
    }

    #[test]
    fn pet_status_only_moves_forward() {
        use PetStatus::*;
        assert!(Available.can_advance_to(UnderReview));
        assert!(UnderReview.can_advance_to(Approved));
        assert!(!Available.can_advance_to(Approved));
        assert!(!Approved.can_advance_to(Available));
        assert!(!UnderReview.can_advance_to(Available));
        assert!(!Approved.can_advance_to(Approved));
    }

    #[test]
    fn pet_update_skips_unset_fields() {
        let json = serde_json::to_value(PetUpdate::status(PetStatus::UnderReview)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "under-review"}));
    }

    #[test]
    fn blank_generation_has_no_text() {
        let g = Generation {
            text: "  \n".into(),
            links: vec![],
        };
        assert_eq!(g.non_blank_text(), None);
    }

    fn any_status() -> impl Strategy<Value = ApplicationStatus> {
        prop_oneof![
            Just(ApplicationStatus::InReview),
            Just(ApplicationStatus::Approved),
            Just(ApplicationStatus::Completed),
            Just(ApplicationStatus::Rejected),
            Just(ApplicationStatus::Unknown),
        ]
    }

    proptest! {
        #[test]
        fn progress_is_bounded_and_pure(status in any_status()) {
            let p = status.progress();
            prop_assert!(p <= 100);
            prop_assert_eq!(p, status.progress());
        }

        #[test]
        fn arbitrary_status_strings_never_fail(s in "[a-z-]{1,16}") {
            let parsed: ApplicationStatus =
                serde_json::from_value(serde_json::Value::String(s)).unwrap();
            prop_assert!(parsed.progress() <= 100);
        }
    }
}
