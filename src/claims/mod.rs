//! Claims data model: traversal entries, the per-request claims aggregate,
//! and the spoken rendering of claim labels.

mod projector;
mod speech;

pub use projector::project;
pub use speech::to_speech;

use serde::{Deserialize, Serialize};

/// A single entity record from the traversal service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInfo {
    /// Opaque entity identifier, e.g. `Q615`.
    pub id: String,
    /// Display name.
    pub label: String,
    /// Picture URL. The key must be present; its value may be null.
    #[serde(deserialize_with = "Option::deserialize")]
    pub picture: Option<String>,
}

/// Claims about one queried entity.
///
/// The queried entity's own record contributes `picture_url`; every other
/// record contributes its label, in response order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClaimsInfo {
    pub picture_url: Option<String>,
    pub item_labels: Vec<String>,
}

impl ClaimsInfo {
    /// Spoken list of the related labels.
    pub fn to_item_labels_speech(&self) -> String {
        to_speech(&self.item_labels)
    }
}

/// Item and relationship as spoken by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimsQuery {
    pub item: String,
    pub relationship: String,
}

impl ClaimsQuery {
    pub fn new(item: impl Into<String>, relationship: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            relationship: relationship.into(),
        }
    }
}
