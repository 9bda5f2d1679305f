use serde::Serialize;

use super::RecordKind;

/// A competition found on a country's competitions page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Competition {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub href: String,
    /// Slug of the competition URL, e.g. `premier-league`.
    pub code: Option<String>,
    /// Site identifier, e.g. `GB1`.
    pub competition_id: Option<String>,
    /// Underscored tier name, e.g. `first_tier`.
    pub competition_type: String,
}
