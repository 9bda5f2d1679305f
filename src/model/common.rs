use serde::{Deserialize, Serialize};

/// The `type` tag carried by every emitted record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecordKind {
    Competition,
    Club,
    Player,
    Game,
    GameLineups,
}

/// A reference to a club as embedded in another record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClubRef {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub href: Option<String>,
}

impl ClubRef {
    pub fn new(href: Option<String>) -> Self {
        Self {
            kind: RecordKind::Club,
            name: None,
            href,
        }
    }

    pub fn named(name: String, href: String) -> Self {
        Self {
            kind: RecordKind::Club,
            name: Some(name),
            href: Some(href),
        }
    }
}

/// A named link to a person or club (referee, manager, event club).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedLink {
    pub name: Option<String>,
    pub href: Option<String>,
}

/// A bare link to a profile page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HrefLink {
    pub href: Option<String>,
}

impl HrefLink {
    pub fn new(href: Option<String>) -> Self {
        Self { href }
    }
}
