use serde::Serialize;
use serde_json::Value;

use super::{HrefLink, NamedLink, RecordKind};

/// A player profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub href: String,
    pub code: Option<String>,
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub number: Option<String>,
    pub name_in_home_country: Option<String>,
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_death: Option<String>,
    pub place_of_birth: PlaceOfBirth,
    pub age: Option<String>,
    pub height: Option<String>,
    pub citizenship: Option<String>,
    pub position: Option<String>,
    pub player_agent: NamedLink,
    pub image_url: Option<String>,
    pub status: PlayerStatus,
    pub current_club: Option<HrefLink>,
    pub foot: Option<String>,
    pub joined: Option<String>,
    pub contract_expires: Option<String>,
    pub day_of_last_contract_extension: Option<String>,
    pub outfitter: Option<String>,
    /// Current market value in euros.
    pub current_market_value: Option<f64>,
    pub highest_market_value: Option<String>,
    pub social_media: Vec<String>,
    pub market_value_history: Option<Value>,
    pub on_loan_from: Option<String>,
    pub contract_option: Option<String>,
    pub contract_there_expires: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaceOfBirth {
    pub country: Option<String>,
    pub city: Option<String>,
}

/// Career status derived from the profile header.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display, strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Active,
    Retired,
    Deceased,
}
