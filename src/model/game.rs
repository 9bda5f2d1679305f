use chrono::NaiveDate;
use serde::Serialize;

use super::{ClubRef, HrefLink, NamedLink, RecordKind};

/// A game report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub href: String,
    pub game_id: u64,
    pub home_club: ClubRef,
    pub home_club_position: Option<String>,
    pub away_club: ClubRef,
    pub away_club_position: Option<String>,
    pub result: Option<String>,
    pub halftime_score: Option<String>,
    pub matchday: Option<String>,
    pub date: Option<String>,
    pub date_iso: Option<NaiveDate>,
    pub kickoff_time: Option<String>,
    pub stadium: Option<String>,
    pub attendance: Option<String>,
    pub referee: Option<NamedLink>,
    pub events: Vec<GameEvent>,
    pub home_starting_lineup: Vec<NamedLink>,
    pub home_substitutes: Vec<NamedLink>,
    pub away_starting_lineup: Vec<NamedLink>,
    pub away_substitutes: Vec<NamedLink>,
    /// Only present when the page lists exactly two managers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_manager: Option<NamedLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_manager: Option<NamedLink>,
}

/// Event section of a game report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display, strum_macros::EnumIter,
)]
pub enum EventKind {
    Goals,
    Substitutions,
    Cards,
    Shootout,
}

/// Minute reported for shoot-out kicks, which carry no clock.
pub const SHOOTOUT_MINUTE: i32 = -1;

/// A goal, card, substitution or shoot-out kick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// `None` when the minute sprite could not be decoded.
    pub minute: Option<i32>,
    pub extra: Option<u32>,
    pub player: HrefLink,
    pub club: NamedLink,
    pub action: EventAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventAction {
    pub result: Option<String>,
    pub description: Option<String>,
    pub player_in: HrefLink,
    pub player_assist: HrefLink,
}

/// A fixture row from a competition's fixtures page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameListing {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub href: String,
    pub seasoned_href: String,
    pub game_id: u64,
    pub date_iso: Option<NaiveDate>,
    pub date_display: Option<String>,
    pub kickoff_time: Option<String>,
    pub home_club: Option<ClubRef>,
    pub away_club: Option<ClubRef>,
    /// `None` for games not yet played.
    pub result: Option<String>,
}
