use serde::Serialize;

use super::RecordKind;

/// Both line-ups of a game, from the game's line-ups page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameLineups {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub href: String,
    pub game_id: u64,
    pub home_club: Lineup,
    pub away_club: Lineup,
}

/// One club's line-up within a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Lineup {
    pub href: Option<String>,
    pub formation: Option<String>,
    pub starting_lineup: Vec<LineupPlayer>,
    pub substitutes: Vec<LineupPlayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupPlayer {
    pub number: Option<String>,
    pub name: String,
    pub position: Option<String>,
    pub team_captain: bool,
    pub href: String,
}
