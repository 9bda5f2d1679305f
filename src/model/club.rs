use serde::Serialize;

use super::RecordKind;

/// A club with its squad, as shown on the club's squad page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Club {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub href: String,
    pub code: Option<String>,
    pub name: Option<String>,
    pub total_market_value: Option<String>,
    pub squad_size: Option<String>,
    pub average_age: Option<String>,
    pub foreigners_number: Option<String>,
    pub foreigners_percentage: Option<String>,
    pub national_team_players: Option<String>,
    pub stadium_name: Option<String>,
    pub stadium_seats: Option<String>,
    pub net_transfer_record: Option<String>,
    pub coach_name: Option<String>,
    pub players: Vec<SquadPlayer>,
}

/// One row of a club's squad table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SquadPlayer {
    pub player_id: u64,
    pub href: String,
    pub number: Option<String>,
    pub name: Option<String>,
    pub position: Option<String>,
    pub date_of_birth: Option<String>,
    pub age: Option<u32>,
    pub nationality: Option<String>,
    pub height: Option<String>,
    pub foot: Option<String>,
    pub joined: Option<String>,
    pub signed_from_href: Option<String>,
    pub signed_from_name: Option<String>,
    pub contract_expires: Option<String>,
    pub market_value: Option<String>,
}
