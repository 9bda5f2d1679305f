use serde_json::{json, Value};
use tfmkt_scraper::{
    parse_page, Context, CrawlConfig, Html, Lineage, Output, PageContracts, PageKind, PageRequest,
};

const SQUAD_PAGE: &str = include_str!("fixtures/squad.html");
const CLUB_HREF: &str = "/fc-chelsea/kader/verein/631/plus/1";

fn parse(kind: PageKind, base: Context) -> Vec<Output> {
    let document = Html::parse_document(SQUAD_PAGE);
    let request = PageRequest::new(format!("https://www.transfermarkt.co.uk{CLUB_HREF}"), kind, base);
    parse_page(
        &document,
        &request,
        &CrawlConfig::default(),
        &PageContracts::default(),
    )
    .unwrap()
}

fn club_base() -> Context {
    Context::new()
        .with_kind("club")
        .with_href(CLUB_HREF)
        .with_parent(json!({"type": "competition", "href": "/premier-league/startseite/wettbewerb/GB1"}))
}

#[test]
fn test_club_record() {
    let outputs = parse(PageKind::ClubDetails, club_base());
    assert_eq!(outputs.len(), 1);
    let club = outputs[0].as_record().unwrap();

    assert_eq!(club.kind(), Some("club"));
    assert_eq!(club.href(), Some(CLUB_HREF));
    assert_eq!(club.get_str("code"), Some("fc-chelsea"));
    assert_eq!(club.get_str("name"), Some("Chelsea Football Club"));
    assert_eq!(club.get_str("total_market_value"), Some("€1.31bn"));
    assert_eq!(club.get_str("squad_size"), Some("27"));
    assert_eq!(club.get_str("foreigners_percentage"), Some("63.0 %"));
    assert_eq!(club.get_str("stadium_name"), Some("Stamford Bridge"));
    assert_eq!(club.get_str("net_transfer_record"), Some("€-102.67m"));
    assert_eq!(club.get_str("coach_name"), Some("Enzo Maresca"));
    assert!(club.get("parent").is_some());
}

#[test]
fn test_duplicate_squad_rows_keep_first() {
    let outputs = parse(PageKind::ClubDetails, club_base());
    let club = outputs[0].as_record().unwrap();
    let players = club.get("players").and_then(Value::as_array).unwrap();

    let palmers: Vec<&Value> = players
        .iter()
        .filter(|p| p["player_id"] == json!(568177))
        .collect();
    assert_eq!(palmers.len(), 1);
    assert_eq!(palmers[0]["number"], "10");
    assert_eq!(palmers[0]["position"], "Attacking Midfield");
    assert_eq!(palmers[0]["market_value"], "€120.00m");
    assert_eq!(palmers[0]["signed_from_name"], "Manchester City");
    assert_eq!(players.len(), 2);
}

#[test]
fn test_stripped_lineage_drops_parent() {
    let document = Html::parse_document(SQUAD_PAGE);
    let request = PageRequest::new(CLUB_HREF.to_string(), PageKind::ClubDetails, club_base())
        .strip_lineage();
    assert_eq!(request.lineage, Lineage::Strip);

    let outputs = parse_page(
        &document,
        &request,
        &CrawlConfig::default(),
        &PageContracts::default(),
    )
    .unwrap();
    let club = outputs[0].as_record().unwrap();
    assert!(!club.contains_key("parent"));
    assert_eq!(club.get_str("code"), Some("fc-chelsea"));
}

#[test]
fn test_squad_page_fans_out_to_unique_players() {
    let outputs = parse(PageKind::ClubPlayers, club_base());
    let requests: Vec<&PageRequest> = outputs.iter().filter_map(Output::as_request).collect();

    assert_eq!(requests.len(), 2);
    assert!(outputs.iter().all(|o| o.as_record().is_none()));
    assert_eq!(
        requests[1].url,
        "https://www.transfermarkt.co.uk/cole-palmer/profil/spieler/568177"
    );
    assert_eq!(requests[1].kind, PageKind::PlayerProfile);
    assert_eq!(
        requests[1].base.parent,
        Some(json!({"type": "club", "href": CLUB_HREF}))
    );
}
