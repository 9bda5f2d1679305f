use serde_json::{json, Value};
use tfmkt_scraper::{
    parse_page, Context, CrawlConfig, Html, Output, PageContracts, PageKind, PageRequest, Record,
};

const GAME_PAGE: &str = include_str!("fixtures/game.html");
const GAME_HREF: &str = "/liverpool-fc_afc-bournemouth/index/spielbericht/4625774";

fn game_request(base: Context) -> PageRequest {
    PageRequest::new(
        format!("https://www.transfermarkt.co.uk{GAME_HREF}"),
        PageKind::Game,
        base,
    )
}

fn parse_records(page: &str, request: &PageRequest) -> Vec<Record> {
    let document = Html::parse_document(page);
    parse_page(
        &document,
        request,
        &CrawlConfig::default(),
        &PageContracts::default(),
    )
    .unwrap()
    .into_iter()
    .filter_map(|output| match output {
        Output::Record(record) => Some(record),
        Output::Request(_) => None,
    })
    .collect()
}

fn parse_game_record() -> Record {
    let base = Context::new()
        .with_href(GAME_HREF)
        .with_parent(json!({"type": "competition", "href": "/premier-league/startseite/wettbewerb/GB1"}));
    let records = parse_records(GAME_PAGE, &game_request(base));
    assert_eq!(records.len(), 1);
    records.into_iter().next().unwrap()
}

#[test]
fn test_game_scoreboard() {
    let game = parse_game_record();

    assert_eq!(game.kind(), Some("game"));
    assert_eq!(game.href(), Some(GAME_HREF));
    assert_eq!(game.get("game_id"), Some(&json!(4625774)));
    assert_eq!(game.get_str("result"), Some("2:1"));
    assert_eq!(game.get_str("halftime_score"), Some("1:1"));
    assert_eq!(game.get_str("matchday"), Some("1.Matchday"));
    assert_eq!(game.get_str("date"), Some("Fri, 8/15/25"));
    assert_eq!(game.get_str("date_iso"), Some("2025-08-15"));
    assert_eq!(game.get_str("kickoff_time"), Some("8:00 PM"));
    assert_eq!(game.get_str("stadium"), Some("Anfield"));
    assert_eq!(game.get_str("attendance"), Some("60.364"));
    assert_eq!(
        game.get("referee"),
        Some(&json!({"name": "Anthony Taylor", "href": "/anthony-taylor/profil/schiedsrichter/1"}))
    );
    assert_eq!(
        game.get("home_club"),
        Some(&json!({"type": "club", "href": "/fc-liverpool/spielplan/verein/31/saison_id/2025"}))
    );
    assert_eq!(game.get_str("home_club_position"), Some("Position: 1"));
    assert_eq!(game.get_str("away_club_position"), Some("Position: 14"));
    assert_eq!(
        game.get("parent"),
        Some(&json!({"type": "competition", "href": "/premier-league/startseite/wettbewerb/GB1"}))
    );
}

#[test]
fn test_game_events_in_page_order() {
    let game = parse_game_record();
    let events = game.get("events").and_then(Value::as_array).unwrap();

    let kinds: Vec<&str> = events.iter().filter_map(|e| e["type"].as_str()).collect();
    assert_eq!(
        kinds,
        ["Goals", "Goals", "Goals", "Substitutions", "Substitutions", "Cards"]
    );
    let minutes: Vec<i64> = events.iter().filter_map(|e| e["minute"].as_i64()).collect();
    assert_eq!(minutes, [12, 45, 55, 60, 70, 85]);
    assert_eq!(events[1]["extra"], json!(1));
    assert_eq!(events[0]["extra"], Value::Null);

    let opener = &events[0];
    assert_eq!(opener["player"]["href"], "/mohamed-salah/profil/spieler/148455");
    assert_eq!(
        opener["club"],
        json!({"name": "Liverpool FC", "href": "/fc-liverpool/startseite/verein/31/saison_id/2025"})
    );
    assert_eq!(opener["action"]["result"], "1:0");
    assert_eq!(
        opener["action"]["description"],
        "Left-footed shot, 1. Goal of the Season"
    );
    assert_eq!(
        opener["action"]["player_assist"]["href"],
        "/florian-wirtz/profil/spieler/598577"
    );

    let substitution = &events[3];
    assert_eq!(
        substitution["action"]["player_in"]["href"],
        "/federico-chiesa/profil/spieler/341092"
    );
    assert_eq!(substitution["action"]["description"], "Tactical");
    assert_eq!(substitution["action"]["player_assist"]["href"], Value::Null);
}

#[test]
fn test_game_lineups_and_managers() {
    let game = parse_game_record();

    let names = |key: &str| -> Vec<String> {
        game.get(key)
            .and_then(Value::as_array)
            .unwrap()
            .iter()
            .filter_map(|p| p["name"].as_str().map(str::to_string))
            .collect()
    };
    assert_eq!(
        names("home_starting_lineup"),
        ["Alisson", "Virgil van Dijk", "Mohamed Salah"]
    );
    assert_eq!(
        names("home_substitutes"),
        ["Federico Chiesa", "Caoimhin Kelleher"]
    );
    assert_eq!(
        names("away_starting_lineup"),
        ["Djordje Petrovic", "Marcos Senesi"]
    );
    assert_eq!(names("away_substitutes"), ["Evanilson"]);

    assert_eq!(
        game.get("home_manager"),
        Some(&json!({"name": "Arne Slot", "href": "/arne-slot/profil/trainer/24451"}))
    );
    assert_eq!(
        game.get("away_manager"),
        Some(&json!({"name": "Andoni Iraola", "href": "/andoni-iraola/profil/trainer/50155"}))
    );
}

#[test]
fn test_one_manager_row_leaves_both_keys_out() {
    let page = GAME_PAGE.replace(
        r#"<tr class="bench-table__tr"><td><b>Manager:</b></td><td><a href="/andoni-iraola/profil/trainer/50155">Andoni Iraola</a></td></tr>"#,
        "",
    );
    let records = parse_records(&page, &game_request(Context::new().with_href(GAME_HREF)));

    assert!(!records[0].contains_key("home_manager"));
    assert!(!records[0].contains_key("away_manager"));
}

#[test]
fn test_single_lineup_section_empties_all_lineups() {
    let page = GAME_PAGE.replacen(r#"<div class="large-6 columns">"#, "<div>", 1);
    let records = parse_records(&page, &game_request(Context::new().with_href(GAME_HREF)));

    for key in [
        "home_starting_lineup",
        "home_substitutes",
        "away_starting_lineup",
        "away_substitutes",
    ] {
        assert_eq!(records[0].get(key), Some(&json!([])), "{key}");
    }
    assert_eq!(records[0].get_str("result"), Some("2:1"));
}

#[test]
fn test_shootout_kicks_follow_timed_events() {
    let shootout = r#"<div class="box"><h2 class="content-box-headline">Penalty shoot-out</h2><ul>
        <li><div class="sb-aktion"><div class="sb-aktion-spielstand"><b>1:0</b></div>
        <div class="sb-aktion-spielerbild"><a href="/mohamed-salah/profil/spieler/148455"></a></div>
        <div class="sb-aktion-aktion">Penalty scored</div></div></li>
        <li><div class="sb-aktion"><div class="sb-aktion-spielstand"><b>1:0</b></div>
        <div class="sb-aktion-spielerbild"><a href="/evanilson/profil/spieler/614258"></a></div>
        <div class="sb-aktion-aktion">Penalty saved</div></div></li>
        </ul></div>"#;
    let page = GAME_PAGE.replace("<div class=\"row\">", &format!("{shootout}<div class=\"row\">"));
    let records = parse_records(&page, &game_request(Context::new().with_href(GAME_HREF)));
    let events = records[0].get("events").and_then(Value::as_array).unwrap();

    assert_eq!(events.len(), 8);
    assert_eq!(events[6]["type"], "Shootout");
    assert_eq!(events[6]["minute"], json!(-1));
    assert_eq!(events[7]["action"]["description"], "Penalty saved");
}

#[test]
fn test_parsing_is_idempotent() {
    let first = parse_game_record().to_json_line().unwrap();
    let second = parse_game_record().to_json_line().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_absolute_base_href_is_reduced_to_path() {
    let base = Context::new().with_href(format!("https://www.transfermarkt.co.uk{GAME_HREF}/"));
    let records = parse_records(GAME_PAGE, &game_request(base));

    let href = records[0].href().unwrap();
    assert!(!href.starts_with("http"));
    assert_eq!(href, GAME_HREF);
    assert_eq!(records[0].get("game_id"), Some(&json!(4625774)));
}
