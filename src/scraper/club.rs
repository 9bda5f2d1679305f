use std::collections::HashSet;

use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::{Result, TfmktError};
use crate::model::{Club, Context, RecordKind, SquadPlayer};
use crate::scraper::contract::ClubContract;
use crate::scraper::fields::{extract_code, extract_numeric_id, non_empty};
use crate::scraper::{
    attr, child_elements, child_named, first_own_text, full_text, own_text, select_attr,
    select_text_opt,
};

/// Parse a club page (start or squad page) into a club with its squad.
pub(crate) fn parse_club(document: &Html, base: &Context, contract: &ClubContract) -> Result<Club> {
    let root = document.root_element();

    let canonical_selector = Selector::parse(contract.canonical)?;
    let canonical = select_attr(&root, &canonical_selector, "href");
    let href = base
        .href
        .clone()
        .or_else(|| canonical.clone())
        .ok_or(TfmktError::MissingContext { field: "href" })?;
    let code = canonical
        .as_deref()
        .and_then(extract_code)
        .or_else(|| extract_code(&href));

    let market_value_selector = Selector::parse(contract.market_value)?;
    let total_market_value = select_text_opt(&root, &market_value_selector);

    let item_selector = Selector::parse(contract.info_items)?;
    let items = root.select(&item_selector).collect_vec();
    let info = |label: &str| items.iter().find(|li| own_text(li).contains(label)).copied();

    let squad_size = info(contract.squad_size_label).and_then(|li| nested_text(li, &["span"]));
    let average_age = info(contract.average_age_label).and_then(|li| nested_text(li, &["span"]));
    let foreigners = info(contract.foreigners_label);
    let national_team_players =
        info(contract.national_players_label).and_then(|li| nested_text(li, &["span", "a"]));
    let stadium = info(contract.stadium_label);
    let net_transfer_record = info(contract.transfer_record_label)
        .and_then(|li| nested_text(li, &["span", "span", "a"]));

    let coach_selector = Selector::parse(contract.coach)?;
    let coach_name = select_text_opt(&root, &coach_selector);

    let legal_name_selector = Selector::parse(contract.legal_name)?;
    let headline_selector = Selector::parse(contract.headline)?;
    let name = select_text_opt(&root, &legal_name_selector).or_else(|| {
        root.select(&headline_selector)
            .next()
            .and_then(|h1| first_own_text(&h1))
    });

    let players = parse_squad(document, contract)?;
    if players.is_empty() {
        warn!(%href, "no players parsed for club");
    }
    debug!(?name, ?code, players = players.len(), "parsed club");

    Ok(Club {
        kind: RecordKind::Club,
        href,
        code,
        name,
        total_market_value,
        squad_size,
        average_age,
        foreigners_number: foreigners.and_then(|li| nested_text(li, &["span", "a"])),
        foreigners_percentage: foreigners.and_then(|li| nested_text(li, &["span", "span"])),
        national_team_players,
        stadium_name: stadium.and_then(|li| nested_text(li, &["span", "a"])),
        stadium_seats: stadium.and_then(|li| nested_text(li, &["span", "span"])),
        net_transfer_record,
        coach_name,
        players,
    })
}

/// Own text of the element reached by walking `path` through child tags.
fn nested_text(element: ElementRef, path: &[&str]) -> Option<String> {
    path.iter()
        .try_fold(element, |current, tag| child_named(&current, tag))
        .and_then(|target| first_own_text(&target))
}

/// Parse the squad table. A player listed twice keeps its first row.
fn parse_squad(document: &Html, contract: &ClubContract) -> Result<Vec<SquadPlayer>> {
    let row_selector = Selector::parse(contract.squad_rows)?;
    let number_selector = Selector::parse(contract.shirt_number)?;
    let link_selector = Selector::parse(contract.player_link)?;
    let position_selector = Selector::parse(contract.position)?;
    let flag_selector = Selector::parse(contract.flags)?;
    let anchor_selector = Selector::parse("a")?;

    let mut seen = HashSet::new();
    let mut players = Vec::new();
    for row in document.select(&row_selector) {
        let Some(link) = row.select(&link_selector).next() else {
            continue;
        };
        let Some(href) = attr(&link, "href") else {
            continue;
        };
        let cells = child_elements(&row)
            .filter(|e| e.value().name() == "td")
            .collect_vec();
        if cells.len() < contract.min_cells {
            continue;
        }
        let Some(player_id) = extract_numeric_id(&href, "spieler") else {
            continue;
        };
        if !seen.insert(player_id) {
            continue;
        }

        // The trailing eight cells hold the player's details in a fixed order.
        let Ok([dob_age, nationality, height, foot, joined, signed_from, contract_cell, value]) =
            <[ElementRef; 8]>::try_from(&cells[cells.len() - 8..])
        else {
            continue;
        };

        let number = select_text_opt(&cells[0], &number_selector).filter(|n| n != "-");
        let (date_of_birth, age) = split_birth_and_age(&full_text(&dob_age));
        let nationality = cells_titles(&nationality, &flag_selector);
        let signed_from_link = signed_from.select(&anchor_selector).next();

        players.push(SquadPlayer {
            player_id,
            href,
            number,
            name: non_empty(full_text(&link)),
            position: select_text_opt(&row, &position_selector),
            date_of_birth,
            age,
            nationality,
            height: first_own_text(&height),
            foot: first_own_text(&foot),
            joined: first_own_text(&joined),
            signed_from_href: signed_from_link.and_then(|a| attr(&a, "href")),
            signed_from_name: signed_from_link.and_then(|a| attr(&a, "title")),
            contract_expires: first_own_text(&contract_cell),
            market_value: value
                .select(&anchor_selector)
                .next()
                .and_then(|a| non_empty(full_text(&a))),
        });
    }
    Ok(players)
}

/// Split `Jan 1, 1990 (34)` into the date and the age.
fn split_birth_and_age(text: &str) -> (Option<String>, Option<u32>) {
    match text.split_once('(') {
        Some((date, rest)) => (
            non_empty(date),
            rest.trim().trim_end_matches(')').trim().parse().ok(),
        ),
        None => (non_empty(text), None),
    }
}

/// Flag titles in a cell, comma separated.
fn cells_titles(cell: &ElementRef, flag_selector: &Selector) -> Option<String> {
    let titles = cell
        .select(flag_selector)
        .filter_map(|img| attr(&img, "title"))
        .join(", ");
    non_empty(titles)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLUB_PAGE: &str = r##"<html><head>
        <link rel="canonical" href="https://www.transfermarkt.co.uk/fc-chelsea/kader/verein/631/saison_id/2024">
        </head><body>
        <h1 class="data-header__headline-wrapper"> Chelsea FC </h1>
        <div class="dataMarktwert"><a href="#">€1.02bn <span>Total market value</span></a></div>
        <ul>
          <li>Squad size: <span>30</span></li>
          <li>Average age: <span>24.1</span></li>
          <li>Foreigners: <span><a href="#">22</a> <span>73.3 %</span></span></li>
          <li>National team players: <span><a href="#">15</a></span></li>
          <li>Stadium: <span><a href="#">Stamford Bridge</a> <span>40,343 Seats</span></span></li>
          <li>Current transfer record: <span><span><a href="#">€-14.90m</a></span></span></li>
        </ul>
        <div data-viewport="Mitarbeiter"><div class="container-hauptinfo"><a href="/enzo-maresca/profil/trainer/1"> Enzo Maresca </a></div></div>
        <div class="responsive-table"><table class="items"><tbody>
          <tr>
            <td><div class="rn_nummer">1</div></td>
            <td class="posrela"><table class="inline-table"><tr><td><a href="/robert-sanchez/profil/spieler/403151">Robert Sánchez</a></td></tr><tr><td> Goalkeeper </td></tr></table></td>
            <td>Nov 18, 1997 (26)</td>
            <td><img title="Spain"><img title="England"></td>
            <td>1,97m</td><td>right</td><td>Aug 2, 2023</td>
            <td><a href="/brighton/startseite/verein/1237" title="Brighton &amp; Hove Albion"><img></a></td>
            <td>Jun 30, 2030</td>
            <td><a href="#">€20.00m</a></td>
          </tr>
          <tr>
            <td><div class="rn_nummer">-</div></td>
            <td class="posrela"><table class="inline-table"><tr><td><a href="/robert-sanchez/profil/spieler/403151">Duplicate</a></td></tr></table></td>
            <td></td><td></td><td></td><td></td><td></td><td></td><td></td><td></td>
          </tr>
          <tr><td>short</td><td class="posrela"><a href="/x/profil/spieler/9">X</a></td></tr>
        </tbody></table></div>
        </body></html>"##;

    #[test]
    fn test_parse_club_details() {
        let document = Html::parse_document(CLUB_PAGE);
        let base = Context::new()
            .with_kind("club")
            .with_href("/fc-chelsea/startseite/verein/631");
        let club = parse_club(&document, &base, &ClubContract::DEFAULT).unwrap();

        assert_eq!(club.href, "/fc-chelsea/startseite/verein/631");
        assert_eq!(club.code.as_deref(), Some("fc-chelsea"));
        assert_eq!(club.name.as_deref(), Some("Chelsea FC"));
        assert_eq!(club.total_market_value.as_deref(), Some("€1.02bn"));
        assert_eq!(club.squad_size.as_deref(), Some("30"));
        assert_eq!(club.average_age.as_deref(), Some("24.1"));
        assert_eq!(club.foreigners_number.as_deref(), Some("22"));
        assert_eq!(club.foreigners_percentage.as_deref(), Some("73.3 %"));
        assert_eq!(club.national_team_players.as_deref(), Some("15"));
        assert_eq!(club.stadium_name.as_deref(), Some("Stamford Bridge"));
        assert_eq!(club.stadium_seats.as_deref(), Some("40,343 Seats"));
        assert_eq!(club.net_transfer_record.as_deref(), Some("€-14.90m"));
        assert_eq!(club.coach_name.as_deref(), Some("Enzo Maresca"));
    }

    #[test]
    fn test_parse_squad_rows() {
        let document = Html::parse_document(CLUB_PAGE);
        let base = Context::new().with_href("/fc-chelsea/startseite/verein/631");
        let club = parse_club(&document, &base, &ClubContract::DEFAULT).unwrap();

        assert_eq!(club.players.len(), 1);
        let keeper = &club.players[0];
        assert_eq!(keeper.player_id, 403151);
        assert_eq!(keeper.number.as_deref(), Some("1"));
        assert_eq!(keeper.name.as_deref(), Some("Robert Sánchez"));
        assert_eq!(keeper.position.as_deref(), Some("Goalkeeper"));
        assert_eq!(keeper.date_of_birth.as_deref(), Some("Nov 18, 1997"));
        assert_eq!(keeper.age, Some(26));
        assert_eq!(keeper.nationality.as_deref(), Some("Spain, England"));
        assert_eq!(keeper.height.as_deref(), Some("1,97m"));
        assert_eq!(keeper.foot.as_deref(), Some("right"));
        assert_eq!(keeper.joined.as_deref(), Some("Aug 2, 2023"));
        assert_eq!(
            keeper.signed_from_href.as_deref(),
            Some("/brighton/startseite/verein/1237")
        );
        assert_eq!(
            keeper.signed_from_name.as_deref(),
            Some("Brighton & Hove Albion")
        );
        assert_eq!(keeper.contract_expires.as_deref(), Some("Jun 30, 2030"));
        assert_eq!(keeper.market_value.as_deref(), Some("€20.00m"));
    }

    #[test]
    fn test_code_falls_back_to_base_href() {
        let document = Html::parse_document("<html><body><h1 class='data-header__headline-wrapper'>X</h1></body></html>");
        let base = Context::new().with_href("/arsenal-fc/startseite/verein/11");
        let club = parse_club(&document, &base, &ClubContract::DEFAULT).unwrap();
        assert_eq!(club.code.as_deref(), Some("arsenal-fc"));
        assert!(club.players.is_empty());
        assert_eq!(club.squad_size, None);
    }

    #[test]
    fn test_code_is_percent_decoded() {
        let document = Html::parse_document("<html><body></body></html>");
        let base = Context::new().with_href("/1-fc-k%C3%B6ln/startseite/verein/3");
        let club = parse_club(&document, &base, &ClubContract::DEFAULT).unwrap();
        assert_eq!(club.code.as_deref(), Some("1-fc-köln"));
        assert_eq!(club.href, "/1-fc-k%C3%B6ln/startseite/verein/3");
    }

    #[test]
    fn test_missing_href_is_reported() {
        let document = Html::parse_document("<html></html>");
        let result = parse_club(&document, &Context::new(), &ClubContract::DEFAULT);
        assert!(matches!(
            result,
            Err(TfmktError::MissingContext { field: "href" })
        ));
    }

    #[test]
    fn test_split_birth_and_age() {
        assert_eq!(
            split_birth_and_age("Nov 18, 1997 (26)"),
            (Some("Nov 18, 1997".to_string()), Some(26))
        );
        assert_eq!(split_birth_and_age(""), (None, None));
        assert_eq!(split_birth_and_age("- (-)"), (Some("-".to_string()), None));
    }
}
