use itertools::Itertools;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::error::{Result, TfmktError};
use crate::model::{Context, GameLineups, Lineup, LineupPlayer, RecordKind};
use crate::scraper::contract::LineupsContract;
use crate::scraper::fields::non_empty;
use crate::scraper::game::game_id_from_href;
use crate::scraper::{attr, child_elements, first_own_text, full_text, own_text, select_attr};

enum BoxKind {
    Starting { formation: Option<String> },
    Substitutes,
}

/// Parse a game's line-ups page into a home and an away line-up.
///
/// The first starting box on the page is the home side's, the second the away
/// side's; substitutes boxes pair up the same way.
pub(crate) fn parse_game_lineups(
    document: &Html,
    base: &Context,
    contract: &LineupsContract,
) -> Result<GameLineups> {
    let root = document.root_element();
    let href = base
        .href
        .clone()
        .ok_or(TfmktError::MissingContext { field: "href" })?;
    let game_id = game_id_from_href(&href).ok_or(TfmktError::MissingContext { field: "game_id" })?;

    let home_selector = Selector::parse(contract.home_box)?;
    let away_selector = Selector::parse(contract.away_box)?;
    let box_selector = Selector::parse(contract.boxes)?;
    let headline_selector = Selector::parse(contract.headline)?;
    let row_selector = Selector::parse(contract.rows)?;
    let player_selector = Selector::parse(contract.player_link)?;
    let number_selector = Selector::parse(contract.shirt_number)?;
    let position_selector = Selector::parse(contract.position)?;
    let captain_selector = Selector::parse(contract.captain)?;
    let anchor_selector = Selector::parse("a")?;

    let mut starting = Vec::new();
    let mut substitutes = Vec::new();
    for lineup_box in root.select(&box_selector) {
        let Some(headline) = child_elements(&lineup_box)
            .find(|e| headline_selector.matches(e))
        else {
            continue;
        };
        let title = own_text(&headline);
        let kind = if let Some(rest) = title.strip_prefix(contract.starting_title) {
            BoxKind::Starting {
                formation: non_empty(rest.trim_start_matches(':')),
            }
        } else if title.starts_with(contract.substitutes_title) {
            BoxKind::Substitutes
        } else {
            continue;
        };

        let players = lineup_box
            .select(&row_selector)
            .filter_map(|row| {
                let link = row.select(&player_selector).next()?;
                Some(LineupPlayer {
                    number: row
                        .select(&number_selector)
                        .next()
                        .and_then(|n| non_empty(full_text(&n)))
                        .filter(|n| n != "-"),
                    name: attr(&link, "title").or_else(|| first_own_text(&link))?,
                    position: row
                        .select(&position_selector)
                        .next()
                        .and_then(|td| non_empty(full_text(&td))),
                    team_captain: row.select(&captain_selector).next().is_some(),
                    href: attr(&link, "href")?,
                })
            })
            .collect_vec();
        let club_href = select_attr(&headline, &anchor_selector, "href");

        match kind {
            BoxKind::Starting { formation } => starting.push((club_href, formation, players)),
            BoxKind::Substitutes => substitutes.push(players),
        }
    }

    if starting.len() < 2 {
        warn!(%href, boxes = starting.len(), "line-ups page without two starting boxes");
    }

    let mut starting = starting.into_iter();
    let mut substitutes = substitutes.into_iter();
    let mut lineup = |scoreboard: Option<String>| {
        let (headline_href, formation, starting_lineup) = starting.next().unwrap_or_default();
        Lineup {
            href: scoreboard.or(headline_href),
            formation,
            starting_lineup,
            substitutes: substitutes.next().unwrap_or_default(),
        }
    };
    let home_club = lineup(select_attr(&root, &home_selector, "href"));
    let away_club = lineup(select_attr(&root, &away_selector, "href"));

    debug!(
        game_id,
        home = home_club.starting_lineup.len(),
        away = away_club.starting_lineup.len(),
        "parsed game line-ups"
    );

    Ok(GameLineups {
        kind: RecordKind::GameLineups,
        href,
        game_id,
        home_club,
        away_club,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_row(number: &str, name: &str, id: u32, position: &str, captain: bool) -> String {
        let captain = if captain {
            r#"<span class="kapitaenicon-table"></span>"#
        } else {
            ""
        };
        format!(
            r#"<tr class="odd"><td><div class="rn_nummer">{number}</div></td><td>
            <table class="inline-table">
              <tr><td><a href="/p/profil/spieler/{id}" title="{name}">{name}</a>{captain}</td></tr>
              <tr><td>{position}</td></tr>
            </table></td></tr>"#
        )
    }

    fn lineups_page() -> Html {
        Html::parse_document(&format!(
            r#"<div class="sb-heim"><a href="/fc-liverpool/startseite/verein/31">Liverpool</a></div>
            <div class="sb-gast"><a href="/afc-bournemouth/startseite/verein/989">Bournemouth</a></div>
            <div class="box"><h2 class="content-box-headline"><a href="/fc-liverpool/startseite/verein/31"></a> Starting Line-up: 4-2-3-1 </h2>
              <table class="items"><tbody>{}{}</tbody></table></div>
            <div class="box"><h2 class="content-box-headline">Starting Line-up: 4-4-2</h2>
              <table class="items"><tbody>{}</tbody></table></div>
            <div class="box"><h2 class="content-box-headline">Substitutes</h2>
              <table class="items"><tbody>{}</tbody></table></div>
            <div class="box"><h2 class="content-box-headline">Substitutes</h2>
              <table class="items"><tbody></tbody></table></div>
            <div class="box"><h2 class="content-box-headline">Other</h2></div>"#,
            player_row("1", "Alisson", 105470, "Goalkeeper", false),
            player_row("4", "Virgil van Dijk", 139208, "Centre-Back", true),
            player_row("-", "Kepa", 192279, "Goalkeeper", false),
            player_row("62", "Caoimhin Kelleher", 249994, "Goalkeeper", false),
        ))
    }

    #[test]
    fn test_parse_game_lineups() {
        let base = Context::new().with_href("/spielbericht/aufstellung/spielbericht/4625774");
        let lineups =
            parse_game_lineups(&lineups_page(), &base, &LineupsContract::DEFAULT).unwrap();

        assert_eq!(lineups.game_id, 4625774);
        assert_eq!(lineups.kind, RecordKind::GameLineups);

        let home = &lineups.home_club;
        assert_eq!(home.href.as_deref(), Some("/fc-liverpool/startseite/verein/31"));
        assert_eq!(home.formation.as_deref(), Some("4-2-3-1"));
        assert_eq!(home.starting_lineup.len(), 2);
        let captain = &home.starting_lineup[1];
        assert_eq!(captain.name, "Virgil van Dijk");
        assert_eq!(captain.number.as_deref(), Some("4"));
        assert_eq!(captain.position.as_deref(), Some("Centre-Back"));
        assert!(captain.team_captain);
        assert!(!home.starting_lineup[0].team_captain);
        assert_eq!(home.substitutes.len(), 1);

        let away = &lineups.away_club;
        assert_eq!(away.href.as_deref(), Some("/afc-bournemouth/startseite/verein/989"));
        assert_eq!(away.formation.as_deref(), Some("4-4-2"));
        assert_eq!(away.starting_lineup[0].number, None);
        assert!(away.substitutes.is_empty());
    }

    #[test]
    fn test_missing_boxes_degrade_to_empty_lineups() {
        let document = Html::parse_document("<div class='box'><p>Line-ups not yet known</p></div>");
        let base = Context::new().with_href("/spielbericht/aufstellung/spielbericht/1");
        let lineups = parse_game_lineups(&document, &base, &LineupsContract::DEFAULT).unwrap();
        assert_eq!(lineups.home_club, Lineup::default());
        assert_eq!(lineups.away_club, Lineup::default());
    }
}
