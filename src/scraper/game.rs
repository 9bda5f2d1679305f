use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use strum::IntoEnumIterator;
use tracing::{debug, warn};

use crate::error::{Result, TfmktError};
use crate::model::{
    ClubRef, Context, EventAction, EventKind, Game, GameEvent, HrefLink, NamedLink, RecordKind,
    SHOOTOUT_MINUTE,
};
use crate::scraper::contract::GameContract;
use crate::scraper::fields::{
    extract_iso_date, extract_kickoff_time, extract_numeric_id, extract_score, last_path_segment,
    non_empty, normalize_space, parse_sprite_style, sprite_offset_to_minute,
};
use crate::scraper::{
    attr, child_elements, child_named, child_with_class, first_own_text, full_text, own_text,
};

/// Parse a game report page.
///
/// Layout drift degrades per field: a missing scoreboard leaves the club and
/// score fields empty, fewer than two line-up sections leave every line-up
/// list empty.
pub(crate) fn parse_game(document: &Html, base: &Context, contract: &GameContract) -> Result<Game> {
    let href = base
        .href
        .clone()
        .ok_or(TfmktError::MissingContext { field: "href" })?;
    let game_id = game_id_from_href(&href).ok_or(TfmktError::MissingContext { field: "game_id" })?;

    let box_selector = Selector::parse(contract.game_box)?;
    let home_selector = Selector::parse(contract.home_box)?;
    let away_selector = Selector::parse(contract.away_box)?;
    let anchor_selector = Selector::parse("a")?;

    let game_box = document
        .select(&box_selector)
        .find(|b| b.select(&home_selector).next().is_some());
    if game_box.is_none() {
        warn!(%href, "game page has no scoreboard");
    }
    let home_box = game_box.and_then(|b| b.select(&home_selector).next());
    let away_box = game_box.and_then(|b| b.select(&away_selector).next());
    let club_href = |club: Option<ElementRef>| {
        club.and_then(|c| c.select(&anchor_selector).next())
            .and_then(|a| attr(&a, "href"))
    };
    let club_position = |club: Option<ElementRef>| {
        club.and_then(|c| child_named(&c, "p"))
            .and_then(|p| first_own_text(&p))
    };

    let schedule = match game_box {
        Some(game_box) => parse_schedule(&game_box, contract)?,
        None => Schedule::default(),
    };
    let venue = match game_box {
        Some(game_box) => parse_venue(&game_box, contract)?,
        None => Venue::default(),
    };
    let (result, halftime_score) = match game_box {
        Some(game_box) => parse_score(&game_box, contract)?,
        None => (None, None),
    };

    let (home_manager, away_manager) = parse_managers(document, contract)?;
    let events = parse_events(document, contract)?;
    let lineups = parse_lineups(document, contract)?;

    debug!(game_id, events = events.len(), "parsed game");

    Ok(Game {
        kind: RecordKind::Game,
        href,
        game_id,
        home_club: ClubRef::new(club_href(home_box)),
        home_club_position: club_position(home_box),
        away_club: ClubRef::new(club_href(away_box)),
        away_club_position: club_position(away_box),
        result,
        halftime_score,
        matchday: schedule.matchday,
        date: schedule.date,
        date_iso: schedule.date_iso,
        kickoff_time: schedule.kickoff_time,
        stadium: venue.stadium,
        attendance: venue.attendance,
        referee: venue.referee,
        events,
        home_starting_lineup: lineups.home_starting,
        home_substitutes: lineups.home_substitutes,
        away_starting_lineup: lineups.away_starting,
        away_substitutes: lineups.away_substitutes,
        home_manager,
        away_manager,
    })
}

/// The numeric game id at the end of a game report href.
pub(crate) fn game_id_from_href(href: &str) -> Option<u64> {
    extract_numeric_id(href, "spielbericht")
        .or_else(|| last_path_segment(href).and_then(|id| id.parse().ok()))
}

#[derive(Debug, Default)]
struct Schedule {
    matchday: Option<String>,
    date: Option<String>,
    date_iso: Option<chrono::NaiveDate>,
    kickoff_time: Option<String>,
}

fn parse_schedule(game_box: &ElementRef, contract: &GameContract) -> Result<Schedule> {
    let datetime_selector = Selector::parse(contract.datetime_box)?;
    let date_selector = Selector::parse(contract.date_link)?;

    let Some(datetime) = game_box.select(&datetime_selector).next() else {
        return Ok(Schedule::default());
    };
    let texts = child_elements(&datetime)
        .filter(|e| e.value().name() == "p")
        .flat_map(|p| p.text())
        .filter_map(non_empty)
        .collect_vec();
    let date_link = datetime.select(&date_selector).next();

    Ok(Schedule {
        matchday: texts
            .first()
            .and_then(|t| t.split("  ").next())
            .and_then(non_empty),
        date: date_link.and_then(|a| non_empty(full_text(&a))),
        date_iso: date_link
            .and_then(|a| a.value().attr("href"))
            .and_then(extract_iso_date),
        // First clock-like text wins.
        kickoff_time: texts.iter().find_map(|t| extract_kickoff_time(t)),
    })
}

#[derive(Debug, Default)]
struct Venue {
    stadium: Option<String>,
    attendance: Option<String>,
    referee: Option<NamedLink>,
}

fn parse_venue(game_box: &ElementRef, contract: &GameContract) -> Result<Venue> {
    let venue_selector = Selector::parse(contract.venue_box)?;
    let Some(venue) = game_box.select(&venue_selector).next() else {
        return Ok(Venue::default());
    };

    let details = child_elements(&venue).next();
    let stadium = details
        .and_then(|d| child_named(&d, "a"))
        .and_then(|a| non_empty(full_text(&a)));
    let attendance = details
        .and_then(|d| child_named(&d, "strong"))
        .and_then(|strong| {
            let text = full_text(&strong);
            non_empty(text.strip_prefix(contract.attendance_prefix).unwrap_or(&text))
        });
    let referee = child_elements(&venue)
        .find(|e| {
            e.value().name() == "a"
                && e.value()
                    .attr("href")
                    .is_some_and(|h| h.contains(contract.referee_path))
        })
        .and_then(|a| {
            Some(NamedLink {
                name: Some(attr(&a, "title")?),
                href: attr(&a, "href"),
            })
        });

    Ok(Venue {
        stadium,
        attendance,
        referee,
    })
}

fn parse_score(
    game_box: &ElementRef,
    contract: &GameContract,
) -> Result<(Option<String>, Option<String>)> {
    let result_selector = Selector::parse(contract.result_box)?;
    let final_selector = Selector::parse(contract.final_score)?;
    let halftime_selector = Selector::parse(contract.halftime_score)?;

    let Some(result_box) = game_box.select(&result_selector).next() else {
        return Ok((None, None));
    };
    let result = result_box
        .select(&final_selector)
        .next()
        .and_then(|e| first_own_text(&e));
    let halftime = result_box
        .select(&halftime_selector)
        .next()
        .and_then(|e| extract_score(&full_text(&e)));
    Ok((result, halftime))
}

/// Home and away managers, only when the page lists exactly two.
fn parse_managers(
    document: &Html,
    contract: &GameContract,
) -> Result<(Option<NamedLink>, Option<NamedLink>)> {
    let row_selector = Selector::parse("tr")?;

    let labelled = |td: &ElementRef| {
        child_elements(td)
            .filter(|e| matches!(e.value().name(), "b" | "div"))
            .any(|e| own_text(&e).contains(contract.manager_label))
    };
    let managers = document
        .select(&row_selector)
        .filter(|row| {
            child_named(row, "td")
                .as_ref()
                .is_some_and(|td| labelled(td))
        })
        .filter_map(|row| {
            child_elements(&row)
                .filter(|e| e.value().name() == "td")
                .nth(1)
        })
        .flat_map(|td| child_elements(&td).filter(|e| e.value().name() == "a").collect_vec())
        .map(|a| NamedLink {
            name: first_own_text(&a),
            href: attr(&a, "href"),
        })
        .collect_vec();

    match <[NamedLink; 2]>::try_from(managers) {
        Ok([home, away]) => Ok((Some(home), Some(away))),
        Err(found) => {
            debug!(count = found.len(), "manager pair not found");
            Ok((None, None))
        }
    }
}

fn parse_events(document: &Html, contract: &GameContract) -> Result<Vec<GameEvent>> {
    let div_selector = Selector::parse("div")?;
    let item_selector = Selector::parse(contract.event_items)?;
    let substitution_selector = Selector::parse(contract.substitution_out)?;
    let sections = document
        .select(&div_selector)
        .filter_map(|div| {
            let heading = child_elements(&div)
                .find(|e| {
                    e.value().name() == "h2"
                        && e.value().classes().any(|c| c == contract.headline_class)
                })
                .and_then(|h2| first_own_text(&h2))?;
            Some((heading, div))
        })
        .collect_vec();

    let mut timed = Vec::new();
    let mut shootout = Vec::new();
    for kind in EventKind::iter() {
        let heading = match kind {
            EventKind::Shootout => contract.shootout_heading.to_string(),
            other => other.to_string(),
        };
        let events = sections
            .iter()
            .filter(|(title, _)| *title == heading)
            .flat_map(|(_, div)| div.select(&item_selector))
            .map(|item| parse_event(item, kind, &substitution_selector, &div_selector, contract))
            .collect_vec();
        match kind {
            EventKind::Shootout => shootout.extend(events),
            _ => timed.extend(events),
        }
    }

    // Stable sort keeps page order within a minute; undecodable minutes go last.
    timed.sort_by_key(|e| (e.minute.is_none(), e.minute, e.extra));
    timed.extend(shootout);
    Ok(timed)
}

fn parse_event(
    item: ElementRef,
    kind: EventKind,
    substitution_selector: &Selector,
    div_selector: &Selector,
    contract: &GameContract,
) -> GameEvent {
    let (minute, extra) = match kind {
        EventKind::Shootout => (Some(SHOOTOUT_MINUTE), None),
        _ => event_clock(item, contract),
    };

    let player_href = child_with_class(&item, contract.event_player_class)
        .and_then(|div| child_named(&div, "a"))
        .and_then(|a| attr(&a, "href"));
    let club_link = child_with_class(&item, contract.event_club_class)
        .and_then(|div| child_named(&div, "a"));
    let score = child_with_class(&item, contract.event_score_class)
        .and_then(|div| child_named(&div, "b"))
        .and_then(|b| first_own_text(&b));

    let action = child_with_class(&item, contract.event_action_class);
    let description = action.and_then(|a| {
        non_empty(own_text(&a)).or_else(|| {
            let outgoing = a
                .select(substitution_selector)
                .map(|s| full_text(&s))
                .join(" ");
            non_empty(normalize_space(&outgoing))
        })
    });
    let player_in = action
        .and_then(|a| a.select(div_selector).find_map(|div| child_named(&div, "a")))
        .and_then(|a| attr(&a, "href"));
    let player_assist = action.and_then(|a| {
        child_elements(&a)
            .filter(|e| e.value().name() == "a")
            .nth(1)
            .and_then(|link| attr(&link, "href"))
    });

    GameEvent {
        kind,
        minute,
        extra,
        player: HrefLink::new(player_href),
        club: NamedLink {
            name: club_link.and_then(|a| attr(&a, "title")),
            href: club_link.and_then(|a| attr(&a, "href")),
        },
        action: EventAction {
            result: score,
            description,
            player_in: HrefLink::new(player_in),
            player_assist: HrefLink::new(player_assist),
        },
    }
}

/// Minute and stoppage time from the event's clock sprite.
fn event_clock(item: ElementRef, contract: &GameContract) -> (Option<i32>, Option<u32>) {
    let Some(sprite) = child_named(&item, "div")
        .and_then(|div| child_with_class(&div, contract.minute_sprite_class))
    else {
        return (None, None);
    };

    let minute = sprite
        .value()
        .attr("style")
        .and_then(parse_sprite_style)
        .and_then(|(dx, dy)| match sprite_offset_to_minute(dx, dy) {
            Ok(minute) => Some(minute),
            Err(err) => {
                warn!(dx, dy, %err, "undecodable event minute");
                None
            }
        });
    let extra = own_text(&sprite)
        .trim_start_matches('+')
        .trim()
        .parse()
        .ok();
    (minute, extra)
}

#[derive(Debug, Default)]
struct Lineups {
    home_starting: Vec<NamedLink>,
    home_substitutes: Vec<NamedLink>,
    away_starting: Vec<NamedLink>,
    away_substitutes: Vec<NamedLink>,
}

/// Home is the first line-up section on the page, away the second.
fn parse_lineups(document: &Html, contract: &GameContract) -> Result<Lineups> {
    let section_selector = Selector::parse(contract.lineup_sections)?;
    let formation_selector = Selector::parse(contract.formation_container)?;
    let starting_selector = Selector::parse(contract.starting_players)?;
    let bench_selector = Selector::parse(contract.bench_rows)?;

    let sections = document
        .select(&section_selector)
        .filter(|s| s.select(&formation_selector).next().is_some())
        .collect_vec();
    let [home, away, ..] = sections.as_slice() else {
        debug!(sections = sections.len(), "line-up sections not found");
        return Ok(Lineups::default());
    };

    let starting = |section: &ElementRef| {
        section
            .select(&starting_selector)
            .filter_map(|a| {
                Some(NamedLink {
                    name: Some(first_own_text(&a)?),
                    href: Some(attr(&a, "href")?),
                })
            })
            .collect_vec()
    };
    let substitutes = |section: &ElementRef| {
        section
            .select(&bench_selector)
            .filter(|row| {
                !row.value()
                    .classes()
                    .any(|c| c == contract.bench_manager_row_class)
            })
            .filter_map(|row| {
                let link = child_elements(&row)
                    .filter(|e| e.value().name() == "td")
                    .nth(1)
                    .and_then(|td| child_named(&td, "a"))?;
                Some(NamedLink {
                    name: Some(attr(&link, "title")?),
                    href: Some(attr(&link, "href")?),
                })
            })
            .collect_vec()
    };

    Ok(Lineups {
        home_starting: starting(home),
        home_substitutes: substitutes(home),
        away_starting: starting(away),
        away_substitutes: substitutes(away),
    })
}
