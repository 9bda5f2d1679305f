use std::collections::HashSet;

use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::CrawlConfig;
use crate::error::Result;
use crate::linker::{self, SeenHrefs};
use crate::model::{ClubRef, Context, GameListing, PageKind, PageRequest, RecordKind};
use crate::scraper::contract::FixturesContract;
use crate::scraper::fields::{extract_iso_date, last_path_segment, non_empty, normalize_href};
use crate::scraper::{attr, first_own_text, full_text};

/// Follow every game report linked from a fixtures page.
///
/// Games share the fixtures page's parent, so each game record points back
/// at the competition.
pub(crate) fn parse_game_links(
    document: &Html,
    base: &Context,
    config: &CrawlConfig,
    contract: &FixturesContract,
) -> Result<Vec<PageRequest>> {
    let link_selector = Selector::parse(contract.game_links)?;

    let mut seen = SeenHrefs::new();
    let requests = document
        .select(&link_selector)
        .filter_map(|a| attr(&a, "href"))
        .filter_map(|href| seen.first_visit(&href))
        .map(|href| {
            let game = linker::sibling_context(base, &href);
            linker::follow(config, &href, PageKind::Game, game)
        })
        .collect_vec();

    debug!(count = requests.len(), "parsed fixture game links");
    Ok(requests)
}

/// Read every played or scheduled game off a fixtures page without visiting
/// the game reports.
pub(crate) fn parse_game_listing(
    document: &Html,
    config: &CrawlConfig,
    contract: &FixturesContract,
) -> Result<Vec<GameListing>> {
    let row_selector = Selector::parse(contract.rows)?;
    let game_link_selector = Selector::parse(contract.game_links)?;
    let date_selector = Selector::parse(contract.date_link)?;
    let kickoff_selector = Selector::parse(contract.kickoff)?;
    let home_selector = Selector::parse(contract.home_link)?;
    let away_selector = Selector::parse(contract.away_link)?;

    let mut seen = HashSet::new();
    let mut listings = Vec::new();
    for row in document.select(&row_selector) {
        let Some(game_link) = row.select(&game_link_selector).next() else {
            continue;
        };
        let Some(href) = attr(&game_link, "href").map(|h| normalize_href(&h)) else {
            continue;
        };
        let Some(game_id) = last_path_segment(&href).and_then(|id| id.parse::<u64>().ok()) else {
            continue;
        };
        if !seen.insert(game_id) {
            continue;
        }

        let date_link = row.select(&date_selector).next();
        let result = non_empty(full_text(&game_link))
            .filter(|r| !contract.unplayed_results.contains(&r.as_str()));

        listings.push(GameListing {
            kind: RecordKind::Game,
            seasoned_href: config.absolute(&href),
            game_id,
            date_iso: date_link
                .and_then(|a| a.value().attr("href"))
                .and_then(extract_iso_date),
            date_display: date_link.and_then(|a| non_empty(full_text(&a))),
            kickoff_time: row
                .select(&kickoff_selector)
                .next()
                .and_then(|td| first_own_text(&td)),
            home_club: row.select(&home_selector).next().and_then(named_club),
            away_club: row.select(&away_selector).next().and_then(named_club),
            result,
            href,
        });
    }

    debug!(count = listings.len(), "parsed game listing");
    Ok(listings)
}

fn named_club(link: ElementRef) -> Option<ClubRef> {
    Some(ClubRef::named(attr(&link, "title")?, attr(&link, "href")?))
}
