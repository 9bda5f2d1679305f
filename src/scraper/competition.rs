use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::config::CrawlConfig;
use crate::error::Result;
use crate::linker::{self, SeenHrefs};
use crate::model::{Competition, Context, PageKind, PageRequest, RecordKind};
use crate::scraper::contract::{
    CompetitionContract, ConfederationContract, NationalCompetitionsContract, ParticipantsContract,
};
use crate::scraper::fields::{extract_slug, last_path_segment, non_empty, underscore_label};
use crate::scraper::{attr, child_elements, child_named, first_own_text, full_text, select_attr};

static FLAG_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\.png").expect("valid regex"));
static CLUB_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*/startseite/verein/\d+").expect("valid regex"));

/// Parse a confederation's competitions table into one request per country.
///
/// Each request's base carries the country's table figures so that the
/// competitions found on the country page inherit them.
pub(crate) fn parse_confederation(
    document: &Html,
    base: &Context,
    config: &CrawlConfig,
    contract: &ConfederationContract,
) -> Result<Vec<PageRequest>> {
    let row_selector = Selector::parse(contract.rows)?;
    let flag_selector = Selector::parse(contract.flag_image)?;
    let country_link_selector = Selector::parse(contract.country_link)?;
    let link_selector = Selector::parse(contract.link)?;

    let mut requests = Vec::new();
    for row in document.select(&row_selector) {
        let cells = child_elements(&row)
            .filter(|e| e.value().name() == contract.cell)
            .collect_vec();
        if cells.len() < 2 {
            continue;
        }

        let flag = cells[1].select(&flag_selector).next();
        let Some(country_id) = flag
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| FLAG_ID_RE.captures(src))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
        else {
            continue;
        };
        let country_name = flag.and_then(|img| attr(&img, "title"));
        let country_code = cells[0]
            .select(&country_link_selector)
            .last()
            .and_then(|a| a.value().attr("href"))
            .and_then(last_path_segment);

        let cell_text = |index: usize| cells.get(index).and_then(|c| non_empty(full_text(c)));
        let foreigner_percentage = cells
            .get(5)
            .and_then(|c| c.select(&link_selector).next())
            .and_then(|a| non_empty(full_text(&a)));

        let href = format!("/wettbewerbe/national/wettbewerbe/{country_id}");
        let country = Context::new()
            .with_parent(base.identity())
            .with_field("country_id", country_id)
            .with_field("country_name", country_name)
            .with_field("country_code", country_code)
            .with_field("total_clubs", cell_text(2))
            .with_field("total_players", cell_text(3))
            .with_field("average_age", cell_text(4))
            .with_field("foreigner_percentage", foreigner_percentage)
            .with_field("total_value", cell_text(7));
        requests.push(linker::follow(
            config,
            &href,
            PageKind::NationalCompetitions,
            country,
        ));
    }

    debug!(count = requests.len(), "parsed confederation countries");
    Ok(requests)
}

/// Parse the domestic competitions of a country, skipping cups and super cups.
///
/// Rows come in pairs: a tier heading row followed by the row linking the
/// competition.
pub(crate) fn parse_national_competitions(
    document: &Html,
    contract: &NationalCompetitionsContract,
) -> Result<Vec<Competition>> {
    let box_selector = Selector::parse(contract.boxes)?;
    let headline_selector = Selector::parse(contract.headline)?;
    let body_selector = Selector::parse(contract.table_body)?;
    let link_cell_selector = Selector::parse(contract.link_cells)?;

    let Some(domestic) = document.select(&box_selector).find(|b| {
        b.select(&headline_selector)
            .next()
            .and_then(|h| first_own_text(&h))
            .is_some_and(|title| title == contract.domestic_title)
    }) else {
        debug!("no domestic competitions box");
        return Ok(Vec::new());
    };
    let Some(body) = domestic.select(&body_selector).next() else {
        return Ok(Vec::new());
    };

    let rows = child_elements(&body)
        .filter(|e| e.value().name() == "tr")
        .collect_vec();
    let competitions = rows
        .chunks(2)
        .filter_map(|pair| {
            let tier = child_named(&pair[0], contract.tier_cell)
                .and_then(|td| first_own_text(&td))
                .unwrap_or_default();
            if contract.excluded_tiers.contains(&tier.as_str()) {
                return None;
            }
            let href = pair
                .get(1)?
                .select(&link_cell_selector)
                .nth(1)
                .and_then(|td| child_named(&td, "a"))
                .and_then(|a| attr(&a, "href"))?;
            Some(Competition {
                kind: RecordKind::Competition,
                code: extract_slug(&href),
                competition_id: last_path_segment(&href),
                competition_type: underscore_label(&tier),
                href,
            })
        })
        .collect_vec();

    debug!(count = competitions.len(), "parsed national competitions");
    Ok(competitions)
}

/// Follow every club of a competition's club tables to the club page.
pub(crate) fn parse_competition_clubs(
    document: &Html,
    base: &Context,
    config: &CrawlConfig,
    contract: &CompetitionContract,
) -> Result<Vec<PageRequest>> {
    let table_selector = Selector::parse(contract.tables)?;
    let header_selector = Selector::parse(contract.table_headers)?;
    let row_selector = Selector::parse(contract.rows)?;
    let cell_selector = Selector::parse(contract.cells)?;
    let link_selector = Selector::parse(contract.link)?;

    let is_club_table = |table: &ElementRef| {
        table
            .select(&header_selector)
            .any(|th| full_text(&th).to_lowercase().contains(contract.club_header_word))
    };
    let club_tables = document
        .select(&table_selector)
        .filter(is_club_table)
        .collect_vec();
    info!(tables = club_tables.len(), "found club tables");

    let mut seen = SeenHrefs::new();
    let requests = club_tables
        .iter()
        .flat_map(|table| table.select(&row_selector))
        .filter_map(|row| {
            let cell = row.select(&cell_selector).nth(1)?;
            select_attr(&cell, &link_selector, "href")
        })
        .filter_map(|href| seen.first_visit(&href))
        .map(|href| {
            let club = linker::child_context(base, Some("club"), &href);
            linker::follow(config, &href, PageKind::ClubDetails, club)
        })
        .collect_vec();
    Ok(requests)
}

/// Collect the clubs of a participants (or plus) listing and request each
/// club's squad page.
///
/// Club records reached this way carry no competition lineage.
pub(crate) fn parse_participants(
    document: &Html,
    config: &CrawlConfig,
    contract: &ParticipantsContract,
) -> Result<Vec<PageRequest>> {
    let table_link_selector = Selector::parse(contract.table_links)?;
    let tooltip_selector = Selector::parse(contract.tooltip_links)?;
    let grid_key_selector = Selector::parse(contract.grid_keys)?;

    let mut club_links = document
        .select(&table_link_selector)
        .filter_map(|a| attr(&a, "href"))
        .collect_vec();
    if club_links.is_empty() {
        club_links = document
            .select(&tooltip_selector)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| CLUB_START_RE.find(href).map(|m| m.as_str().to_string()))
            .collect();
    }
    if club_links.is_empty() {
        club_links = document
            .select(&grid_key_selector)
            .filter_map(|span| non_empty(full_text(&span)))
            .map(|id| format!("/{}/startseite/verein/{id}", contract.placeholder_slug))
            .collect();
    }
    if club_links.is_empty() {
        warn!("no club links found on participants page");
    }

    let mut seen = SeenHrefs::new();
    let mut requests = Vec::new();
    for href in club_links {
        let Some(href) = seen.first_visit(&href) else {
            continue;
        };
        let Some(squad) = linker::squad_path(&href) else {
            warn!(%href, "skipping club without id");
            continue;
        };
        debug!(%href, %squad, "club request prepared");
        let club = Context::new().with_kind("club").with_href(href);
        requests.push(linker::follow(config, &squad, PageKind::ClubDetails, club).strip_lineage());
    }
    Ok(requests)
}

/// Follow a competition's "all fixtures" footer link, if the page has one.
pub(crate) fn parse_fixtures_link(
    document: &Html,
    base: &Context,
    config: &CrawlConfig,
    next_kind: PageKind,
    contract: &CompetitionContract,
) -> Result<Option<PageRequest>> {
    let footer_selector = Selector::parse(contract.footer_links)?;

    let link = document
        .select(&footer_selector)
        .filter_map(|footer| child_named(&footer, "a"))
        .find(|a| {
            a.text()
                .map(str::trim)
                .find(|t| !t.is_empty())
                .is_some_and(|text| contract.fixtures_link_texts.contains(&text))
        })
        .and_then(|a| attr(&a, "href"));

    let Some(href) = link else {
        debug!("competition page has no fixtures link");
        return Ok(None);
    };
    let fixtures = Context::new().with_parent(base.identity());
    Ok(Some(linker::follow(config, &href, next_kind, fixtures)))
}
