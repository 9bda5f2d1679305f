pub mod club;
pub mod competition;
pub mod contract;
pub mod fields;
pub mod fixtures;
pub mod game;
pub mod lineups;
pub mod player;

pub use ::scraper::Html;
use ::scraper::{ElementRef, Selector};
use serde::Serialize;
use tracing::{debug, trace};

use crate::assembler::assemble;
use crate::config::CrawlConfig;
use crate::error::{Result, TfmktError};
use crate::model::{Context, Lineage, Output, PageKind, PageRequest};
use contract::PageContracts;
use fields::{non_empty, normalize_space};

/// Fetch a URL and parse the response body as an HTML document.
pub(crate) async fn get_document(
    client: &reqwest::Client,
    url: &str,
    user_agent: &str,
) -> Result<Html> {
    debug!(url, "fetching page");

    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, user_agent)
        .send()
        .await
        .map_err(|e| TfmktError::Http {
            url: url.to_owned(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(TfmktError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    let body = response.text().await.map_err(|e| TfmktError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })?;

    Ok(Html::parse_document(&body))
}

/// Parse a fetched page with the parser its request names.
///
/// Records come back assembled against the request's base; follow-up requests
/// carry the context their own parser will receive.
pub fn parse_page(
    document: &Html,
    request: &PageRequest,
    config: &CrawlConfig,
    contracts: &PageContracts,
) -> Result<Vec<Output>> {
    let base = &request.base;
    let lineage = request.lineage;

    trace!(kind = %request.kind, url = %request.url, "parsing page");
    let outputs = match request.kind {
        PageKind::Confederation => follow(competition::parse_confederation(
            document,
            base,
            config,
            &contracts.confederation,
        )?),
        PageKind::NationalCompetitions => {
            competition::parse_national_competitions(document, &contracts.national_competitions)?
                .iter()
                .map(|competition| emit(base, competition, lineage))
                .collect::<Result<_>>()?
        }
        PageKind::CompetitionClubs => follow(competition::parse_competition_clubs(
            document,
            base,
            config,
            &contracts.competition,
        )?),
        PageKind::Participants => follow(competition::parse_participants(
            document,
            config,
            &contracts.participants,
        )?),
        PageKind::CompetitionGames => follow(competition::parse_fixtures_link(
            document,
            base,
            config,
            PageKind::FixtureGames,
            &contracts.competition,
        )?),
        PageKind::CompetitionGameUrls => follow(competition::parse_fixtures_link(
            document,
            base,
            config,
            PageKind::FixtureListing,
            &contracts.competition,
        )?),
        PageKind::FixtureGames => follow(fixtures::parse_game_links(
            document,
            base,
            config,
            &contracts.fixtures,
        )?),
        PageKind::FixtureListing => {
            fixtures::parse_game_listing(document, config, &contracts.fixtures)?
                .iter()
                .map(|listing| emit(base, listing, lineage))
                .collect::<Result<_>>()?
        }
        PageKind::ClubDetails => vec![emit(
            base,
            &club::parse_club(document, base, &contracts.club)?,
            lineage,
        )?],
        PageKind::ClubPlayers => follow(player::parse_squad_player_links(
            document,
            base,
            config,
            &contracts.club,
        )?),
        PageKind::PlayerProfile => vec![emit(
            base,
            &player::parse_player(document, base, &contracts.player)?,
            lineage,
        )?],
        PageKind::Game => vec![emit(
            base,
            &game::parse_game(document, base, &contracts.game)?,
            lineage,
        )?],
        PageKind::GameLineups => vec![emit(
            base,
            &lineups::parse_game_lineups(document, base, &contracts.lineups)?,
            lineage,
        )?],
    };
    Ok(outputs)
}

fn emit<T: Serialize>(base: &Context, entity: &T, lineage: Lineage) -> Result<Output> {
    Ok(Output::Record(assemble(base, entity, lineage)?))
}

fn follow(requests: impl IntoIterator<Item = PageRequest>) -> Vec<Output> {
    requests.into_iter().map(Output::Request).collect()
}

/// Extract trimmed text content from the first element matching `selector`
/// inside `element`. Returns an empty string if nothing matches.
pub(crate) fn select_text(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .and_then(|d| d.text().map(|t| t.trim()).find(|t| !t.is_empty()))
        .unwrap_or_default()
        .trim()
        .replace(['\n', '\t'], "")
        .to_string()
}

/// Like [`select_text`], but `None` when the selector misses or the text is empty.
pub(crate) fn select_text_opt(element: &ElementRef, selector: &Selector) -> Option<String> {
    non_empty(select_text(element, selector))
}

/// All text below `element`, whitespace-normalized.
pub(crate) fn full_text(element: &ElementRef) -> String {
    normalize_space(&element.text().collect::<String>())
}

/// Text nodes that are direct children of `element`, whitespace-normalized.
pub(crate) fn own_text(element: &ElementRef) -> String {
    let text = element
        .children()
        .filter_map(|node| node.value().as_text().map(|t| t.to_string()))
        .collect::<Vec<_>>()
        .join(" ");
    normalize_space(&text)
}

/// The first non-empty direct text node of `element`.
pub(crate) fn first_own_text(element: &ElementRef) -> Option<String> {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .find_map(|t| non_empty(&**t))
}

/// Element children of `element`, in document order.
pub(crate) fn child_elements<'a>(element: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// The first child element with tag `name`.
pub(crate) fn child_named<'a>(element: &ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    child_elements(element).find(|e| e.value().name() == name)
}

/// The first child element carrying `class`.
pub(crate) fn child_with_class<'a>(element: &ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    child_elements(element).find(|e| e.value().classes().any(|c| c == class))
}

/// A trimmed, non-empty attribute value.
pub(crate) fn attr(element: &ElementRef, name: &str) -> Option<String> {
    element.value().attr(name).and_then(non_empty)
}

/// An attribute of the first element matching `selector`.
pub(crate) fn select_attr(element: &ElementRef, selector: &Selector, name: &str) -> Option<String> {
    element.select(selector).next().and_then(|e| attr(&e, name))
}
