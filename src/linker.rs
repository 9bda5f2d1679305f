//! Links pages into a crawl graph: derives the context each follow-up parser
//! receives and the URL it is fetched from.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::{CompetitionKind, CrawlConfig};
use crate::error::{Result, TfmktError};
use crate::model::{Context, PageKind, PageRequest};
use crate::scraper::fields::{extract_numeric_id, extract_slug, normalize_href};

static SEASON_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/saison_id/\d+").expect("valid regex"));

/// How a competition entrypoint of a given `competition_type` is seasonized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeasonRule {
    /// `{href}/plus/0?saison_id={season}`
    PlusListing,
    /// `wettbewerb` → `pokalwettbewerb`, then `?saison_id={season}`
    CupListing,
}

const COMPETITION_SEASON_RULES: &[(&str, SeasonRule)] = &[
    ("first_tier", SeasonRule::PlusListing),
    ("domestic_cup", SeasonRule::CupListing),
    ("domestic_super_cup", SeasonRule::CupListing),
];

/// Rewrites from a cup's start page to its participants page; first match wins.
const CUP_PARTICIPANT_ROUTES: &[(&str, &str)] = &[
    ("/startseite/", "/teilnehmer/"),
    ("/plus/", "/teilnehmer/"),
    ("/pokalwettbewerb/", "/teilnehmer/pokalwettbewerb/"),
];

/// Rewrites from a game report to its line-ups page.
const LINEUP_ROUTES: &[(&str, &str)] = &[("/index/", "/aufstellung/")];

/// How entrypoint hrefs are turned into the first request of a crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrypointStrategy {
    /// Append the configured season according to the entrypoint's type.
    Seasoned,
    /// Club squad pages, re-seasoned to the configured season.
    PlayersOfClub,
    /// Competition participants (cups) or plus listing (leagues).
    Participants,
    /// Game reports rerouted to their line-ups page.
    Lineups,
    /// The href as given. `keep_parent` preserves the entrypoint's own parent.
    Direct { keep_parent: bool },
}

impl EntrypointStrategy {
    /// Absolute URL of the first request for `entry`.
    pub fn entry_url(self, entry: &Context, config: &CrawlConfig) -> String {
        let href = normalize_href(entry.href.as_deref().unwrap_or_default());
        match self {
            EntrypointStrategy::Seasoned => seasonize(entry, &href, config),
            EntrypointStrategy::PlayersOfClub => {
                let cleaned = SEASON_SEGMENT_RE.replace_all(&href, "");
                config.absolute(&format!("{cleaned}/saison_id/{}", config.season))
            }
            EntrypointStrategy::Participants => config.absolute(&participants_path(&href, config)),
            EntrypointStrategy::Lineups => config.absolute(&lineups_path(&href)),
            EntrypointStrategy::Direct { .. } => config.absolute(&href),
        }
    }

    /// The base context the first parser of a crawl receives for `entry`.
    pub fn entry_base(self, mut entry: Context, url: &str) -> Context {
        match self {
            EntrypointStrategy::Lineups => {
                let href = entry.href.as_deref().map(lineups_path);
                entry.parent = None;
                Context {
                    href,
                    parent: Some(entry.identity()),
                    ..Context::default()
                }
            }
            EntrypointStrategy::Direct { keep_parent: true } => Context {
                href: entry.href,
                parent: entry.parent,
                ..Context::default()
            },
            EntrypointStrategy::PlayersOfClub => {
                entry.parent = None;
                entry.href = entry
                    .href
                    .map(|href| SEASON_SEGMENT_RE.replace_all(&href, "").into_owned());
                entry.with_field("seasoned_href", url)
            }
            _ => {
                entry.parent = None;
                entry.with_field("seasoned_href", url)
            }
        }
    }
}

fn seasonize(entry: &Context, href: &str, config: &CrawlConfig) -> String {
    let season = config.season;
    match entry.kind.as_deref() {
        Some("club") => config.absolute(&format!("{href}/saison_id/{season}")),
        Some("competition") => {
            let rule = entry.field_str("competition_type").and_then(|kind| {
                COMPETITION_SEASON_RULES
                    .iter()
                    .find(|(name, _)| *name == kind)
                    .map(|(_, rule)| *rule)
            });
            match rule {
                Some(SeasonRule::PlusListing) => {
                    config.absolute(&format!("{href}/plus/0?saison_id={season}"))
                }
                Some(SeasonRule::CupListing) => {
                    let cup = href.replacen("/wettbewerb/", "/pokalwettbewerb/", 1);
                    config.absolute(&format!("{cup}?saison_id={season}"))
                }
                None => config.absolute(&format!("{href}?saison_id={season}")),
            }
        }
        _ => config.absolute(href),
    }
}

/// Site-relative path of a competition's participants (cup) or plus (league) listing.
pub fn participants_path(href: &str, config: &CrawlConfig) -> String {
    let mut path = normalize_href(href);
    let is_cup = config.competition_kind == CompetitionKind::Cup || path.contains("/pokalwettbewerb/");

    if !is_cup {
        if !path.contains("/plus/") && !path.ends_with("/plus") {
            path = format!("{path}/plus/");
        }
        return path;
    }

    if !path.contains("/teilnehmer/") {
        if let Some((from, to)) = CUP_PARTICIPANT_ROUTES
            .iter()
            .find(|(from, _)| path.contains(from))
        {
            path = path.replacen(from, to, 1);
        }
    }
    if let Some(season) = config.participants_season {
        let without = SEASON_SEGMENT_RE.replace_all(&path, "");
        path = format!("{}/saison_id/{season}", without.trim_end_matches('/'));
    }
    path
}

/// Site-relative path of a game's line-ups page.
pub fn lineups_path(href: &str) -> String {
    let path = normalize_href(href);
    LINEUP_ROUTES
        .iter()
        .find(|(from, _)| path.contains(from))
        .map(|(from, to)| path.replacen(from, to, 1))
        .unwrap_or(path)
}

/// Squad page of a club, slugged when the club href carries a slug.
///
/// Both forms resolve to the same club; `None` when the href has no club id.
pub fn squad_path(club_href: &str) -> Option<String> {
    let club_id = extract_numeric_id(club_href, "verein")?;
    Some(match extract_slug(club_href) {
        Some(slug) => format!("/{slug}/kader/verein/{club_id}/plus/1"),
        None => format!("/kader/verein/{club_id}/plus/1"),
    })
}

/// Competition hrefs for bare competition codes such as `CL` or `GB1`.
pub fn hrefs_from_codes<S: AsRef<str>>(codes: &[S], kind: CompetitionKind) -> Vec<String> {
    codes
        .iter()
        .map(|code| code.as_ref().trim())
        .filter(|code| !code.is_empty())
        .map(|code| format!("/startseite/{}/{code}", kind.path_segment()))
        .collect()
}

/// Turn entrypoints into the first requests of a crawl.
///
/// An empty entrypoint list is a configuration error.
pub fn entry_requests(
    strategy: EntrypointStrategy,
    kind: PageKind,
    entries: Vec<Context>,
    config: &CrawlConfig,
) -> Result<Vec<PageRequest>> {
    if entries.is_empty() {
        return Err(TfmktError::NoEntrypoints);
    }
    let requests = entries
        .into_iter()
        .filter(|entry| entry.href.is_some())
        .map(|entry| {
            let url = strategy.entry_url(&entry, config);
            debug!(%url, %kind, "entrypoint request prepared");
            let base = strategy.entry_base(entry, &url);
            PageRequest::new(url, kind, base)
        })
        .collect();
    Ok(requests)
}

/// Entrypoints for plain competition hrefs, as used by participants crawls.
pub fn competition_entries<S: AsRef<str>>(hrefs: &[S]) -> Vec<Context> {
    hrefs
        .iter()
        .map(|href| normalize_href(href.as_ref()))
        .filter(|href| !href.is_empty())
        .map(|href| Context::new().with_kind("competition").with_href(href))
        .collect()
}

/// Context for a page one level below `base`: `base` becomes the parent.
pub fn child_context(base: &Context, kind: Option<&str>, href: &str) -> Context {
    Context {
        kind: kind.map(str::to_string),
        href: Some(href.to_string()),
        parent: Some(base.identity()),
        ..Context::default()
    }
}

/// Context for a page at the same level as `base`, sharing its parent.
pub fn sibling_context(base: &Context, href: &str) -> Context {
    Context {
        href: Some(href.to_string()),
        parent: base.parent.clone(),
        ..Context::default()
    }
}

/// Build a follow-up request for a site-relative or absolute href.
pub fn follow(config: &CrawlConfig, href: &str, kind: PageKind, base: Context) -> PageRequest {
    let url = if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        config.absolute(href)
    };
    PageRequest::new(url, kind, base)
}

/// Per-page set of already-followed hrefs, keyed by normalized href.
#[derive(Debug, Default)]
pub struct SeenHrefs(HashSet<String>);

impl SeenHrefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `href`; returns the normalized href the first time it is seen.
    pub fn first_visit(&mut self, href: &str) -> Option<String> {
        let normalized = normalize_href(href);
        if normalized.is_empty() || !self.0.insert(normalized.clone()) {
            return None;
        }
        Some(normalized)
    }
}
