use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::CrawlConfig;
use crate::error::{Result, TfmktError};
use crate::linker::{self, SeenHrefs};
use crate::model::{
    Context, HrefLink, NamedLink, PageKind, PageRequest, PlaceOfBirth, Player, PlayerStatus,
    RecordKind,
};
use crate::scraper::contract::{ClubContract, PlayerContract};
use crate::scraper::fields::{extract_code, market_value_to_number, non_empty};
use crate::scraper::{attr, child_named, first_own_text, full_text, own_text, select_attr};

static META_MARKET_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Market value: (€[\d.]+(?:bn|k|m)?)").expect("valid regex"));
static VALUE_HISTORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'data':.*\}\}\]").expect("valid regex"));

/// Follow every player of a club's squad table to the player's profile.
pub(crate) fn parse_squad_player_links(
    document: &Html,
    base: &Context,
    config: &CrawlConfig,
    contract: &ClubContract,
) -> Result<Vec<PageRequest>> {
    let link_selector = Selector::parse(contract.squad_player_links)?;

    let mut seen = SeenHrefs::new();
    let requests = document
        .select(&link_selector)
        .filter_map(|a| attr(&a, "href"))
        .filter_map(|href| seen.first_visit(&href))
        .map(|href| {
            let player = linker::child_context(base, Some("player"), &href);
            linker::follow(config, &href, PageKind::PlayerProfile, player)
        })
        .collect_vec();

    if requests.is_empty() {
        warn!(href = ?base.href, "no player links on squad page");
    }
    debug!(count = requests.len(), "parsed squad player links");
    Ok(requests)
}

/// Parse a player profile page.
pub(crate) fn parse_player(document: &Html, base: &Context, contract: &PlayerContract) -> Result<Player> {
    let root = document.root_element();
    let href = base
        .href
        .clone()
        .ok_or(TfmktError::MissingContext { field: "href" })?;

    let label_selector = Selector::parse(contract.labels)?;
    let labels = ProfileLabels {
        spans: root.select(&label_selector).collect(),
    };

    let headline_selector = Selector::parse(contract.headline)?;
    let headline = root.select(&headline_selector).next();
    let name = headline.and_then(|h1| non_empty(own_text(&h1)));
    let last_name = headline
        .and_then(|h1| child_named(&h1, "strong"))
        .and_then(|strong| non_empty(full_text(&strong)));
    let number = headline
        .and_then(|h1| child_named(&h1, "span"))
        .and_then(|span| non_empty(full_text(&span)));

    let birth_selector = Selector::parse(contract.birth_date)?;
    let birth = root
        .select(&birth_selector)
        .next()
        .and_then(|span| non_empty(full_text(&span)));
    let date_of_birth = birth.as_deref().and_then(strip_age);
    let age = birth.as_deref().and_then(bracketed);

    let place = labels.value(contract.place_of_birth_label);
    let img_selector = Selector::parse("span img")?;
    let place_of_birth = PlaceOfBirth {
        country: place.and_then(|span| select_attr(&span, &img_selector, "title")),
        city: place
            .and_then(|span| child_named(&span, "span"))
            .and_then(|span| first_own_text(&span)),
    };

    let citizenship = labels
        .value(contract.citizenship_label)
        .and_then(|span| child_named(&span, "img"))
        .and_then(|img| attr(&img, "title"));

    let agent_title_selector = Selector::parse(contract.agent_title)?;
    let player_agent = labels
        .value(contract.agent_label)
        .map(|span| agent(span, &agent_title_selector))
        .unwrap_or(NamedLink {
            name: None,
            href: None,
        });

    let image_selector = Selector::parse(contract.image)?;
    let image_url = select_attr(&root, &image_selector, "src");

    let date_of_death = contract
        .death_labels
        .iter()
        .find_map(|label| labels.text(label))
        .map(|text| strip_age(&text).unwrap_or(text));
    let club_span = labels.value(contract.current_club_label);
    let status = classify_status(date_of_death.is_some(), club_span, contract, &href);
    let current_club = match status {
        PlayerStatus::Active => Some(HrefLink::new(
            club_span.and_then(|span| current_club_href(span, contract)),
        )),
        PlayerStatus::Retired | PlayerStatus::Deceased => None,
    };

    let meta_selector = Selector::parse(contract.meta_description)?;
    let current_market_value = select_attr(&root, &meta_selector, "content")
        .and_then(|content| {
            META_MARKET_VALUE_RE
                .captures(&content)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })
        .and_then(|value| market_value_to_number(&value));

    let max_value_selector = Selector::parse(contract.max_value)?;
    let highest_market_value = root
        .select(&max_value_selector)
        .next()
        .and_then(|div| first_own_text(&div));

    let social_selector = Selector::parse(contract.social_links)?;
    let social_media = labels
        .value(contract.social_media_label)
        .map(|span| {
            span.select(&social_selector)
                .filter_map(|a| attr(&a, "href"))
                .collect_vec()
        })
        .unwrap_or_default();

    let script_selector = Selector::parse(contract.scripts)?;
    let market_value_history = parse_market_value_history(&root, &script_selector, &href);

    let anchor_selector = Selector::parse("a")?;
    let on_loan_from = labels
        .value(contract.on_loan_from_label)
        .and_then(|span| select_attr(&span, &anchor_selector, "href"));

    debug!(%href, ?name, %status, "parsed player profile");

    Ok(Player {
        kind: RecordKind::Player,
        code: extract_code(&href),
        name,
        last_name,
        number,
        name_in_home_country: labels.text(contract.name_in_home_country_label),
        date_of_birth,
        date_of_death,
        place_of_birth,
        age,
        height: labels.text(contract.height_label),
        citizenship,
        position: labels.text(contract.position_label),
        player_agent,
        image_url,
        status,
        current_club,
        foot: labels.text(contract.foot_label),
        joined: labels.text(contract.joined_label),
        contract_expires: labels.text(contract.contract_expires_label),
        day_of_last_contract_extension: labels.text(contract.contract_extension_label),
        outfitter: labels.text(contract.outfitter_label),
        current_market_value,
        highest_market_value,
        social_media,
        market_value_history,
        on_loan_from,
        contract_option: labels.deep_text(contract.contract_option_label),
        contract_there_expires: labels.deep_text(contract.contract_there_expires_label),
        href,
    })
}

/// The label/value span pairs of a profile's data table.
struct ProfileLabels<'a> {
    spans: Vec<ElementRef<'a>>,
}

impl<'a> ProfileLabels<'a> {
    /// The value span that follows the span labelled `label`.
    fn value(&self, label: &str) -> Option<ElementRef<'a>> {
        self.spans
            .iter()
            .find(|span| full_text(span) == label)
            .and_then(|span| {
                span.next_siblings()
                    .filter_map(ElementRef::wrap)
                    .find(|e| e.value().name() == "span")
            })
    }

    /// The value's own text.
    fn text(&self, label: &str) -> Option<String> {
        self.value(label).and_then(|span| first_own_text(&span))
    }

    /// The value's first text, at any depth.
    fn deep_text(&self, label: &str) -> Option<String> {
        self.value(label)
            .and_then(|span| span.text().find_map(non_empty))
    }
}

/// Death evidence wins over retirement evidence; a profile with neither is active.
fn classify_status(
    has_death_date: bool,
    club_span: Option<ElementRef>,
    contract: &PlayerContract,
    href: &str,
) -> PlayerStatus {
    if has_death_date {
        return PlayerStatus::Deceased;
    }
    let Some(span) = club_span else {
        debug!(href, "no current club on profile, assuming active");
        return PlayerStatus::Active;
    };

    if has_deceased_placeholder(span, contract) {
        warn!(href, "player classified deceased from current club placeholder");
        return PlayerStatus::Deceased;
    }

    let retired_link = span.descendants().filter_map(ElementRef::wrap).any(|e| {
        e.value().name() == "a"
            && e.value()
                .attr("href")
                .is_some_and(|h| h.contains(contract.retired_path))
    });
    if retired_link || full_text(&span).to_lowercase().contains(contract.retired_word) {
        return PlayerStatus::Retired;
    }
    PlayerStatus::Active
}

/// A sentinel club icon, title, text or slug standing in for the current club.
fn has_deceased_placeholder(span: ElementRef, contract: &PlayerContract) -> bool {
    let placeholder = contract.deceased_placeholder;
    let elements = span.descendants().filter_map(ElementRef::wrap).collect_vec();

    let icon_alt = elements
        .iter()
        .find(|e| e.value().name() == "img")
        .and_then(|img| img.value().attr("alt"));
    if icon_alt.map(str::trim) == Some(placeholder) {
        return true;
    }

    elements
        .iter()
        .filter(|e| e.value().name() == "a")
        .any(|a| {
            a.value().attr("title") == Some(placeholder)
                || full_text(a) == placeholder
                || a
                    .value()
                    .attr("href")
                    .is_some_and(|h| h.contains(contract.deceased_club_path))
        })
}

/// The first titled club link that is not the retired pseudo-club.
fn current_club_href(span: ElementRef, contract: &PlayerContract) -> Option<String> {
    span.descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "a" && e.value().attr("title").is_some())
        .filter_map(|a| attr(&a, "href"))
        .find(|h| !h.contains(contract.retired_path))
}

/// Agent name from the `span.cp` title, the link text, or a bare span.
fn agent(span: ElementRef, title_selector: &Selector) -> NamedLink {
    let link = child_named(&span, "a");
    let name = link
        .and_then(|a| a.select(title_selector).next())
        .and_then(|cp| attr(&cp, "title"))
        .or_else(|| link.and_then(|a| first_own_text(&a)))
        .or_else(|| child_named(&span, "span").and_then(|s| first_own_text(&s)));
    NamedLink {
        name,
        href: link.and_then(|a| attr(&a, "href")),
    }
}

/// The chart series embedded in the market value script, if it decodes.
fn parse_market_value_history(root: &ElementRef, scripts: &Selector, href: &str) -> Option<Value> {
    let script = root
        .select(scripts)
        .map(|s| s.text().collect::<String>())
        .find(|text| text.contains("series"))?;
    let decoded = VALUE_HISTORY_RE
        .find(&script)
        .map(|m| format!("{{{}}}", m.as_str().replace('\'', "\"")))
        .and_then(|json| serde_json::from_str::<Value>(&json).ok())
        .and_then(|mut value| value.get_mut("data").map(Value::take));
    if decoded.is_none() {
        warn!(href, "failed to decode market value history");
    }
    decoded
}

/// `Dec 19, 1991 (32)` → `Dec 19, 1991`.
fn strip_age(text: &str) -> Option<String> {
    non_empty(text.split(" (").next().unwrap_or_default())
}

/// `Dec 19, 1991 (32)` → `32`.
fn bracketed(text: &str) -> Option<String> {
    let (_, rest) = text.rsplit_once('(')?;
    non_empty(rest.split(')').next().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn profile(current_club: &str, extra: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><head><meta name="description" content="Steven Berghuis, 32, from Netherlands ➤ Ajax, since 2022 ➤ Attacking Midfield ➤ Market value: €4.00m ➤ * Dec 19, 1991 in Apeldoorn, Netherlands"></head>
            <body>
            <h1 class="data-header__headline-wrapper"><span class="data-header__shirt-number">#23</span> Steven <strong>Berghuis</strong></h1>
            <img class="data-header__profile-image" src="https://img.a.transfermarkt.technology/portrait/header/129554.jpg">
            <div class="info-table">
              <span>Date of birth/Age:</span><span itemprop="birthDate"> Dec 19, 1991 (32) </span>
              <span>Place of birth:</span><span><span>Apeldoorn <img title="Netherlands"></span></span>
              <span>Height:</span><span>1,82 m</span>
              <span>Citizenship:</span><span><img title="Netherlands"> Netherlands</span>
              <span>Position:</span><span> Attack - Right Winger </span>
              <span>Foot:</span><span>left</span>
              <span>Player agent:</span><span><a href="/sports-entertainment/beraterfirma/berater/1"><span class="cp" title="Sports Entertainment Group">Sports Ent...</span></a></span>
              <span>Current club:</span><span>{current_club}</span>
              <span>Joined:</span><span>Aug 5, 2021</span>
              <span>Contract expires:</span><span>Jun 30, 2025</span>
              <span>Contract option:</span><span><b>Club option 1 year</b></span>
              <span>Outfitter:</span><span>Nike</span>
              <span>Social-Media:</span><span><div class="socialmedia-icons"><a href="https://twitter.com/x">t</a><a href="https://instagram.com/x">i</a></div></span>
              {extra}
            </div>
            <div class="tm-player-market-value-development__max-value"> €18.00m </div>
            <script>var chart = {{'series':[{{'name':'x','data':[{{'y':4000000,'marker':{{'symbol':'a'}}}}]}}]}}</script>
            </body></html>"#
        ))
    }

    fn base() -> Context {
        Context::new()
            .with_kind("player")
            .with_href("/steven-berghuis/profil/spieler/129554")
    }

    fn parse(document: &Html) -> Player {
        parse_player(document, &base(), &PlayerContract::DEFAULT).unwrap()
    }

    #[test]
    fn test_parse_active_player() {
        let document = profile(r#"<a title="Ajax Amsterdam" href="/ajax-amsterdam/startseite/verein/610"><img alt="Ajax"></a>"#, "");
        let player = parse(&document);

        assert_eq!(player.code.as_deref(), Some("steven-berghuis"));
        assert_eq!(player.name.as_deref(), Some("Steven"));
        assert_eq!(player.last_name.as_deref(), Some("Berghuis"));
        assert_eq!(player.number.as_deref(), Some("#23"));
        assert_eq!(player.date_of_birth.as_deref(), Some("Dec 19, 1991"));
        assert_eq!(player.age.as_deref(), Some("32"));
        assert_eq!(player.place_of_birth.city.as_deref(), Some("Apeldoorn"));
        assert_eq!(player.place_of_birth.country.as_deref(), Some("Netherlands"));
        assert_eq!(player.height.as_deref(), Some("1,82 m"));
        assert_eq!(player.citizenship.as_deref(), Some("Netherlands"));
        assert_eq!(player.position.as_deref(), Some("Attack - Right Winger"));
        assert_eq!(
            player.player_agent.name.as_deref(),
            Some("Sports Entertainment Group")
        );
        assert_eq!(player.status, PlayerStatus::Active);
        assert_eq!(
            player.current_club,
            Some(HrefLink::new(Some("/ajax-amsterdam/startseite/verein/610".into())))
        );
        assert_eq!(player.current_market_value, Some(4_000_000.0));
        assert_eq!(player.highest_market_value.as_deref(), Some("€18.00m"));
        assert_eq!(player.contract_option.as_deref(), Some("Club option 1 year"));
        assert_eq!(player.social_media.len(), 2);
        assert_eq!(
            player.market_value_history,
            Some(json!([{"y": 4000000, "marker": {"symbol": "a"}}]))
        );
        assert!(player.date_of_death.is_none());
    }

    #[test]
    fn test_death_date_wins_over_club_link() {
        let document = profile(
            r#"<a title="Ajax Amsterdam" href="/ajax-amsterdam/startseite/verein/610">Ajax</a>"#,
            "<span>Date of death:</span><span>Jan 2, 2020 (28)</span>",
        );
        let player = parse(&document);
        assert_eq!(player.status, PlayerStatus::Deceased);
        assert_eq!(player.date_of_death.as_deref(), Some("Jan 2, 2020"));
        assert!(player.current_club.is_none());
    }

    #[test]
    fn test_placeholder_club_means_deceased() {
        for club in [
            r#"<a href="/x/startseite/verein/1"><img alt="---"></a>"#,
            r#"<a title="---" href="/x/startseite/verein/1">x</a>"#,
            r#"<a href="/-tm/startseite/verein/0">Unknown</a>"#,
        ] {
            let player = parse(&profile(club, ""));
            assert_eq!(player.status, PlayerStatus::Deceased, "{club}");
            assert!(player.current_club.is_none());
        }
    }

    #[test]
    fn test_retired_player() {
        let document = profile(
            r#"<a title="Retired" href="/retired/startseite/verein/123">Retired</a>"#,
            "",
        );
        let player = parse(&document);
        assert_eq!(player.status, PlayerStatus::Retired);
        assert!(player.current_club.is_none());
    }

    #[test]
    fn test_profile_without_current_club_is_active() {
        let document = Html::parse_document(
            r#"<div class="info-table"><span>Position:</span><span>Goalkeeper</span></div>"#,
        );
        let base = Context::new().with_href("/jos%C3%A9-s%C3%A1/profil/spieler/50000");
        let player = parse_player(&document, &base, &PlayerContract::DEFAULT).unwrap();
        assert_eq!(player.status, PlayerStatus::Active);
        assert_eq!(player.current_club, Some(HrefLink::new(None)));
        assert_eq!(player.code.as_deref(), Some("josé-sá"));
        assert_eq!(player.position.as_deref(), Some("Goalkeeper"));
    }

    #[test]
    fn test_unparseable_history_is_none() {
        let document = Html::parse_document("<script>var series = broken;</script>");
        let root = document.root_element();
        let selector = Selector::parse("script").unwrap();
        assert_eq!(parse_market_value_history(&root, &selector, "/x"), None);
    }

    #[test]
    fn test_squad_player_links() {
        let document = Html::parse_document(
            r#"<div class="responsive-table"><table class="items"><tbody><tr><td>
            <table class="inline-table"><tr><td class="hauptlink"><a href="/cole-palmer/profil/spieler/568177">Cole Palmer</a></td></tr></table>
            <table class="inline-table"><tr><td class="hauptlink"><a href="/cole-palmer/profil/spieler/568177/">Cole Palmer</a></td></tr></table>
            </td></tr></tbody></table></div>"#,
        );
        let base = Context::new()
            .with_kind("club")
            .with_href("/fc-chelsea/startseite/verein/631");
        let requests = parse_squad_player_links(
            &document,
            &base,
            &CrawlConfig::default(),
            &ClubContract::DEFAULT,
        )
        .unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].kind, PageKind::PlayerProfile);
        assert_eq!(requests[0].base.kind.as_deref(), Some("player"));
        assert_eq!(
            requests[0].base.parent,
            Some(json!({"type": "club", "href": "/fc-chelsea/startseite/verein/631"}))
        );
    }

    #[test]
    fn test_strip_age() {
        assert_eq!(strip_age("Dec 19, 1991 (32)").as_deref(), Some("Dec 19, 1991"));
        assert_eq!(bracketed("Dec 19, 1991 (32)").as_deref(), Some("32"));
        assert_eq!(bracketed("Dec 19, 1991"), None);
    }
}
