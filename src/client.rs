use std::collections::VecDeque;

use tracing::{info, instrument, warn};

use crate::config::CrawlConfig;
use crate::error::Result;
use crate::linker;
use crate::model::*;
use crate::scraper::contract::PageContracts;
use crate::scraper::fields::normalize_href;
use crate::scraper::{self, Html};
use crate::spider::Spider;

/// The main entry point for fetching transfermarkt pages.
///
/// `TfmktClient` wraps a [`reqwest::Client`] together with the crawl
/// configuration and the page contracts the parsers select with. It exposes
/// one-call helpers for single pages and a sequential crawl driver for whole
/// spiders.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> tfmkt_scraper::Result<()> {
/// use tfmkt_scraper::{Context, Spider, TfmktClient};
///
/// let client = TfmktClient::new();
/// let game = client
///     .get_game("/spielbericht/index/spielbericht/4625774")
///     .await?;
/// println!("{:?} {:?}", game.result, game.halftime_score);
///
/// let entry = Context::new()
///     .with_kind("club")
///     .with_href("/fc-chelsea/startseite/verein/631");
/// let mut stdout = std::io::stdout();
/// client
///     .crawl(Spider::Players, vec![entry], |record| {
///         tfmkt_scraper::write_json_lines(&mut stdout, [&record])
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct TfmktClient {
    http: reqwest::Client,
    config: CrawlConfig,
    contracts: PageContracts,
}

impl TfmktClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            http: client,
            config: CrawlConfig::default(),
            contracts: PageContracts::default(),
        }
    }

    pub fn with_config(mut self, config: CrawlConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the page contracts, e.g. after the site changed its markup.
    pub fn with_contracts(mut self, contracts: PageContracts) -> Self {
        self.contracts = contracts;
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Fetch one requested page and parse it with the parser the request names.
    #[instrument(skip(self, request), fields(url = %request.url, kind = %request.kind))]
    pub async fn get_page(&self, request: &PageRequest) -> Result<Vec<Output>> {
        let document = self.fetch(&request.url).await?;
        scraper::parse_page(&document, request, &self.config, &self.contracts)
    }

    /// Fetch a game report by its href.
    #[instrument(skip(self))]
    pub async fn get_game(&self, href: &str) -> Result<Game> {
        let href = normalize_href(href);
        let document = self.fetch(&self.config.absolute(&href)).await?;
        scraper::game::parse_game(&document, &Context::new().with_href(href), &self.contracts.game)
    }

    /// Fetch the line-ups page of the game report at `game_href`.
    #[instrument(skip(self))]
    pub async fn get_game_lineups(&self, game_href: &str) -> Result<GameLineups> {
        let href = linker::lineups_path(&normalize_href(game_href));
        let document = self.fetch(&self.config.absolute(&href)).await?;
        scraper::lineups::parse_game_lineups(
            &document,
            &Context::new().with_href(href),
            &self.contracts.lineups,
        )
    }

    /// Fetch a club's start or squad page.
    #[instrument(skip(self))]
    pub async fn get_club(&self, href: &str) -> Result<Club> {
        let href = normalize_href(href);
        let document = self.fetch(&self.config.absolute(&href)).await?;
        let base = Context::new().with_kind("club").with_href(href);
        scraper::club::parse_club(&document, &base, &self.contracts.club)
    }

    /// Fetch a player profile.
    #[instrument(skip(self))]
    pub async fn get_player(&self, href: &str) -> Result<Player> {
        let href = normalize_href(href);
        let document = self.fetch(&self.config.absolute(&href)).await?;
        let base = Context::new().with_kind("player").with_href(href);
        scraper::player::parse_player(&document, &base, &self.contracts.player)
    }

    /// Fetch a competition fixtures page and list its games.
    #[instrument(skip(self))]
    pub async fn get_game_listing(&self, fixtures_href: &str) -> Result<Vec<GameListing>> {
        let document = self.fetch(&self.config.absolute(&normalize_href(fixtures_href))).await?;
        scraper::fixtures::parse_game_listing(&document, &self.config, &self.contracts.fixtures)
    }

    /// Run `spider` over `entries`, handing every record to `sink`.
    ///
    /// Pages are fetched one at a time, breadth first. A page that fails to
    /// fetch or parse is logged and skipped; only an empty entrypoint list or a
    /// sink error aborts the crawl. Returns the number of records emitted.
    #[instrument(skip(self, entries, sink), fields(entries = entries.len()))]
    pub async fn crawl<F>(&self, spider: Spider, entries: Vec<Context>, mut sink: F) -> Result<usize>
    where
        F: FnMut(Record) -> Result<()>,
    {
        let mut queue: VecDeque<PageRequest> = spider.entry_requests(entries, &self.config)?.into();
        let mut records = 0;
        let mut failed = 0;

        while let Some(request) = queue.pop_front() {
            let outputs = match self.get_page(&request).await {
                Ok(outputs) => outputs,
                Err(err) => {
                    failed += 1;
                    warn!(url = %request.url, kind = %request.kind, error = %err, "skipping page");
                    continue;
                }
            };
            for output in outputs {
                match output {
                    Output::Record(record) => {
                        sink(record)?;
                        records += 1;
                    }
                    Output::Request(next) => queue.push_back(next),
                }
            }
        }

        info!(%spider, records, failed, "crawl finished");
        Ok(records)
    }

    async fn fetch(&self, url: &str) -> Result<Html> {
        scraper::get_document(&self.http, url, &self.config.user_agent).await
    }
}

impl Default for TfmktClient {
    fn default() -> Self {
        Self::new()
    }
}
