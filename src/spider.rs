use crate::config::CrawlConfig;
use crate::error::Result;
use crate::linker::{self, EntrypointStrategy};
use crate::model::{Context, PageKind, PageRequest};

/// A named crawl: how entrypoints become the first requests, and which
/// parser reads the first page. Everything after the first page follows from
/// the requests each parser emits.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Spider {
    /// Confederation page → countries → competitions.
    Competitions,
    /// Competitions → clubs.
    Clubs,
    /// Competition hrefs or codes → participants → club squads.
    ClubsByUrl,
    /// Clubs → squad → player profiles.
    Players,
    /// Player profile hrefs, fetched as given.
    PlayersFromFile,
    /// Competitions → fixtures → game reports.
    Games,
    /// Game report hrefs, keeping their parent competition.
    GamesByUrl,
    /// Competitions → fixtures listing rows.
    GamesUrls,
    /// Game report hrefs → line-ups pages.
    GameLineups,
}

impl Spider {
    pub fn strategy(self) -> EntrypointStrategy {
        match self {
            Spider::Competitions | Spider::PlayersFromFile => {
                EntrypointStrategy::Direct { keep_parent: false }
            }
            Spider::GamesByUrl => EntrypointStrategy::Direct { keep_parent: true },
            Spider::Clubs | Spider::Games | Spider::GamesUrls => EntrypointStrategy::Seasoned,
            Spider::ClubsByUrl => EntrypointStrategy::Participants,
            Spider::Players => EntrypointStrategy::PlayersOfClub,
            Spider::GameLineups => EntrypointStrategy::Lineups,
        }
    }

    /// The parser that reads each entrypoint's page.
    pub fn first_kind(self) -> PageKind {
        match self {
            Spider::Competitions => PageKind::Confederation,
            Spider::Clubs => PageKind::CompetitionClubs,
            Spider::ClubsByUrl => PageKind::Participants,
            Spider::Players => PageKind::ClubPlayers,
            Spider::PlayersFromFile => PageKind::PlayerProfile,
            Spider::Games => PageKind::CompetitionGames,
            Spider::GamesByUrl => PageKind::Game,
            Spider::GamesUrls => PageKind::CompetitionGameUrls,
            Spider::GameLineups => PageKind::GameLineups,
        }
    }

    /// The first requests of a crawl over `entries`.
    pub fn entry_requests(self, entries: Vec<Context>, config: &CrawlConfig) -> Result<Vec<PageRequest>> {
        linker::entry_requests(self.strategy(), self.first_kind(), entries, config)
    }
}
