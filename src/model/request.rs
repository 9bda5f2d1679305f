use super::{Context, Record};

/// Which parser a fetched page is handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PageKind {
    /// Confederation competitions table, fans out to one page per country.
    Confederation,
    /// A country's competitions page, yields competition records.
    NationalCompetitions,
    /// Competition start page, fans out to club detail pages.
    CompetitionClubs,
    /// Competition participants listing, fans out to club squad pages.
    Participants,
    /// Club start or squad page, yields a club record.
    ClubDetails,
    /// Club squad page, fans out to player profiles.
    ClubPlayers,
    /// Player profile page, yields a player record.
    PlayerProfile,
    /// Competition start page, follows the fixtures link towards game pages.
    CompetitionGames,
    /// Competition start page, follows the fixtures link towards the game listing.
    CompetitionGameUrls,
    /// Fixtures page, fans out to game pages.
    FixtureGames,
    /// Fixtures page, yields one game listing record per fixture row.
    FixtureListing,
    /// Game report page, yields a game record.
    Game,
    /// Game line-ups page, yields a line-ups record.
    GameLineups,
}

/// Whether an emitted record keeps the `parent` it inherited from its base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lineage {
    #[default]
    Keep,
    Strip,
}

/// A follow-up page to fetch, with the context its parser will receive.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub url: String,
    pub kind: PageKind,
    pub base: Context,
    pub lineage: Lineage,
}

impl PageRequest {
    pub fn new(url: String, kind: PageKind, base: Context) -> Self {
        Self {
            url,
            kind,
            base,
            lineage: Lineage::Keep,
        }
    }

    pub fn strip_lineage(mut self) -> Self {
        self.lineage = Lineage::Strip;
        self
    }
}

/// Everything a page parse can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Record(Record),
    Request(PageRequest),
}

impl Output {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Output::Record(record) => Some(record),
            Output::Request(_) => None,
        }
    }

    pub fn as_request(&self) -> Option<&PageRequest> {
        match self {
            Output::Request(request) => Some(request),
            Output::Record(_) => None,
        }
    }
}
