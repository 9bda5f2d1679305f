use ::scraper::error::SelectorErrorKind;
use std::num::ParseIntError;

/// All errors that can occur while fetching or extracting transfermarkt pages.
#[derive(thiserror::Error, Debug)]
pub enum TfmktError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// A page contract selector could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// Failed to parse an integer from scraped text.
    #[error("failed to parse integer: {0}")]
    IntParse(#[from] ParseIntError),

    /// Failed to parse a date from scraped text.
    #[error("failed to parse date: {0}")]
    DateParse(#[from] chrono::ParseError),

    /// Failed to build or encode a JSON record.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to write records to the output sink.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A minute sprite offset does not land on the sprite sheet grid.
    #[error("background position ({dx}px, {dy}px) is not on the minute sprite grid")]
    SpriteOffset { dx: i32, dy: i32 },

    /// The base context handed to a parser lacks a required identity field.
    #[error("base context is missing `{field}`")]
    MissingContext { field: &'static str },

    /// No entrypoints were supplied to a crawl.
    #[error("no entrypoints supplied, provide parents, codes or hrefs")]
    NoEntrypoints,
}

impl<'a> From<SelectorErrorKind<'a>> for TfmktError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        TfmktError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TfmktError>;
