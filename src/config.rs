use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://www.transfermarkt.co.uk";

/// Settings shared by every request a crawl derives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Origin that site-relative hrefs are joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_season")]
    pub season: u16,

    /// Whether participants entrypoints are cups or leagues.
    #[serde(default)]
    pub competition_kind: CompetitionKind,

    /// Season pinned on participants listings; unpinned when `None`.
    #[serde(default)]
    pub participants_season: Option<u16>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            season: default_season(),
            competition_kind: CompetitionKind::default(),
            participants_season: None,
            user_agent: default_user_agent(),
        }
    }
}

impl CrawlConfig {
    /// Join a site-relative path onto the configured origin.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

fn default_base_url() -> String {
    String::from(DEFAULT_BASE_URL)
}

fn default_season() -> u16 {
    2025
}

fn default_user_agent() -> String {
    String::from("Mozilla/5.0 (X11; Linux x86_64) tfmkt-scraper")
}

/// The flavour of competition a participants entrypoint points at.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CompetitionKind {
    #[default]
    Cup,
    League,
}

impl CompetitionKind {
    /// Path segment the site uses for this kind of competition.
    pub fn path_segment(self) -> &'static str {
        match self {
            CompetitionKind::Cup => "pokalwettbewerb",
            CompetitionKind::League => "wettbewerb",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: CrawlConfig = serde_json::from_str(r#"{"season": 2023}"#).unwrap();
        assert_eq!(config.season, 2023);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.competition_kind, CompetitionKind::Cup);
    }

    #[test]
    fn test_absolute_joins_without_double_slash() {
        let config = CrawlConfig {
            base_url: "https://example.org/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.absolute("/spielbericht/index/spielbericht/1"),
            "https://example.org/spielbericht/index/spielbericht/1"
        );
    }

    #[test]
    fn test_competition_kind_from_str() {
        assert_eq!(
            CompetitionKind::from_str("League").unwrap(),
            CompetitionKind::League
        );
        assert_eq!(CompetitionKind::Cup.path_segment(), "pokalwettbewerb");
    }
}
