//! Pure helpers that turn raw markup fragments into field values.

use std::sync::LazyLock;

use chrono::NaiveDate;
use itertools::Itertools;
use regex::Regex;

use crate::error::{Result, TfmktError};

/// Side length in pixels of one cell of the minute sprite sheet.
const SPRITE_CELL_PX: i32 = 36;
/// Minutes per sprite sheet row.
const SPRITE_COLUMNS: i32 = 10;
/// Rows on the sheet, covering minutes 1 to 120.
const SPRITE_ROWS: i32 = 12;

static SPRITE_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"background-position:\s*([-+]?\d+)px\s+([-+]?\d+)px").expect("valid regex")
});
static MARKET_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^€\s*(\d+(?:\.\d+)?)\s*(k|m|bn)$").expect("valid regex")
});
static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/datum/(\d{4}-\d{2}-\d{2})").expect("valid regex"));
static KICKOFF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2}:\d{2}(?:\s*(?:AM|PM|am|pm))?)").expect("valid regex")
});
static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(?(\d+:\d+)\)?").expect("valid regex"));
static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^/([^/]+)/[^/]+/(?:verein|spieler|wettbewerb|pokalwettbewerb|spielbericht|trainer|schiedsrichter)/[^/]+",
    )
    .expect("valid regex")
});

/// Trimmed text, or an empty string when there is none.
pub fn safe_strip(text: Option<&str>) -> String {
    text.map(str::trim).unwrap_or_default().to_string()
}

/// Trimmed text, or `None` when it is empty after trimming.
pub fn non_empty(text: impl AsRef<str>) -> Option<String> {
    let text = text.as_ref().trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Collapse internal whitespace runs into single spaces.
pub fn normalize_space(text: &str) -> String {
    text.split_whitespace().join(" ")
}

/// Decode a minute sprite background offset into the match minute.
///
/// The sheet lays out minutes left to right, ten per row, in 36px cells, so
/// `(0, 0)` is minute 1 and `(-36, -36)` is minute 12. Offsets that fall off
/// the grid mean the sheet changed and are reported instead of guessed.
pub fn sprite_offset_to_minute(dx: i32, dy: i32) -> Result<i32> {
    let off_grid = || TfmktError::SpriteOffset { dx, dy };
    if dx > 0 || dy > 0 || dx % SPRITE_CELL_PX != 0 || dy % SPRITE_CELL_PX != 0 {
        return Err(off_grid());
    }
    let column = -dx / SPRITE_CELL_PX;
    let row = -dy / SPRITE_CELL_PX;
    if column >= SPRITE_COLUMNS || row >= SPRITE_ROWS {
        return Err(off_grid());
    }
    Ok(row * SPRITE_COLUMNS + column + 1)
}

/// Pull the pixel pair out of a `background-position: Xpx Ypx;` style.
pub fn parse_sprite_style(style: &str) -> Option<(i32, i32)> {
    let captures = SPRITE_STYLE_RE.captures(style)?;
    let dx = captures.get(1)?.as_str().parse().ok()?;
    let dy = captures.get(2)?.as_str().parse().ok()?;
    Some((dx, dy))
}

/// Parse values like `€25k` or `€1.5m` into euros.
pub fn market_value_to_number(text: &str) -> Option<f64> {
    let captures = MARKET_VALUE_RE.captures(text.trim())?;
    let amount: f64 = captures.get(1)?.as_str().parse().ok()?;
    let multiplier = match captures.get(2)?.as_str() {
        "k" => 1_000.0,
        "m" => 1_000_000.0,
        "bn" => 1_000_000_000.0,
        _ => return None,
    };
    Some(amount * multiplier)
}

/// The decimal id that follows `/{segment}/` in a path, e.g. `verein` or `spieler`.
pub fn extract_numeric_id(href: &str, segment: &str) -> Option<u64> {
    let marker = format!("/{segment}/");
    let (_, rest) = href.split_once(&marker)?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// The slug of a canonical entity URL shaped `/{slug}/{page}/{entity}/{id}`.
pub fn extract_slug(href: &str) -> Option<String> {
    let path = href_path(href);
    SLUG_RE
        .captures(&path)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// The first segment of a path, whatever its shape.
pub fn first_path_segment(href: &str) -> Option<String> {
    href_path(href)
        .split('/')
        .nth(1)
        .and_then(non_empty)
}

/// The entity code of an href: its first path segment, percent-decoded.
///
/// A segment that does not decode to UTF-8 is kept as written.
pub fn extract_code(href: &str) -> Option<String> {
    let segment = first_path_segment(href)?;
    match urlencoding::decode(&segment) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => Some(segment),
    }
}

/// The last non-empty segment of a path.
pub fn last_path_segment(href: &str) -> Option<String> {
    href_path(href)
        .split('/')
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}

/// Reduce an absolute URL or relative href to a site-relative path without
/// a trailing slash.
pub fn normalize_href(href: &str) -> String {
    let href = href.trim();
    let path = if href.starts_with("http://") || href.starts_with("https://") {
        reqwest::Url::parse(href)
            .map(|url| url.path().to_string())
            .unwrap_or_else(|_| href.to_string())
    } else {
        href.to_string()
    };
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Path part of an href, dropping origin, query and fragment.
fn href_path(href: &str) -> String {
    let path = normalize_href(href);
    path.split(['?', '#']).next().unwrap_or_default().to_string()
}

/// The ISO date embedded in a `/datum/YYYY-MM-DD` link.
pub fn extract_iso_date(href: &str) -> Option<NaiveDate> {
    let captures = ISO_DATE_RE.captures(href)?;
    NaiveDate::parse_from_str(captures.get(1)?.as_str(), "%Y-%m-%d").ok()
}

/// The first clock time in `text`, e.g. `3:00 PM` or `15:30`.
pub fn extract_kickoff_time(text: &str) -> Option<String> {
    KICKOFF_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// A `h:a` score, optionally wrapped in parentheses.
pub fn extract_score(text: &str) -> Option<String> {
    SCORE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Lower-case, underscore-separated form of a label, e.g. `First Tier` → `first_tier`.
pub fn underscore_label(label: &str) -> String {
    label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .join("_")
}
