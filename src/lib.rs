//! Extract football competitions, clubs, players, games and line-ups from
//! transfermarkt pages.
//!
//! Pages are parsed against a base [`Context`] that carries the identity of
//! the page and of the record that led to it. Each parse yields assembled
//! [`Record`]s, follow-up [`PageRequest`]s, or both. [`TfmktClient`] fetches
//! pages and drives a [`Spider`] over them; [`parse_page`] works on saved
//! documents without any network access.

pub use assembler::assemble;
pub use client::TfmktClient;
pub use config::{CompetitionKind, CrawlConfig, DEFAULT_BASE_URL};
pub use error::{Result, TfmktError};
pub use linker::EntrypointStrategy;
pub use model::*;
pub use crate::scraper::contract::PageContracts;
pub use crate::scraper::{parse_page, Html};
pub use spider::Spider;

pub mod assembler;
pub mod client;
pub mod config;
pub mod error;
pub mod linker;
pub mod model;
pub mod scraper;
pub mod spider;
