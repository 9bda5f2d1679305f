mod club;
mod common;
mod competition;
mod context;
mod game;
mod lineup;
mod player;
mod record;
mod request;

pub use club::*;
pub use common::*;
pub use competition::*;
pub use context::*;
pub use game::*;
pub use lineup::*;
pub use player::*;
pub use record::*;
pub use request::*;
