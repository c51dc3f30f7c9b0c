//! Minesweeper rules engine: cells, mine placement, flood fill, chording and
//! the win/loss state machine for a single game session.
//!
//! A front end drives a [`Game`] with click intents and redraws whatever
//! [`Game::drain_change_feed`] hands back.

pub use board::*;
pub use cell::*;
pub use change_feed::*;
pub use difficulty::*;
pub use error::*;
pub use game::*;
pub use layout::*;
pub use options::*;
pub use records::*;
pub use types::*;

mod board;
mod cell;
mod change_feed;
mod difficulty;
mod error;
mod game;
mod layout;
mod options;
mod records;
mod types;
