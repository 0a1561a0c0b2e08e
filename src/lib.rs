//! Scraper for the Finnish ice hockey league site liiga.fi.
//!
//! Season schedules, game detail pages and statistics tables are parsed into
//! typed [`Record`]s that serialize to one JSON object per line. The game
//! page parser classifies every event log row and shot map entry into a
//! [`GameEvent`].

pub use client::LiigaClient;
pub use error::{LiigaError, Result};
pub use liiga_scraper::driver::ScrapeOptions;
pub use liiga_scraper::games::{parse_game_page, GameShell};
pub use liiga_scraper::schedule::{game_id, ScheduleRow, SkipPolicy};
pub use liiga_scraper::season::TeamDirectory;
pub use model::*;

mod client;
pub mod error;
mod liiga_scraper;
pub mod model;
