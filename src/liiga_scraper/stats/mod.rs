//! Season statistics tables. All of them are `table#stats` with one row per
//! team or player; the column layouts differ per page.

pub(crate) mod players;
pub(crate) mod teams;
pub(crate) mod times;

use chrono::NaiveDateTime;
use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::liiga_scraper::dom::full_text;
use crate::model::Timestamp;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub(crate) fn stat_rows(document: &Html) -> Result<Vec<ElementRef<'_>>> {
    let row_selector = Selector::parse("table#stats tbody tr")?;
    Ok(document.select(&row_selector).collect())
}

/// URL of a team table of one regular season, e.g. `stats_type=ylivoima`.
pub(crate) fn team_table_url(base: &str, season_label: &str, stats_type: &str) -> String {
    format!(
        "{}/tilastot/{season_label}/runkosarja/joukkueet/?stats_type={stats_type}&home_away=&sort=",
        base.trim_end_matches('/')
    )
}

/// Text of the `i`th cell, empty when the row is short.
pub(crate) fn cell_text(cells: &[ElementRef], i: usize) -> String {
    cells.get(i).map(full_text).unwrap_or_default()
}

/// The record that opens a stat stream.
pub(crate) fn timestamp(season: u32, now: NaiveDateTime) -> Timestamp {
    Timestamp {
        timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        season,
    }
}
