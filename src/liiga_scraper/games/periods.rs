use scraper::{Html, Selector};
use tracing::debug;

use crate::error::{LiigaError, Result};
use crate::liiga_scraper::dom::full_text;
use crate::liiga_scraper::games::context::GameContext;
use crate::liiga_scraper::row_cells;
use crate::liiga_scraper::tables::{stat_field, StatField, TOTAL_LABEL};
use crate::liiga_scraper::values::required_int;
use crate::model::{GameStats, Period, SideCounters};

/// `1.`, `1. erä` → `1`; anything without a leading number is upper-cased
/// (`ja` → `JA`).
pub(crate) fn period_label(text: &str) -> String {
    let text = text.trim();
    let digits: String = text.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        text.to_uppercase()
    } else {
        digits
    }
}

/// A `home - away` counter pair. A dash or an empty cell counts as zero.
fn counter_pair(text: &str) -> Result<(u32, u32)> {
    let text = text.trim();
    if text.is_empty() || text == "-" {
        return Ok((0, 0));
    }
    let (home, away) = text.split_once('-').unwrap_or((text, ""));
    Ok((required_int(home)?, required_int(away)?))
}

fn set_counter(counters: &mut SideCounters, field: StatField, value: u32) {
    let slot = match field {
        StatField::Score => &mut counters.score,
        StatField::Shots => &mut counters.shots,
        StatField::Saved => &mut counters.saved,
        StatField::Blocked => &mut counters.blocked,
        StatField::Missed => &mut counters.missed,
        StatField::Faceoffs => &mut counters.faceoffs,
        StatField::PenaltyMinutes => &mut counters.penaltyminutes,
    };
    *slot = value;
}

/// Period rows and the whole-game summary from the game stats table.
///
/// The running score accumulated over the periods must end at `final_score`.
/// Returns `None` when the page has no stats table.
pub(crate) fn parse_periods(
    document: &Html,
    ctx: &GameContext,
    final_score: (u32, u32),
) -> Result<Option<(Vec<Period>, GameStats)>> {
    let table_selector = Selector::parse("table.game-stats")?;
    let header_selector = Selector::parse("thead th")?;
    let row_selector = Selector::parse("tbody tr")?;
    let label_selector = Selector::parse("th")?;

    let Some(table) = document.select(&table_selector).next() else {
        debug!(game_id = ctx.game_id, "no game stats table");
        return Ok(None);
    };

    // Column labels; the total column is read but not kept.
    let columns: Vec<Option<String>> = table
        .select(&header_selector)
        .skip(1)
        .map(|th| {
            let text = full_text(&th);
            (text != TOTAL_LABEL).then(|| period_label(&text))
        })
        .collect();
    let mut counters = vec![(SideCounters::default(), SideCounters::default()); columns.len()];

    for row in table.select(&row_selector) {
        let label = row
            .select(&label_selector)
            .next()
            .map(|th| full_text(&th))
            .unwrap_or_default();
        let Some(field) = stat_field(&label) else {
            debug!(label = %label, "skipping game stats row");
            continue;
        };
        for (cell, (home, away)) in row_cells(&row).iter().zip(counters.iter_mut()) {
            let (home_value, away_value) = counter_pair(&full_text(cell))?;
            set_counter(home, field, home_value);
            set_counter(away, field, away_value);
        }
    }

    let mut periods = vec![];
    let mut total = (SideCounters::default(), SideCounters::default());
    for (label, (home, away)) in columns.into_iter().zip(counters) {
        let Some(label) = label else {
            continue;
        };
        total.0.add(&home);
        total.1.add(&away);
        periods.push(Period {
            season: ctx.season.clone(),
            gameid: ctx.game_id,
            period: label,
            runningscore: format!("{}-{}", total.0.score, total.1.score),
            home,
            away,
        });
    }

    let (home_score, away_score) = final_score;
    if (total.0.score, total.1.score) != final_score {
        return Err(LiigaError::ScoreMismatch {
            periods: format!("{}-{}", total.0.score, total.1.score),
            game: format!("{home_score}-{away_score}"),
        });
    }

    debug!(count = periods.len(), game_id = ctx.game_id, "parsed periods");
    let stats = GameStats {
        season: ctx.season.clone(),
        gameid: ctx.game_id,
        home: total.0,
        away: total.1,
        score: format!("{home_score}-{away_score}"),
    };
    Ok(Some((periods, stats)))
}
