use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{LiigaError, Result};
use crate::liiga_scraper::dom::full_text;
use crate::liiga_scraper::row_cells;
use crate::liiga_scraper::season::TeamDirectory;
use crate::liiga_scraper::tables::{OVERTIME_CODE, SHOOTOUT_CODE};
use crate::liiga_scraper::values::required_int;
use crate::model::{Game, GameSide, Season};

const SCHEDULE_DATE_FORMAT: &str = "%Y%m%d";

/// Playoff games are numbered after the regular season: `number + 900`.
pub(crate) const PLAYOFF_OFFSET: u32 = 900;
const MAX_PLAYOFF_NUMBER: u32 = 1000 - PLAYOFF_OFFSET;

/// From this season on a regulation win is worth three points.
pub(crate) const THREE_POINT_ERA_FROM: u32 = 2005;
/// Before this season an overtime loss is worth nothing.
pub(crate) const OVERTIME_LOSS_POINT_FROM: u32 = 2002;

/// One row of a season's game schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    pub number: u32,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub home: String,
    pub away: String,
    pub link: Option<String>,
    pub score: Option<(u32, u32)>,
    pub resultattr: String,
}

impl ScheduleRow {
    /// The game's path segment, e.g. `123` in `/ottelut/2014-2015/runkosarja/123/seuranta/`.
    pub fn identifier(&self) -> String {
        self.link
            .as_deref()
            .and_then(|l| l.trim_end_matches('/').rsplit('/').nth(1))
            .unwrap_or_default()
            .to_string()
    }
}

/// Which scheduled games count as not yet played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkipPolicy {
    /// Skip games dated after today.
    #[default]
    Future,
    /// Skip games dated today or later; today's games may still be running.
    TodayOrLater,
}

impl SkipPolicy {
    pub fn skips(self, date: Option<NaiveDate>, today: NaiveDate) -> bool {
        match (self, date) {
            (_, None) => false,
            (SkipPolicy::Future, Some(date)) => date > today,
            (SkipPolicy::TodayOrLater, Some(date)) => date >= today,
        }
    }
}

/// `season * 1000 + number`, with playoff games offset by 900.
pub fn game_id(season_id: u32, number: u32, playoffs: bool) -> Result<u32> {
    let in_range = if playoffs {
        number < MAX_PLAYOFF_NUMBER
    } else {
        number < PLAYOFF_OFFSET
    };
    if !in_range {
        return Err(LiigaError::GameNumberOutOfRange { number, playoffs });
    }
    let offset = if playoffs { PLAYOFF_OFFSET } else { 0 };
    Ok(season_id * 1000 + number + offset)
}

/// Points awarded to (home, away). Playoff games award none.
pub(crate) fn points(
    season_id: u32,
    score: (u32, u32),
    resultattr: &str,
    playoffs: bool,
) -> (Option<u8>, Option<u8>) {
    if playoffs {
        return (None, None);
    }
    let (win, overtime_win, overtime_loss) = if season_id >= THREE_POINT_ERA_FROM {
        (3, 2, 1)
    } else if season_id < OVERTIME_LOSS_POINT_FROM {
        (2, 2, 0)
    } else {
        (2, 2, 1)
    };
    let (home, away) = score;
    let overtime = resultattr == OVERTIME_CODE || resultattr == SHOOTOUT_CODE;
    let (home_points, away_points) = if home == away {
        (1, 1)
    } else if !overtime {
        if home > away {
            (win, 0)
        } else {
            (0, win)
        }
    } else if home > away {
        (overtime_win, overtime_loss)
    } else {
        (overtime_loss, overtime_win)
    };
    (Some(home_points), Some(away_points))
}

/// Renumber and redate games the site lists out of order.
pub(crate) fn correct_anomaly(
    season_id: u32,
    number: u32,
    date: Option<NaiveDate>,
) -> (u32, Option<NaiveDate>) {
    match (season_id, number) {
        (1979, 76) => (79, NaiveDate::from_ymd_opt(1978, 11, 26)),
        (1979, 77..=79) => (number - 1, date),
        (1988, 129) => (126, NaiveDate::from_ymd_opt(1987, 12, 3)),
        (1988, 126..=128) => (number + 1, date),
        _ => (number, date),
    }
}

pub(crate) fn parse_schedule(document: &Html, season: &Season) -> Result<Vec<ScheduleRow>> {
    let row_selector = Selector::parse("table#games tbody tr")?;
    let rows = document
        .select(&row_selector)
        .map(|row| parse_schedule_row(&row, season))
        .collect::<Result<Vec<_>>>()?;
    debug!(count = rows.len(), season = %season.years, "parsed schedule");
    Ok(rows)
}

fn parse_schedule_row(row: &ElementRef, season: &Season) -> Result<ScheduleRow> {
    let cells = row_cells(row);
    let cell = |i: usize| cells.get(i).map(full_text).unwrap_or_default();

    let number = required_int(&cell(0))?;
    let date = row
        .value()
        .attr("data-time")
        .filter(|d| !d.trim().is_empty())
        .map(|d| NaiveDate::parse_from_str(d.trim(), SCHEDULE_DATE_FORMAT))
        .transpose()?;
    let (number, date) = correct_anomaly(season.id, number, date);

    let time_selector = Selector::parse("td.h-l")?;
    let time = row
        .select(&time_selector)
        .next()
        .map(|e| full_text(&e))
        .filter(|t| !t.is_empty());

    let teams_selector = Selector::parse("td.ta-l a")?;
    let teams = row
        .select(&teams_selector)
        .next()
        .ok_or(LiigaError::ElementNotFound {
            context: "schedule teams (td.ta-l a)",
        })?;
    let (home, away) = split_teams(&teams.text().collect::<String>());

    let link_selector = Selector::parse("a[title='Seuranta']")?;
    let link = row
        .select(&link_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);

    let score = parse_score(&cell(5))?;
    let resultattr = cell(6);

    Ok(ScheduleRow {
        number,
        date,
        time,
        home,
        away,
        link,
        score,
        resultattr,
    })
}

/// Team names are on separate lines, or joined with a spaced dash.
fn split_teams(text: &str) -> (String, String) {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && *l != "-")
        .collect();
    if lines.len() >= 2 {
        return (lines[0].to_string(), lines[lines.len() - 1].to_string());
    }
    let text = text.trim();
    match text.split_once(" - ") {
        Some((home, away)) => (home.trim().to_string(), away.trim().to_string()),
        None => (text.to_string(), String::new()),
    }
}

/// `3 — 2` style score, or `None` for an unplayed game (`-`).
fn parse_score(text: &str) -> Result<Option<(u32, u32)>> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    match (parts.first(), parts.last()) {
        (None, _) | (Some(&"-"), _) => Ok(None),
        (Some(home), Some(away)) if parts.len() > 1 => {
            Ok(Some((required_int(home)?, required_int(away)?)))
        }
        (Some(score), _) => match score.split_once('-') {
            Some((home, away)) => Ok(Some((required_int(home)?, required_int(away)?))),
            None => Ok(None),
        },
    }
}

/// A Game record built from the schedule alone. `None` for unplayed games.
pub(crate) fn game_from_schedule(
    row: &ScheduleRow,
    season: &Season,
    teams: &TeamDirectory,
    playoffs: bool,
) -> Result<Option<Game>> {
    let Some((home_score, away_score)) = row.score else {
        return Ok(None);
    };
    let home = teams.resolve(&row.home)?;
    let away = teams.resolve(&row.away)?;
    let (home_points, away_points) = points(
        season.id,
        (home_score, away_score),
        &row.resultattr,
        playoffs,
    );
    Ok(Some(Game {
        id: game_id(season.id, row.number, playoffs)?,
        number: row.number,
        identifier: row.identifier(),
        date: row.date,
        time: row.time.clone(),
        season: season.years.clone(),
        playoffs,
        home: GameSide {
            score: home_score,
            points: home_points,
            team: home.id.clone(),
        },
        away: GameSide {
            score: away_score,
            points: away_points,
            team: away.id.clone(),
        },
        score: format!("{home_score}-{away_score}"),
        resultattr: row.resultattr.clone(),
        endtime: None,
        periods: None,
        attendance: None,
    }))
}
