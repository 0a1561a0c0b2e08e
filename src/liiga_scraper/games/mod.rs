pub(crate) mod clock;
pub(crate) mod context;
pub(crate) mod events;
pub(crate) mod lineup;
pub(crate) mod periods;
pub(crate) mod shots;

use chrono::NaiveDate;
use scraper::{Html, Selector};
use tracing::debug;

use crate::error::Result;
use crate::liiga_scraper::dom::full_text;
use crate::liiga_scraper::schedule::{game_id, points};
use crate::liiga_scraper::tables::{OVERTIME_CODE, SHOOTOUT_CODE};
use crate::liiga_scraper::values::{count_value, str_value};
use crate::model::{Game, GameSide, Record, Season};
use clock::GameClock;
use context::GameContext;

/// What the schedule knows about a game before its page is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameShell {
    pub number: u32,
    pub identifier: String,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub playoffs: bool,
    /// Team ids, already resolved against the season.
    pub home: String,
    pub away: String,
    /// `JA`/`VL` from the schedule. Derived from the end clock when absent.
    pub resultattr: Option<String>,
}

/// The summary paragraphs at the top of a game page.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GameInfo {
    score: (u32, u32),
    periods: Option<String>,
    endtime: Option<String>,
    attendance: Option<u32>,
}

/// `None` when the score line is missing or not `home – away`, which is how
/// an unplayed game's page looks.
fn parse_info(document: &Html) -> Result<Option<GameInfo>> {
    let paragraph_selector = Selector::parse("div.info p")?;
    let paragraphs: Vec<String> = document
        .select(&paragraph_selector)
        .map(|p| full_text(&p))
        .collect();

    let Some(score_line) = paragraphs.first() else {
        return Ok(None);
    };
    let [home, _, away] = score_line.split_whitespace().collect::<Vec<_>>()[..] else {
        return Ok(None);
    };
    let (Ok(home), Ok(away)) = (home.parse::<u32>(), away.parse::<u32>()) else {
        return Ok(None);
    };

    let attendance = paragraphs
        .get(4)
        .and_then(|p| {
            p.rsplit(|c: char| !(c.is_ascii_digit() || c.is_whitespace()))
                .next()
        })
        .map(count_value)
        .transpose()?
        .flatten();

    Ok(Some(GameInfo {
        score: (home, away),
        periods: paragraphs.get(1).and_then(|p| str_value(p)),
        endtime: paragraphs
            .get(2)
            .and_then(|p| p.split_whitespace().next())
            .map(str::to_string),
        attendance,
    }))
}

/// Result attribute implied by the clock the game ended at.
fn resultattr_from_end(endtime: Option<&str>, playoffs: bool) -> String {
    let Some(end) = endtime.and_then(|t| GameClock::parse(t).ok()) else {
        return String::new();
    };
    if end == GameClock::SHOOTOUT_MARK && !playoffs {
        SHOOTOUT_CODE.to_string()
    } else if end > GameClock::REGULATION_END {
        OVERTIME_CODE.to_string()
    } else {
        String::new()
    }
}

/// Every record of one game page, in output order: the game, players,
/// goalkeepers, referees, events, shots, periods and the game stats summary.
///
/// A page without a final score yields no records.
pub fn parse_game_page(document: &Html, season: &Season, shell: &GameShell) -> Result<Vec<Record>> {
    let id = game_id(season.id, shell.number, shell.playoffs)?;
    let Some(info) = parse_info(document)? else {
        debug!(game_id = id, "game page has no final score");
        return Ok(vec![]);
    };

    let resultattr = shell
        .resultattr
        .clone()
        .unwrap_or_else(|| resultattr_from_end(info.endtime.as_deref(), shell.playoffs));
    let (home_score, away_score) = info.score;
    let (home_points, away_points) = points(season.id, info.score, &resultattr, shell.playoffs);

    let game = Game {
        id,
        number: shell.number,
        identifier: shell.identifier.clone(),
        date: shell.date,
        time: shell.time.clone(),
        season: season.years.clone(),
        playoffs: shell.playoffs,
        home: GameSide {
            score: home_score,
            points: home_points,
            team: shell.home.clone(),
        },
        away: GameSide {
            score: away_score,
            points: away_points,
            team: shell.away.clone(),
        },
        score: format!("{home_score}-{away_score}"),
        resultattr,
        endtime: info.endtime.clone(),
        periods: info.periods.clone(),
        attendance: info.attendance,
    };

    let mut ctx = GameContext::new(&season.years, id, shell.playoffs, &shell.home, &shell.away);
    let players = lineup::parse_players(document, &mut ctx)?;
    let goalkeepers = lineup::parse_goalkeepers(document, &mut ctx)?;
    let referees = lineup::parse_referees(document, &ctx)?;
    debug!(names = ctx.names.len(), game_id = id, "built name index");
    let events = events::parse_events(document, &mut ctx)?;
    let shots = shots::parse_shots(document, &mut ctx)?;
    let periods = periods::parse_periods(document, &ctx, info.score)?;

    let mut records = vec![Record::Game(game)];
    records.extend(players.into_iter().map(Record::Player));
    records.extend(goalkeepers.into_iter().map(Record::Goalkeeper));
    records.extend(referees.into_iter().map(Record::Referee));
    records.extend(events.into_iter().map(Record::GameEvent));
    records.extend(shots.into_iter().map(Record::GameEvent));
    if let Some((periods, stats)) = periods {
        records.extend(periods.into_iter().map(Record::Period));
        records.push(Record::GameStats(stats));
    }
    Ok(records)
}
