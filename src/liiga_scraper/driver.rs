//! Run modes. Each fetches pages in order and hands records to `emit` as
//! soon as a page is parsed, so output streams while the run continues.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info, instrument, warn};

use crate::error::{LiigaError, Result};
use crate::liiga_scraper::games::{parse_game_page, GameShell};
use crate::liiga_scraper::schedule::{game_from_schedule, parse_schedule, ScheduleRow, SkipPolicy};
use crate::liiga_scraper::season::{parse_teams, season_from_url, TeamDirectory};
use crate::liiga_scraper::stats::players::{
    parse_player_stats, parse_stat_seasons, player_stats_url, SEASONS_PATH,
};
use crate::liiga_scraper::stats::teams::{merge_team_stat_page, TeamStatPage};
use crate::liiga_scraper::stats::times::{
    parse_player_times, parse_special_teams, player_times_url, SpecialTeams,
};
use crate::liiga_scraper::stats::{team_table_url, timestamp};
use crate::liiga_scraper::{get_document, join_url};
use crate::model::{Record, Season};

/// How a run treats scheduled games and failing games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Cut-off for games that have not been played yet.
    pub today: NaiveDate,
    pub skip: SkipPolicy,
    /// Log a failing game and continue instead of aborting the run.
    pub keep_going: bool,
}

fn serie(playoffs: bool) -> &'static str {
    if playoffs {
        "playoffs"
    } else {
        "runkosarja"
    }
}

/// Schedule page of a season.
pub(crate) fn season_url(base: &str, season_label: &str, playoffs: bool) -> String {
    format!(
        "{}/ottelut/{season_label}/{}/",
        base.trim_end_matches('/'),
        serie(playoffs)
    )
}

/// Detail page of one game.
pub(crate) fn game_url(base: &str, season_label: &str, number: u32, playoffs: bool) -> String {
    format!(
        "{}/ottelut/{season_label}/{}/{number}/seuranta/",
        base.trim_end_matches('/'),
        serie(playoffs)
    )
}

fn emit_all<E>(records: Vec<Record>, emit: &mut E) -> Result<()>
where
    E: FnMut(Record) -> Result<()>,
{
    records.into_iter().try_for_each(|record| emit(record))
}

/// Emit a game's records, or under `keep_going` log the failure and move on.
fn settle_game<E>(
    result: Result<Vec<Record>>,
    number: u32,
    options: &ScrapeOptions,
    emit: &mut E,
) -> Result<()>
where
    E: FnMut(Record) -> Result<()>,
{
    match result {
        Ok(records) => emit_all(records, emit),
        Err(e) if options.keep_going => {
            warn!(error = %e, number, "skipping game");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

async fn fetch_game(
    client: &reqwest::Client,
    game_url: &str,
    season: &Season,
    shell: &GameShell,
) -> Result<Vec<Record>> {
    let document = get_document(client, game_url).await?;
    parse_game_page(&document, season, shell)
}

fn shell_from_row(row: &ScheduleRow, teams: &TeamDirectory, playoffs: bool) -> Result<GameShell> {
    Ok(GameShell {
        number: row.number,
        identifier: row.identifier(),
        date: row.date,
        time: row.time.clone(),
        playoffs,
        home: teams.resolve(&row.home)?.id.clone(),
        away: teams.resolve(&row.away)?.id.clone(),
        resultattr: (!row.resultattr.is_empty()).then(|| row.resultattr.clone()),
    })
}

/// Walk a season (or playoffs) schedule page and every played game's detail
/// page. The regular season also emits the season and its teams first.
#[instrument(skip(client, emit))]
pub(crate) async fn scrape_season<E>(
    client: &reqwest::Client,
    url: &str,
    playoffs: bool,
    options: &ScrapeOptions,
    emit: &mut E,
) -> Result<()>
where
    E: FnMut(Record) -> Result<()>,
{
    let (season, teams, rows) = {
        let document = get_document(client, url).await?;
        let season = season_from_url(url, playoffs)?;
        let teams = parse_teams(&document, &season)?;
        let rows = parse_schedule(&document, &season)?;
        (season, teams, rows)
    };

    if !playoffs {
        emit(Record::Season(season.clone()))?;
        for team in &teams {
            emit(Record::Team(team.clone()))?;
        }
    }
    let teams = TeamDirectory::new(teams);

    for row in &rows {
        if options.skip.skips(row.date, options.today) {
            debug!(number = row.number, date = ?row.date, "skipping unplayed game");
            continue;
        }
        let Some(link) = row.link.as_deref() else {
            debug!(number = row.number, "no detail link");
            continue;
        };
        let result = async {
            let shell = shell_from_row(row, &teams, playoffs)?;
            fetch_game(client, &join_url(url, link)?, &season, &shell).await
        }
        .await;
        settle_game(result, row.number, options, emit)?;
    }
    info!(season = %season.years, playoffs, games = rows.len(), "season done");
    Ok(())
}

/// Fetch one game by season label and number. `home` and `away` are team ids.
#[instrument(skip(client, emit))]
#[allow(clippy::too_many_arguments)]
pub(crate) async fn scrape_game<E>(
    client: &reqwest::Client,
    base: &str,
    season_label: &str,
    number: u32,
    home: &str,
    away: &str,
    playoffs: bool,
    emit: &mut E,
) -> Result<()>
where
    E: FnMut(Record) -> Result<()>,
{
    let season = Season::from_label(season_label, playoffs)
        .ok_or_else(|| LiigaError::NoSeason(season_label.to_string()))?;
    let shell = GameShell {
        number,
        identifier: number.to_string(),
        date: None,
        time: None,
        playoffs,
        home: home.to_string(),
        away: away.to_string(),
        resultattr: None,
    };
    let url = game_url(base, season_label, number, playoffs);
    let records = fetch_game(client, &url, &season, &shell).await?;
    emit_all(records, emit)
}

/// Games of one schedule page built from the schedule alone. The first
/// unplayed game ends the schedule.
fn schedule_games(
    rows: &[ScheduleRow],
    season: &Season,
    teams: &TeamDirectory,
    playoffs: bool,
) -> Result<Vec<Record>> {
    let mut records = vec![];
    for row in rows {
        match game_from_schedule(row, season, teams, playoffs)? {
            Some(game) => records.push(Record::Game(game)),
            None => break,
        }
    }
    Ok(records)
}

async fn history_season<E>(
    client: &reqwest::Client,
    base: &str,
    season_id: u32,
    emit: &mut E,
) -> Result<()>
where
    E: FnMut(Record) -> Result<()>,
{
    let label = Season::label_for(season_id);

    let (season, teams, games) = {
        let url = season_url(base, &label, false);
        let document = get_document(client, &url).await?;
        let season = season_from_url(&url, false)?;
        let teams = TeamDirectory::new(parse_teams(&document, &season)?);
        let rows = parse_schedule(&document, &season)?;
        let games = schedule_games(&rows, &season, &teams, false)?;
        (season, teams, games)
    };
    emit(Record::Season(season.clone()))?;
    for team in teams.teams() {
        emit(Record::Team(team.clone()))?;
    }
    emit_all(games, emit)?;

    let playoff_games = {
        let url = season_url(base, &label, true);
        let document = get_document(client, &url).await?;
        let rows = parse_schedule(&document, &season)?;
        schedule_games(&rows, &season, &teams, true)?
    };
    emit_all(playoff_games, emit)?;

    let mut stats = BTreeMap::new();
    for page in TeamStatPage::ALL {
        let url = team_table_url(base, &label, page.stats_type());
        let document = get_document(client, &url).await?;
        merge_team_stat_page(&document, page, &season, &teams, &mut stats)?;
    }
    emit_all(stats.into_values().map(Record::TeamStat).collect(), emit)
}

/// Seasons `from..=to` (ending years) from their schedules alone, with
/// playoff games and team season stats.
#[instrument(skip(client, emit))]
pub(crate) async fn scrape_history<E>(
    client: &reqwest::Client,
    base: &str,
    from: u32,
    to: u32,
    options: &ScrapeOptions,
    emit: &mut E,
) -> Result<()>
where
    E: FnMut(Record) -> Result<()>,
{
    for season_id in from..=to {
        match history_season(client, base, season_id, emit).await {
            Ok(()) => info!(season_id, "history season done"),
            Err(e) if options.keep_going && !matches!(e, LiigaError::Io(_)) => {
                warn!(error = %e, season_id, "skipping season");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Player season lines for every season, team and serie.
#[instrument(skip(client, emit))]
pub(crate) async fn scrape_player_stats<E>(
    client: &reqwest::Client,
    base: &str,
    emit: &mut E,
) -> Result<()>
where
    E: FnMut(Record) -> Result<()>,
{
    let seasons = {
        let url = format!("{}{SEASONS_PATH}", base.trim_end_matches('/'));
        parse_stat_seasons(&get_document(client, &url).await?)?
    };
    for label in &seasons {
        let season = Season::from_label(label, false)
            .ok_or_else(|| LiigaError::NoSeason(label.clone()))?;
        let teams = {
            let url = player_stats_url(base, label, false, "");
            parse_teams(&get_document(client, &url).await?, &season)?
        };
        for team in &teams {
            for playoffs in [false, true] {
                let url = player_stats_url(base, label, playoffs, &team.id);
                let players = {
                    let document = get_document(client, &url).await?;
                    parse_player_stats(&document, label, playoffs, team)?
                };
                emit_all(players.into_iter().map(Record::PlayerStats).collect(), emit)?;
            }
        }
        info!(season = %label, teams = teams.len(), "player stats done");
    }
    Ok(())
}

/// Time on ice per player of one regular season.
#[instrument(skip(client, emit))]
pub(crate) async fn scrape_player_times<E>(
    client: &reqwest::Client,
    base: &str,
    season_id: u32,
    now: NaiveDateTime,
    emit: &mut E,
) -> Result<()>
where
    E: FnMut(Record) -> Result<()>,
{
    emit(Record::Timestamp(timestamp(season_id, now)))?;
    let url = player_times_url(base, &Season::label_for(season_id));
    let players = parse_player_times(&get_document(client, &url).await?, season_id)?;
    emit_all(players.into_iter().map(Record::PlayerTimeStats).collect(), emit)
}

/// Power-play and short-handed team tables of one regular season.
#[instrument(skip(client, emit))]
pub(crate) async fn scrape_team_times<E>(
    client: &reqwest::Client,
    base: &str,
    season_id: u32,
    now: NaiveDateTime,
    emit: &mut E,
) -> Result<()>
where
    E: FnMut(Record) -> Result<()>,
{
    emit(Record::Timestamp(timestamp(season_id, now)))?;
    let label = Season::label_for(season_id);
    for kind in [SpecialTeams::PowerPlay, SpecialTeams::ShortHanded] {
        let url = team_table_url(base, &label, kind.stats_type());
        let teams = parse_special_teams(&get_document(client, &url).await?, season_id, kind)?;
        emit_all(teams.into_iter().map(|t| kind.record(t)).collect(), emit)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Team;

    #[test]
    fn test_urls() {
        assert_eq!(
            season_url("https://liiga.fi/", "2014-2015", true),
            "https://liiga.fi/ottelut/2014-2015/playoffs/"
        );
        assert_eq!(
            game_url("https://liiga.fi", "2014-2015", 123, false),
            "https://liiga.fi/ottelut/2014-2015/runkosarja/123/seuranta/"
        );
    }

    fn options(keep_going: bool) -> ScrapeOptions {
        ScrapeOptions {
            today: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            skip: SkipPolicy::Future,
            keep_going,
        }
    }

    #[test]
    fn test_settle_game_keep_going() {
        let mut seen = vec![];
        let mut emit = |r: Record| -> Result<()> {
            seen.push(r);
            Ok(())
        };
        let failure = || -> Result<Vec<Record>> { Err(LiigaError::UnknownGoalCode("XX".to_string())) };

        assert!(settle_game(failure(), 1, &options(true), &mut emit).is_ok());
        assert!(settle_game(failure(), 1, &options(false), &mut emit).is_err());
        drop(emit);
        assert!(seen.is_empty());
    }

    #[test]
    fn test_schedule_games_stop_at_first_unplayed() {
        let season = Season::from_label("2014-2015", false).unwrap();
        let teams = TeamDirectory::new(
            ["Tappara", "HIFK"]
                .iter()
                .map(|n| Team {
                    id: n.to_lowercase(),
                    name: n.to_string(),
                    season: season.years.clone(),
                })
                .collect(),
        );
        let row = |number, score| ScheduleRow {
            number,
            date: None,
            time: None,
            home: "Tappara".to_string(),
            away: "HIFK".to_string(),
            link: None,
            score,
            resultattr: String::new(),
        };
        let rows = [row(1, Some((3, 2))), row(2, None), row(3, Some((1, 0)))];
        let records = schedule_games(&rows, &season, &teams, false).unwrap();
        assert_eq!(records.len(), 1);
        assert!(matches!(&records[0], Record::Game(g) if g.id == 2015001));
    }

    #[test]
    fn test_shell_from_row_resolves_teams() {
        let teams = TeamDirectory::new(vec![
            Team {
                id: "tappara".to_string(),
                name: "Tappara".to_string(),
                season: "2014-2015".to_string(),
            },
            Team {
                id: "hifk".to_string(),
                name: "HIFK".to_string(),
                season: "2014-2015".to_string(),
            },
        ]);
        let row = ScheduleRow {
            number: 12,
            date: None,
            time: None,
            home: "Tappara".to_string(),
            away: "HIFK".to_string(),
            link: Some("/ottelut/2014-2015/runkosarja/12/seuranta/".to_string()),
            score: Some((3, 2)),
            resultattr: String::new(),
        };
        let shell = shell_from_row(&row, &teams, false).unwrap();
        assert_eq!(shell.home, "tappara");
        assert_eq!(shell.away, "hifk");
        assert_eq!(shell.identifier, "12");
        assert_eq!(shell.resultattr, None);
    }
}
