use std::str::FromStr;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{LiigaError, Result};
use crate::liiga_scraper::dom::full_text;
use crate::liiga_scraper::games::context::GameContext;
use crate::liiga_scraper::values::{int_value, pct_value, signed_value, str_value};
use crate::liiga_scraper::{player_id, row_cells};
use crate::model::{Goalkeeper, Player, Referee, Side};

const REFEREE_HREF_PREFIX: &str = "/tuomarit/";

/// The `data-location` of a lineup table or shot map group.
pub(crate) fn parse_side(location: &str) -> Result<Side> {
    Side::from_str(location.trim().to_lowercase().as_str())
        .map_err(|_| LiigaError::UnknownLocation(location.to_string()))
}

fn table_side(table: &ElementRef) -> Result<Side> {
    parse_side(table.value().attr("data-location").unwrap_or_default())
}

/// Identity columns shared by skater and goalkeeper rows: jersey, then the
/// player link with the name printed surname first.
struct RosterEntry {
    id: String,
    name: String,
    number: Option<u32>,
}

fn roster_entry(cells: &[ElementRef]) -> Result<Option<RosterEntry>> {
    let link_selector = Selector::parse("a")?;
    let Some(link) = cells.get(1).and_then(|c| c.select(&link_selector).next()) else {
        return Ok(None);
    };
    let number = cells
        .first()
        .map(|c| full_text(c).trim_start_matches('#').to_string())
        .map(|n| int_value(&n))
        .transpose()?
        .flatten();
    Ok(Some(RosterEntry {
        id: player_id(link.value().attr("href").unwrap_or_default()),
        name: full_text(&link),
        number,
    }))
}

fn cell(cells: &[ElementRef], i: usize) -> String {
    cells.get(i).map(full_text).unwrap_or_default()
}

/// Skater rows of both lineups. Each player is added to the name index.
pub(crate) fn parse_players(document: &Html, ctx: &mut GameContext) -> Result<Vec<Player>> {
    let table_selector = Selector::parse("table.players")?;
    let row_selector = Selector::parse("tbody tr")?;
    let mut players = vec![];
    for table in document.select(&table_selector) {
        let side = table_side(&table)?;
        for row in table.select(&row_selector) {
            let cells = row_cells(&row);
            let Some(entry) = roster_entry(&cells)? else {
                continue;
            };
            let player = Player {
                season: ctx.season.clone(),
                gameid: ctx.game_id,
                id: entry.id.clone(),
                name: entry.name.clone(),
                number: entry.number,
                team: ctx.team(side).to_string(),
                position: str_value(&cell(&cells, 2)),
                goals: int_value(&cell(&cells, 3))?,
                assists: int_value(&cell(&cells, 4))?,
                points: int_value(&cell(&cells, 5))?,
                penaltyminutes: int_value(&cell(&cells, 6))?,
                plus: int_value(&cell(&cells, 7))?,
                minus: int_value(&cell(&cells, 8))?,
                plusminus: signed_value(&cell(&cells, 9))?,
                shots: int_value(&cell(&cells, 10))?,
                faceoffs: int_value(&cell(&cells, 11))?,
                faceoffpct: pct_value(&cell(&cells, 12))?,
                toi: str_value(&cell(&cells, 13)),
            };
            let mentioned = ctx.event_player(side, Some(entry.id), entry.number, &entry.name);
            ctx.names.insert(side, &entry.name, mentioned);
            players.push(player);
        }
    }
    debug!(count = players.len(), game_id = ctx.game_id, "parsed players");
    Ok(players)
}

/// Goalkeeper rows of both lineups. Each goalkeeper is added to the name index.
pub(crate) fn parse_goalkeepers(
    document: &Html,
    ctx: &mut GameContext,
) -> Result<Vec<Goalkeeper>> {
    let table_selector = Selector::parse("table.goalkeepers")?;
    let row_selector = Selector::parse("tbody tr")?;
    let mut goalkeepers = vec![];
    for table in document.select(&table_selector) {
        let side = table_side(&table)?;
        for row in table.select(&row_selector) {
            let cells = row_cells(&row);
            let Some(entry) = roster_entry(&cells)? else {
                continue;
            };
            let goalkeeper = Goalkeeper {
                season: ctx.season.clone(),
                gameid: ctx.game_id,
                id: entry.id.clone(),
                name: entry.name.clone(),
                number: entry.number,
                team: ctx.team(side).to_string(),
                saves: int_value(&cell(&cells, 2))?,
                goalsagainst: int_value(&cell(&cells, 3))?,
                savepct: pct_value(&cell(&cells, 4))?,
                toi: str_value(&cell(&cells, 5)),
            };
            let mentioned = ctx.event_player(side, Some(entry.id), entry.number, &entry.name);
            ctx.names.insert(side, &entry.name, mentioned);
            goalkeepers.push(goalkeeper);
        }
    }
    debug!(
        count = goalkeepers.len(),
        game_id = ctx.game_id,
        "parsed goalkeepers"
    );
    Ok(goalkeepers)
}

pub(crate) fn parse_referees(document: &Html, ctx: &GameContext) -> Result<Vec<Referee>> {
    let row_selector = Selector::parse("table.officials tbody tr")?;
    let link_selector = Selector::parse("a")?;
    let referees: Vec<Referee> = document
        .select(&row_selector)
        .filter_map(|row| {
            let cells = row_cells(&row);
            let name = cell(&cells, 1);
            if name.is_empty() {
                return None;
            }
            let id = cells
                .get(1)
                .and_then(|c| c.select(&link_selector).next())
                .and_then(|a| a.value().attr("href"))
                .map(|href| {
                    href.strip_prefix(REFEREE_HREF_PREFIX)
                        .unwrap_or(href)
                        .trim_matches('/')
                        .to_string()
                });
            Some(Referee {
                season: ctx.season.clone(),
                gameid: ctx.game_id,
                id,
                name,
                role: cell(&cells, 0),
            })
        })
        .collect();
    debug!(count = referees.len(), game_id = ctx.game_id, "parsed referees");
    Ok(referees)
}
