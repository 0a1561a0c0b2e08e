use scraper::{Html, Selector};
use tracing::debug;

use crate::error::{LiigaError, Result};
use crate::liiga_scraper::dom::full_text;
use crate::liiga_scraper::stats::{cell_text, stat_rows};
use crate::liiga_scraper::tables::TOTAL_LABEL;
use crate::liiga_scraper::values::{int_value, pct_value, required_int, signed_value, str_value};
use crate::liiga_scraper::{player_id, row_cells};
use crate::model::{PlayerStats, Team};

/// Archive page listing every season in its season selector.
pub(crate) const SEASONS_PATH: &str = "/tilastot/kaikki/runkosarja/pelaajat/";

/// Player stats of one team, regular season or playoffs.
pub(crate) fn player_stats_url(base: &str, season_label: &str, playoffs: bool, team: &str) -> String {
    let serie = if playoffs { "playoffs" } else { "runkosarja" };
    format!(
        "{}/tilastot/{season_label}/{serie}/pelaajat/?team={team}&position=all&player_stats=players&sort=P",
        base.trim_end_matches('/')
    )
}

/// `YYYY-YYYY` values of the season selector.
pub(crate) fn parse_stat_seasons(document: &Html) -> Result<Vec<String>> {
    let option_selector = Selector::parse("select[name='season'] option")?;
    Ok(document
        .select(&option_selector)
        .filter_map(|o| o.value().attr("value"))
        .filter(|v| v.contains('-'))
        .map(str::to_string)
        .collect())
}

/// Rows of `team` from a player stats table.
///
/// A player who played for several teams gets one row per team under a
/// single name link, so rows without a link belong to the player above.
/// The total row and rows of other teams are skipped.
pub(crate) fn parse_player_stats(
    document: &Html,
    season_label: &str,
    playoffs: bool,
    team: &Team,
) -> Result<Vec<PlayerStats>> {
    let link_selector = Selector::parse("td.ta-l a")?;
    let mut current: Option<(String, String)> = None;
    let mut position = None;
    let mut players = vec![];

    for row in stat_rows(document)? {
        if let Some(link) = row.select(&link_selector).next() {
            current = Some((
                player_id(link.value().attr("href").unwrap_or_default()),
                full_text(&link),
            ));
            position = None;
        }
        let cells = row_cells(&row);
        let team_name = cell_text(&cells, 2);
        if team_name == TOTAL_LABEL || team_name != team.name {
            continue;
        }
        let (playerid, playername) = current.clone().ok_or(LiigaError::ElementNotFound {
            context: "player link before stats row",
        })?;
        if let Some(p) = str_value(&cell_text(&cells, 3)) {
            position = Some(p);
        }

        players.push(PlayerStats {
            playerid,
            playername,
            season: season_label.to_string(),
            playoffs,
            team: team.id.clone(),
            position: position.clone(),
            games: required_int(&cell_text(&cells, 4))?,
            goals: required_int(&cell_text(&cells, 5))?,
            assists: required_int(&cell_text(&cells, 6))?,
            points: required_int(&cell_text(&cells, 7))?,
            penalties: required_int(&cell_text(&cells, 8))?,
            plus: int_value(&cell_text(&cells, 9))?,
            minus: int_value(&cell_text(&cells, 10))?,
            plusminus: signed_value(&cell_text(&cells, 11))?,
            ppgoals: int_value(&cell_text(&cells, 12))?,
            shgoals: int_value(&cell_text(&cells, 13))?,
            wingoals: int_value(&cell_text(&cells, 14))?,
            shots: int_value(&cell_text(&cells, 15))?,
            shotpct: pct_value(&cell_text(&cells, 16))?,
            faceoffs: int_value(&cell_text(&cells, 17))?,
            faceoffpct: pct_value(&cell_text(&cells, 18))?,
            playtime: str_value(&cell_text(&cells, 19)),
        });
    }
    debug!(count = players.len(), team = %team.id, season = season_label, playoffs, "parsed player stats");
    Ok(players)
}
