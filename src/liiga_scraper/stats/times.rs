use scraper::{Html, Selector};
use tracing::debug;

use crate::error::Result;
use crate::liiga_scraper::dom::full_text;
use crate::liiga_scraper::stats::{cell_text, stat_rows};
use crate::liiga_scraper::values::required_int;
use crate::liiga_scraper::{player_id, row_cells};
use crate::model::{PlayerTimeStats, Record, SpecialTeamsStats, SpecialTeamsTimes};

pub(crate) fn player_times_url(base: &str, season_label: &str) -> String {
    format!(
        "{}/tilastot/{season_label}/runkosarja/pelaajat/?team=&position=all&home_away=&player_stats=time_on_ice&sort=O",
        base.trim_end_matches('/')
    )
}

/// Time on ice per player. Rows without a player link are skipped.
pub(crate) fn parse_player_times(document: &Html, season: u32) -> Result<Vec<PlayerTimeStats>> {
    let link_selector = Selector::parse("td.ta-l a")?;
    let mut players = vec![];
    for row in stat_rows(document)? {
        let Some(link) = row.select(&link_selector).next() else {
            continue;
        };
        let cells = row_cells(&row);
        let cell = |i| cell_text(&cells, i);
        players.push(PlayerTimeStats {
            season,
            id: player_id(link.value().attr("href").unwrap_or_default()),
            name: full_text(&link),
            team: cell(2),
            position: cell(3),
            games: required_int(&cell(4))?,
            avgtime: cell(5),
            shifts: required_int(&cell(6))?,
            pptime: cell(7),
            pp2time: cell(8),
            shtime: cell(9),
            sh2time: cell(10),
            p1time: cell(11),
            p2time: cell(12),
            p3time: cell(13),
        });
    }
    debug!(count = players.len(), season, "parsed player times");
    Ok(players)
}

/// Power-play or short-handed team table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpecialTeams {
    PowerPlay,
    ShortHanded,
}

impl SpecialTeams {
    pub(crate) fn stats_type(self) -> &'static str {
        match self {
            SpecialTeams::PowerPlay => "ylivoima",
            SpecialTeams::ShortHanded => "alivoima",
        }
    }

    fn times(self, time: String, time2: String) -> SpecialTeamsTimes {
        match self {
            SpecialTeams::PowerPlay => SpecialTeamsTimes::PowerPlay {
                pptime: time,
                pp2time: time2,
            },
            SpecialTeams::ShortHanded => SpecialTeamsTimes::ShortHanded {
                shtime: time,
                sh2time: time2,
            },
        }
    }

    pub(crate) fn record(self, stats: SpecialTeamsStats) -> Record {
        match self {
            SpecialTeams::PowerPlay => Record::TeamPowerPlay(stats),
            SpecialTeams::ShortHanded => Record::TeamShortHanded(stats),
        }
    }
}

pub(crate) fn parse_special_teams(
    document: &Html,
    season: u32,
    kind: SpecialTeams,
) -> Result<Vec<SpecialTeamsStats>> {
    let teams = stat_rows(document)?
        .iter()
        .map(|row| {
            let cells = row_cells(row);
            let cell = |i| cell_text(&cells, i);
            Ok(SpecialTeamsStats {
                season,
                team: cell(1),
                ppnum: required_int(&cell(2))?,
                ppgoals: required_int(&cell(4))?,
                shgoals: required_int(&cell(5))?,
                pp2num: required_int(&cell(8))?,
                pp2goals: required_int(&cell(10))?,
                sh2goals: required_int(&cell(11))?,
                times: kind.times(cell(3), cell(9)),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(count = teams.len(), season, kind = kind.stats_type(), "parsed special teams");
    Ok(teams)
}
