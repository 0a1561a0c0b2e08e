use std::collections::BTreeMap;

use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::error::Result;
use crate::liiga_scraper::dom::full_text;
use crate::liiga_scraper::row_cells;
use crate::liiga_scraper::season::TeamDirectory;
use crate::liiga_scraper::stats::stat_rows;
use crate::liiga_scraper::values::count_value;
use crate::model::{Season, TeamStat};

/// The team tables merged into one `teamstat` record per team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TeamStatPage {
    Attendance,
    PenaltyMinutes,
    PowerPlayGoals,
}

impl TeamStatPage {
    pub(crate) const ALL: [TeamStatPage; 3] = [
        TeamStatPage::Attendance,
        TeamStatPage::PenaltyMinutes,
        TeamStatPage::PowerPlayGoals,
    ];

    pub(crate) fn stats_type(self) -> &'static str {
        match self {
            TeamStatPage::Attendance => "yleisomaara",
            TeamStatPage::PenaltyMinutes => "rangaistukset",
            TeamStatPage::PowerPlayGoals => "ylivoima",
        }
    }

    /// Candidate cells, first non-zero wins. Attendance falls back to the
    /// last column.
    fn value(self, cells: &[scraper::ElementRef]) -> Result<Option<u32>> {
        let candidates: Vec<String> = match self {
            TeamStatPage::Attendance => [cells.get(4), cells.last()]
                .into_iter()
                .flatten()
                .map(full_text)
                .collect(),
            TeamStatPage::PenaltyMinutes => {
                let strong = Selector::parse("strong")?;
                cells
                    .get(9)
                    .and_then(|c| c.select(&strong).next())
                    .map(|s| full_text(&s))
                    .into_iter()
                    .collect()
            }
            TeamStatPage::PowerPlayGoals => cells.get(4).map(full_text).into_iter().collect(),
        };
        for candidate in candidates {
            if let Some(value) = count_value(&candidate)?.filter(|v| *v != 0) {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn store(self, stat: &mut TeamStat, value: Option<u32>) {
        match self {
            TeamStatPage::Attendance => stat.attendance = value,
            TeamStatPage::PenaltyMinutes => stat.minutes = value,
            TeamStatPage::PowerPlayGoals => stat.ppgoals = value,
        }
    }
}

/// Merge one team table into `stats`, keyed by team id. Rows whose team does
/// not resolve against the season are skipped with a warning.
pub(crate) fn merge_team_stat_page(
    document: &Html,
    page: TeamStatPage,
    season: &Season,
    teams: &TeamDirectory,
    stats: &mut BTreeMap<String, TeamStat>,
) -> Result<()> {
    let name_selector = Selector::parse("td.ta-l")?;
    let rows = stat_rows(document)?;
    for row in &rows {
        let Some(name) = row.select(&name_selector).next().map(|td| full_text(&td)) else {
            continue;
        };
        let team = match teams.resolve(&name) {
            Ok(team) => team,
            Err(e) => {
                warn!(error = %e, page = page.stats_type(), "skipping team stat row");
                continue;
            }
        };
        let value = page.value(&row_cells(row))?;
        let stat = stats.entry(team.id.clone()).or_insert_with(|| TeamStat {
            season: season.years.clone(),
            team: team.id.clone(),
            ..TeamStat::default()
        });
        page.store(stat, value);
    }
    debug!(count = rows.len(), page = page.stats_type(), "merged team stats");
    Ok(())
}
