use std::collections::BTreeSet;

use scraper::{Html, Selector};
use tracing::debug;

use crate::error::{LiigaError, Result};
use crate::liiga_scraper::dom::full_text;
use crate::liiga_scraper::tables::previous_team_name;
use crate::model::{Season, Team};

/// Find the `YYYY-YYYY` segment of a season page URL.
pub(crate) fn season_from_url(url: &str, playoffs: bool) -> Result<Season> {
    url.split('/')
        .filter(|p| p.starts_with("19") || p.starts_with("20"))
        .find_map(|p| Season::from_label(p, playoffs))
        .ok_or_else(|| LiigaError::NoSeason(url.to_string()))
}

/// Teams listed in a page's team selector. The empty "all teams" option is skipped.
pub(crate) fn parse_teams(document: &Html, season: &Season) -> Result<Vec<Team>> {
    let option_selector = Selector::parse("select[name='team'] option")?;
    let teams: Vec<Team> = document
        .select(&option_selector)
        .filter_map(|option| {
            let id = option.value().attr("value")?.trim();
            (!id.is_empty()).then(|| Team {
                id: id.to_string(),
                name: full_text(&option),
                season: season.years.clone(),
            })
        })
        .collect();
    debug!(count = teams.len(), season = %season.years, "parsed teams");
    Ok(teams)
}

/// The teams of one season, looked up by display name.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    teams: Vec<Team>,
}

impl TeamDirectory {
    pub fn new(teams: Vec<Team>) -> Self {
        Self { teams }
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    fn by_name(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    /// Resolve a display name against this season, following the chain of
    /// earlier names a team has carried until one of this season matches.
    pub fn resolve(&self, name: &str) -> Result<&Team> {
        let name = name.trim();
        let mut chain = vec![name.to_string()];
        let mut seen = BTreeSet::from([name]);
        let mut current = name;
        loop {
            if let Some(team) = self.by_name(current) {
                return Ok(team);
            }
            match previous_team_name(current) {
                Some(previous) if seen.insert(previous) => {
                    chain.push(previous.to_string());
                    current = previous;
                }
                _ => break,
            }
        }
        Err(LiigaError::TeamNotFound {
            name: name.to_string(),
            chain,
            known: self.teams.iter().map(|t| t.name.clone()).collect(),
        })
    }
}
