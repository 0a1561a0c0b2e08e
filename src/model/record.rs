use serde::Serialize;

use super::{
    Game, GameEvent, GameStats, Goalkeeper, Period, Player, PlayerStats, PlayerTimeStats, Referee,
    Season, SpecialTeamsStats, Team, TeamStat, Timestamp,
};
use crate::error::Result;

/// One output record, discriminated by its `type` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Season(Season),
    Team(Team),
    Game(Game),
    Player(Player),
    Goalkeeper(Goalkeeper),
    Referee(Referee),
    #[serde(rename = "gameevent")]
    GameEvent(GameEvent),
    Period(Period),
    #[serde(rename = "gamestats")]
    GameStats(GameStats),
    #[serde(rename = "teamstat")]
    TeamStat(TeamStat),
    #[serde(rename = "playerstats")]
    PlayerStats(PlayerStats),
    #[serde(rename = "playertimestats")]
    PlayerTimeStats(PlayerTimeStats),
    #[serde(rename = "teamppstats")]
    TeamPowerPlay(SpecialTeamsStats),
    #[serde(rename = "teamshstats")]
    TeamShortHanded(SpecialTeamsStats),
    Timestamp(Timestamp),
}

impl Record {
    /// The record as a single JSON line with keys sorted at every level.
    pub fn to_json_line(&self) -> Result<String> {
        let value = serde_json::to_value(self)?;
        Ok(serde_json::to_string(&value)?)
    }
}
