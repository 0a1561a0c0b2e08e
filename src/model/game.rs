use chrono::NaiveDate;
use serde::Serialize;
use strum_macros::EnumString;

/// Which side of the rink a record belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Side::Home => 0,
            Side::Away => 1,
        }
    }
}

/// Score, points and team of one side of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSide {
    pub score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u8>,
    pub team: String,
}

/// A played game. `id` is `season * 1000 + number`, plus 900 for playoff games.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub id: u32,
    pub number: u32,
    pub identifier: String,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub season: String,
    pub playoffs: bool,
    pub home: GameSide,
    pub away: GameSide,
    pub score: String,
    pub resultattr: String,
    pub endtime: Option<String>,
    pub periods: Option<String>,
    pub attendance: Option<u32>,
}
