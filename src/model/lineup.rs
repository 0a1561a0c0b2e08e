use serde::Serialize;

/// A skater's box score line for one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub season: String,
    pub gameid: u32,
    pub id: String,
    pub name: String,
    pub number: Option<u32>,
    pub team: String,
    pub position: Option<String>,
    pub goals: Option<u32>,
    pub assists: Option<u32>,
    pub points: Option<u32>,
    pub penaltyminutes: Option<u32>,
    pub plus: Option<u32>,
    pub minus: Option<u32>,
    pub plusminus: Option<i32>,
    pub shots: Option<u32>,
    pub faceoffs: Option<u32>,
    pub faceoffpct: Option<f64>,
    pub toi: Option<String>,
}

/// A goalkeeper's box score line for one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goalkeeper {
    pub season: String,
    pub gameid: u32,
    pub id: String,
    pub name: String,
    pub number: Option<u32>,
    pub team: String,
    pub saves: Option<u32>,
    pub goalsagainst: Option<u32>,
    pub savepct: Option<f64>,
    pub toi: Option<String>,
}

/// An on-ice official of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Referee {
    pub season: String,
    pub gameid: u32,
    pub id: Option<String>,
    pub name: String,
    pub role: String,
}
