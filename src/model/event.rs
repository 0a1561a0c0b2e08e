use serde::Serialize;
use strum_macros::EnumString;

use super::game::Side;

/// A player as mentioned by an in-game event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventPlayer {
    pub id: Option<String>,
    pub number: Option<u32>,
    pub name: String,
    pub team: String,
    pub vsteam: String,
}

/// A timestamped in-game occurrence, or a shot from the shot map.
///
/// `id` packs the game id, the clock in seconds and a sequence number:
/// `gameid * 10^10 + seconds * 10^5 + seq`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameEvent {
    pub id: u64,
    pub season: String,
    pub gameid: u32,
    pub time: String,
    pub team: String,
    pub vsteam: String,
    pub period: String,
    pub side: Side,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Kind-specific payload of a [`GameEvent`], tagged by `eventtype`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "eventtype", rename_all = "lowercase")]
pub enum EventKind {
    Goal(Goal),
    Penalty(Penalty),
    Timeout,
    GoalkeeperOut(GoalkeeperChange),
    GoalkeeperIn(GoalkeeperChange),
    GoalkeeperChange(GoalkeeperChange),
    VideoCheck,
    PenaltyShot(PenaltyShot),
    Shot(Shot),
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Goal(_) => "goal",
            EventKind::Penalty(_) => "penalty",
            EventKind::Timeout => "timeout",
            EventKind::GoalkeeperOut(_) => "goalkeeperout",
            EventKind::GoalkeeperIn(_) => "goalkeeperin",
            EventKind::GoalkeeperChange(_) => "goalkeeperchange",
            EventKind::VideoCheck => "videocheck",
            EventKind::PenaltyShot(_) => "penaltyshot",
            EventKind::Shot(_) => "shot",
        }
    }

    /// Goals and penalty shots at the shootout mark belong to the shootout.
    pub fn counts_in_shootout(&self) -> bool {
        matches!(self, EventKind::Goal(_) | EventKind::PenaltyShot(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Goal {
    pub scorer: EventPlayer,
    pub assist1: Option<EventPlayer>,
    pub assist2: Option<EventPlayer>,
    pub score: Option<String>,
    pub goalattr: String,
    pub goalkeeper: Option<EventPlayer>,
    pub psorder: Option<u32>,
    pub psteamorder: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Penalty {
    pub player: Option<EventPlayer>,
    pub boxed: Option<EventPlayer>,
    pub minutes: u32,
    pub reason: String,
    pub reasoncategory: Option<PenaltyCategory>,
    pub teampenalty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalkeeperChange {
    pub goalkeeperout: Option<EventPlayer>,
    pub goalkeeperin: Option<EventPlayer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PenaltyShot {
    pub player: EventPlayer,
    pub result: PenaltyShotResult,
    pub goalkeeper: Option<EventPlayer>,
    pub psorder: Option<u32>,
    pub psteamorder: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PenaltyShotResult {
    #[serde(rename = "goal")]
    Goal,
    #[serde(rename = "no goal")]
    NoGoal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shot {
    pub shooter: EventPlayer,
    pub result: ShotResult,
    pub blocker: Option<EventPlayer>,
    pub category: Option<String>,
}

/// Outcome of a shot on the shot map.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShotResult {
    Miss,
    Save,
    Goal,
    Blocked,
}

/// Canonical category of a penalty reason keyword.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PenaltyCategory {
    Hooking,
    Slashing,
    HighStick,
    Tripping,
    Boarding,
    PuckCovering,
    DelayOfGame,
    Holding,
    ThrowingStick,
}
