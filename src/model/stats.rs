use serde::Serialize;

/// Home or away counters of one period, or of a whole game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SideCounters {
    pub score: u32,
    pub shots: u32,
    pub saved: u32,
    pub blocked: u32,
    pub missed: u32,
    pub faceoffs: u32,
    pub penaltyminutes: u32,
}

impl SideCounters {
    pub(crate) fn add(&mut self, other: &SideCounters) {
        self.score += other.score;
        self.shots += other.shots;
        self.saved += other.saved;
        self.blocked += other.blocked;
        self.missed += other.missed;
        self.faceoffs += other.faceoffs;
        self.penaltyminutes += other.penaltyminutes;
    }
}

/// Per-period aggregates, with the score as it stood after the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    pub season: String,
    pub gameid: u32,
    pub period: String,
    pub home: SideCounters,
    pub away: SideCounters,
    pub runningscore: String,
}

/// Whole-game aggregates accumulated from the period rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    pub season: String,
    pub gameid: u32,
    pub home: SideCounters,
    pub away: SideCounters,
    pub score: String,
}

/// Season totals of a team merged from several stat pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamStat {
    pub season: String,
    pub team: String,
    pub attendance: Option<u32>,
    pub minutes: Option<u32>,
    pub ppgoals: Option<u32>,
}

/// A player's season line for one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub playerid: String,
    pub playername: String,
    pub season: String,
    pub playoffs: bool,
    pub team: String,
    pub position: Option<String>,
    pub games: u32,
    pub goals: u32,
    pub assists: u32,
    pub points: u32,
    pub penalties: u32,
    pub plus: Option<u32>,
    pub minus: Option<u32>,
    pub plusminus: Option<i32>,
    pub ppgoals: Option<u32>,
    pub shgoals: Option<u32>,
    pub wingoals: Option<u32>,
    pub shots: Option<u32>,
    pub shotpct: Option<f64>,
    pub faceoffs: Option<u32>,
    pub faceoffpct: Option<f64>,
    pub playtime: Option<String>,
}

/// A player's season time-on-ice breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerTimeStats {
    pub season: u32,
    pub id: String,
    pub name: String,
    pub team: String,
    pub position: String,
    pub games: u32,
    pub avgtime: String,
    pub shifts: u32,
    pub pptime: String,
    pub pp2time: String,
    pub shtime: String,
    pub sh2time: String,
    pub p1time: String,
    pub p2time: String,
    pub p3time: String,
}

/// A team's power-play or short-handed season line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecialTeamsStats {
    pub season: u32,
    pub team: String,
    pub ppnum: u32,
    pub ppgoals: u32,
    pub shgoals: u32,
    pub pp2num: u32,
    pub pp2goals: u32,
    pub sh2goals: u32,
    #[serde(flatten)]
    pub times: SpecialTeamsTimes,
}

/// Time columns, named after the table they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SpecialTeamsTimes {
    PowerPlay { pptime: String, pp2time: String },
    ShortHanded { shtime: String, sh2time: String },
}

/// Marks when a stat stream was scraped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timestamp {
    pub timestamp: String,
    pub season: u32,
}
