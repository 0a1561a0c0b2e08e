//! Static reference data: team renames, goal annotation codes, penalty
//! keywords, event text markers and stat-row labels.

use crate::model::{PenaltyCategory, ShotResult};

/// Team names mapped to the name the team carried in an earlier season.
/// Resolution follows the chain until a name of the current season is found.
pub(crate) const TEAM_ALIASES: &[(&str, &str)] = &[
    ("Pelicans", "Kiekkoreipas"),
    ("Kiekkoreipas", "Hockey-Reipas"),
    ("Hockey-Reipas", "Reipas"),
    ("JYP", "JyP HT"),
    ("Blues", "Kiekko-Espoo"),
    ("FPS", "FoPS"),
    ("Jokipojat", "JoKP"),
];

pub(crate) fn previous_team_name(name: &str) -> Option<&'static str> {
    TEAM_ALIASES
        .iter()
        .find(|(current, _)| *current == name)
        .map(|(_, previous)| *previous)
}

/// Goal annotation codes accepted in a goal's trailing text.
pub(crate) const GOAL_CODES: &[&str] = &[
    "YV", "YV2", "AV", "AV2", "VT", "VM", "TM", "TV", "IM", "SR", "RL",
];

/// Appended to goals scored after regulation.
pub(crate) const OVERTIME_CODE: &str = "JA";
/// The only annotation of a shootout goal.
pub(crate) const SHOOTOUT_CODE: &str = "VL";

/// Penalty reason keywords. Matched as substrings of the offender's
/// trailing text, first entry wins.
pub(crate) const PENALTY_KEYWORDS: &[(&str, PenaltyCategory)] = &[
    ("koukkaaminen", PenaltyCategory::Hooking),
    ("huitominen", PenaltyCategory::Slashing),
    ("korkea maila", PenaltyCategory::HighStick),
    ("kampitus", PenaltyCategory::Tripping),
    ("laitataklaus", PenaltyCategory::Boarding),
    ("kiekon sulkeminen", PenaltyCategory::PuckCovering),
    ("pelin viivytt", PenaltyCategory::DelayOfGame),
    ("kiinnipit", PenaltyCategory::Holding),
    ("heitto", PenaltyCategory::ThrowingStick),
];

pub(crate) fn penalty_category(text: &str) -> Option<PenaltyCategory> {
    let text = text.to_lowercase();
    PENALTY_KEYWORDS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, category)| *category)
}

/// Word that separates a penalty's duration from its reason: `2 min kampitus`.
pub(crate) const DURATION_MARKER: &str = "min";

pub(crate) const TEAM_PENALTY_MARKER: &str = "Joukkuerangaistus";

/// Suffixes dropped from a penalty reason.
pub(crate) const PENALTY_REASON_SUFFIXES: &[&str] = &["käytösrangaistus", "ottelurangaistus"];

// Event markers, compared against lowercased side text.
pub(crate) const TIMEOUT_MARKER: &str = "aikalis";
pub(crate) const GOALKEEPER_OUT_MARKER: &str = "maalivahti ulos";
pub(crate) const GOALKEEPER_IN_MARKER: &str = "maalivahti sis";
pub(crate) const GOALKEEPER_SWAP_MARKER: &str = "maalivahdin vaihto";
pub(crate) const VIDEO_CHECK_MARKER: &str = "videotarkistus - ei maalia";
pub(crate) const PENALTY_SHOT_MISS_MARKER: &str = "rangaistuslaukaus - ei maalia";
pub(crate) const GOALKEEPER_LEAVES_WORD: &str = "ulos";
pub(crate) const GOALKEEPER_ENTERS_WORD: &str = "sis";

/// Shootout attempt results, in the attempt's trailing text.
pub(crate) const NO_GOAL_TEXT: &str = "ei maalia";
pub(crate) const GOAL_TEXT: &str = "maali";

/// Opens the opposing goalkeeper's cell on a shootout row.
pub(crate) const GOALKEEPER_MARKER: &str = "MV";

/// Label of the total pseudo-row or pseudo-column of stat tables.
pub(crate) const TOTAL_LABEL: &str = "Yht.";

/// Counters of the per-period game stats table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatField {
    Score,
    Shots,
    Saved,
    Blocked,
    Missed,
    Faceoffs,
    PenaltyMinutes,
}

pub(crate) const STAT_ROW_LABELS: &[(&str, StatField)] = &[
    ("Maalit", StatField::Score),
    ("Laukaukset", StatField::Shots),
    ("Torjunnat", StatField::Saved),
    ("Blokatut", StatField::Blocked),
    ("Ohi", StatField::Missed),
    ("Aloitusvoitot", StatField::Faceoffs),
    ("Jäähyminuutit", StatField::PenaltyMinutes),
];

pub(crate) fn stat_field(label: &str) -> Option<StatField> {
    STAT_ROW_LABELS
        .iter()
        .find(|(l, _)| l.eq_ignore_ascii_case(label.trim()))
        .map(|(_, field)| *field)
}

/// Shot map outcome labels, matched as a prefix of the tooltip result.
pub(crate) const SHOT_OUTCOMES: &[(&str, ShotResult)] = &[
    ("maali", ShotResult::Goal),
    ("torjunta", ShotResult::Save),
    ("torjuttu", ShotResult::Save),
    ("ohi", ShotResult::Miss),
    ("blokattu", ShotResult::Blocked),
    ("blokki", ShotResult::Blocked),
];
