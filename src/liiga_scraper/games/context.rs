use std::collections::{BTreeMap, HashMap};

use crate::error::{LiigaError, Result};
use crate::liiga_scraper::dom::collapse_whitespace;
use crate::liiga_scraper::games::clock::GameClock;
use crate::model::{EventPlayer, Side};

const EVENT_ID_GAME_FACTOR: u64 = 10_000_000_000;
const EVENT_ID_CLOCK_FACTOR: u64 = 100_000;
/// Shot sequence numbers start here so they never meet event numbers.
const SHOT_SEQUENCE_BASE: u32 = 50_000;

/// Natural-order join key for a roster name printed surname first:
/// `Koivu Saku` becomes `saku koivu`.
pub(crate) fn name_key(display_name: &str) -> String {
    let display_name = collapse_whitespace(display_name);
    match display_name.split_once(' ') {
        Some((surname, given)) => format!("{given} {surname}").to_lowercase(),
        None => display_name.to_lowercase(),
    }
}

/// Lookup key for a name already in natural order: `Saku Koivu`.
fn mention_key(name: &str) -> String {
    collapse_whitespace(name).to_lowercase()
}

/// Name keys of both rosters of one game. Only valid within that game.
#[derive(Debug, Clone, Default)]
pub(crate) struct NameIndex {
    sides: [BTreeMap<String, EventPlayer>; 2],
}

impl NameIndex {
    pub(crate) fn insert(&mut self, side: Side, display_name: &str, player: EventPlayer) {
        self.sides[side.index()].insert(name_key(display_name), player);
    }

    /// Look a natural-order name up on one side.
    pub(crate) fn find_on(&self, side: Side, name: &str) -> Result<&EventPlayer> {
        self.sides[side.index()]
            .get(&mention_key(name))
            .ok_or_else(|| LiigaError::NameKeyNotFound {
                name: name.to_string(),
                known: self.known(&[side]),
            })
    }

    /// Look a natural-order name up in either roster, home first.
    pub(crate) fn find(&self, name: &str) -> Result<(Side, &EventPlayer)> {
        let key = mention_key(name);
        [Side::Home, Side::Away]
            .into_iter()
            .find_map(|side| self.sides[side.index()].get(&key).map(|p| (side, p)))
            .ok_or_else(|| LiigaError::NameKeyNotFound {
                name: name.to_string(),
                known: self.known(&[Side::Home, Side::Away]),
            })
    }

    fn known(&self, sides: &[Side]) -> String {
        sides
            .iter()
            .flat_map(|side| self.sides[side.index()].keys())
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub(crate) fn len(&self) -> usize {
        self.sides.iter().map(BTreeMap::len).sum()
    }
}

/// Running state of one game's processing: team identities, the name index
/// and every counter the event and shot ids depend on. Dropped with the game.
#[derive(Debug, Clone)]
pub(crate) struct GameContext {
    pub(crate) season: String,
    pub(crate) game_id: u32,
    pub(crate) playoffs: bool,
    teams: [String; 2],
    pub(crate) names: NameIndex,
    event_sequence: u32,
    shootout_order: u32,
    shootout_side_order: [u32; 2],
    shot_sequence: HashMap<u32, u32>,
}

impl GameContext {
    pub(crate) fn new(
        season: &str,
        game_id: u32,
        playoffs: bool,
        home_team: &str,
        away_team: &str,
    ) -> Self {
        Self {
            season: season.to_string(),
            game_id,
            playoffs,
            teams: [home_team.to_string(), away_team.to_string()],
            names: NameIndex::default(),
            event_sequence: 0,
            shootout_order: 0,
            shootout_side_order: [0; 2],
            shot_sequence: HashMap::new(),
        }
    }

    pub(crate) fn team(&self, side: Side) -> &str {
        &self.teams[side.index()]
    }

    pub(crate) fn event_player(
        &self,
        side: Side,
        id: Option<String>,
        number: Option<u32>,
        name: &str,
    ) -> EventPlayer {
        EventPlayer {
            id,
            number,
            name: name.to_string(),
            team: self.team(side).to_string(),
            vsteam: self.team(side.opposite()).to_string(),
        }
    }

    fn pack_id(&self, clock: GameClock, sequence: u32) -> u64 {
        u64::from(self.game_id) * EVENT_ID_GAME_FACTOR
            + u64::from(clock.total_seconds()) * EVENT_ID_CLOCK_FACTOR
            + u64::from(sequence)
    }

    /// Id of the next accepted event. The sequence is per game, so two
    /// events at the same clock still get distinct ids.
    pub(crate) fn next_event_id(&mut self, clock: GameClock) -> u64 {
        self.event_sequence += 1;
        self.pack_id(clock, self.event_sequence)
    }

    /// Id of the next shot, numbered per clock value.
    pub(crate) fn next_shot_id(&mut self, clock: GameClock) -> u64 {
        let sequence = self.shot_sequence.entry(clock.total_seconds()).or_insert(0);
        *sequence += 1;
        let sequence = SHOT_SEQUENCE_BASE + *sequence;
        self.pack_id(clock, sequence)
    }

    /// Overall and per-team order of the next shootout attempt.
    pub(crate) fn next_shootout_order(&mut self, side: Side) -> (u32, u32) {
        self.shootout_order += 1;
        self.shootout_side_order[side.index()] += 1;
        (self.shootout_order, self.shootout_side_order[side.index()])
    }
}
