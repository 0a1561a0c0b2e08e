use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{LiigaError, Result};
use crate::liiga_scraper::tables::{OVERTIME_CODE, SHOOTOUT_CODE};

static RE_CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2,3}):([0-5]\d)$").unwrap_or_else(|_| unreachable!()));

const PERIOD_SECONDS: u32 = 20 * 60;
const REGULATION_SECONDS: u32 = 3 * PERIOD_SECONDS;
const SHOOTOUT_SECONDS: u32 = 65 * 60;

/// Elapsed game time as printed in the event log, `MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct GameClock {
    seconds: u32,
}

impl GameClock {
    pub(crate) const REGULATION_END: GameClock = GameClock {
        seconds: REGULATION_SECONDS,
    };
    /// Regular-season shootout attempts are all logged at this mark.
    pub(crate) const SHOOTOUT_MARK: GameClock = GameClock {
        seconds: SHOOTOUT_SECONDS,
    };

    pub(crate) fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let caps = RE_CLOCK
            .captures(text)
            .ok_or_else(|| LiigaError::InvalidClock(text.to_string()))?;
        let minutes: u32 = caps[1].parse()?;
        let seconds: u32 = caps[2].parse()?;
        Ok(GameClock {
            seconds: minutes * 60 + seconds,
        })
    }

    pub(crate) fn looks_like_clock(text: &str) -> bool {
        RE_CLOCK.is_match(text.trim())
    }

    pub(crate) fn total_seconds(self) -> u32 {
        self.seconds
    }

    pub(crate) fn minutes(self) -> u32 {
        self.seconds / 60
    }

    /// Period label of an event at this clock.
    ///
    /// Regular season: 1, 2, 3, then `JA` for overtime and `VL` for shootout
    /// goals and attempts at the shootout mark. Playoff overtime periods are
    /// numbered onward from 4.
    pub(crate) fn period(self, shootout_event: bool, playoffs: bool) -> String {
        if playoffs {
            return (self.minutes() / 20 + 1).to_string();
        }
        match self.seconds {
            s if s <= PERIOD_SECONDS => "1".to_string(),
            s if s <= 2 * PERIOD_SECONDS => "2".to_string(),
            s if s <= REGULATION_SECONDS => "3".to_string(),
            s if s == SHOOTOUT_SECONDS && shootout_event => SHOOTOUT_CODE.to_string(),
            _ => OVERTIME_CODE.to_string(),
        }
    }
}

impl Display for GameClock {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.seconds / 60, self.seconds % 60)
    }
}
