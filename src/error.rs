use ::scraper::error::SelectorErrorKind;
use std::num::{ParseFloatError, ParseIntError};

/// All errors that can occur while scraping and classifying league pages.
#[derive(thiserror::Error, Debug)]
pub enum LiigaError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// A relative link could not be joined onto the page URL.
    #[error("invalid url {0}")]
    Url(#[from] url::ParseError),

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// Failed to parse an integer from scraped text.
    #[error("failed to parse integer: {0}")]
    IntParse(#[from] ParseIntError),

    /// Failed to parse a decimal from scraped text.
    #[error("failed to parse decimal: {0}")]
    FloatParse(#[from] ParseFloatError),

    /// Failed to parse a date from scraped text.
    #[error("failed to parse date: {0}")]
    DateParse(#[from] chrono::ParseError),

    /// A record could not be serialized.
    #[error("failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),

    /// A record could not be written to the output.
    #[error("failed to write record: {0}")]
    Io(#[from] std::io::Error),

    /// An expected HTML element was not found on the page.
    #[error("expected element not found: {context}")]
    ElementNotFound { context: &'static str },

    /// No `YYYY-YYYY` segment in a season URL.
    #[error("no season label in {0}")]
    NoSeason(String),

    /// A clock cell did not look like `MM:SS`.
    #[error("invalid game clock '{0}'")]
    InvalidClock(String),

    /// Both sides of an event row carry text.
    #[error("ambiguous event side at {clock}: home '{home}', away '{away}'")]
    AmbiguousEventSide {
        clock: String,
        home: String,
        away: String,
    },

    /// No classification rule matched an event row.
    #[error("unrecognized event at {clock}, players: {players}, side text: '{side_text}'")]
    UnrecognizedEvent {
        clock: String,
        side_text: String,
        players: String,
    },

    /// A goal annotation was not one of the known codes.
    #[error("unknown goal annotation '{0}'")]
    UnknownGoalCode(String),

    /// A rule needed a mentioned player that the row does not have.
    #[error("{kind} event at {clock} is missing a player")]
    MissingPlayer { kind: &'static str, clock: String },

    /// A free-text name did not match either roster of the game.
    #[error("name '{name}' not found in game rosters ({known})")]
    NameKeyNotFound { name: String, known: String },

    /// A team name did not resolve against the season's teams.
    #[error("team '{name}' not found (tried {chain:?}, season has {known:?})")]
    TeamNotFound {
        name: String,
        chain: Vec<String>,
        known: Vec<String>,
    },

    /// A shot tooltip appeared before any grouping block set its side.
    #[error("no location for shot at {clock}")]
    NoShotLocation { clock: String },

    /// A side-location string was neither home nor away.
    #[error("unknown location '{0}'")]
    UnknownLocation(String),

    /// Shot outcome text did not map to a known outcome.
    #[error("unknown shot outcome '{0}'")]
    UnknownShotOutcome(String),

    /// Per-period goals do not add up to the final score.
    #[error("period scores add up to {periods} but game ended {game}")]
    ScoreMismatch { periods: String, game: String },

    /// A game number would collide with the playoff id range.
    #[error("game number {number} out of range (playoffs: {playoffs})")]
    GameNumberOutOfRange { number: u32, playoffs: bool },
}

impl<'a> From<SelectorErrorKind<'a>> for LiigaError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        LiigaError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LiigaError>;
