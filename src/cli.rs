use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use liiga_scraper::{ScrapeOptions, SkipPolicy};

/// Scrape liiga.fi seasons, games and statistics into NDJSON on stdout
#[derive(Parser, Debug, Clone)]
#[command(name = "liiga-scraper", version, about)]
pub struct Cli {
    /// Site base URL
    #[arg(long, env = "LIIGA_BASE_URL", default_value = "https://liiga.fi", global = true)]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "LIIGA_TIMEOUT_SECS", default_value = "30", global = true)]
    pub timeout_secs: u64,

    /// Log a failing game or season and continue instead of aborting
    #[arg(long, global = true)]
    pub keep_going: bool,

    /// Treat this date as today when deciding which games are played (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Season, teams and every played game of a regular season schedule page
    Season {
        /// Schedule page URL, e.g. https://liiga.fi/ottelut/2014-2015/runkosarja/
        url: String,
        /// Also skip games dated today, which may still be running
        #[arg(long)]
        skip_today: bool,
    },
    /// Every played game of a playoffs schedule page
    Playoffs {
        /// Schedule page URL, e.g. https://liiga.fi/ottelut/2014-2015/playoffs/
        url: String,
        /// Also skip games dated today, which may still be running
        #[arg(long)]
        skip_today: bool,
    },
    /// One game's detail page
    Game {
        /// Season label, e.g. 2014-2015
        season: String,
        /// Game number within the season or playoffs
        number: u32,
        /// Home team id
        home: String,
        /// Away team id
        away: String,
        #[arg(long)]
        playoffs: bool,
    },
    /// Schedule-only games, playoffs and team stats for a range of seasons
    History {
        /// First season, as its ending year
        #[arg(long, default_value = "1976")]
        from: u32,
        /// Last season, as its ending year (default: the current year)
        #[arg(long)]
        to: Option<u32>,
    },
    /// Player season stats for every season and team
    PlayerStats,
    /// Player time on ice for one season
    PlayerTimes {
        /// Season ending year, e.g. 2015
        season: u32,
    },
    /// Team power-play and short-handed tables for one season
    TeamTimes {
        /// Season ending year, e.g. 2015
        season: u32,
    },
}

impl Cli {
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn options(&self, skip_today: bool) -> ScrapeOptions {
        ScrapeOptions {
            today: self.today(),
            skip: if skip_today {
                SkipPolicy::TodayOrLater
            } else {
                SkipPolicy::Future
            },
            keep_going: self.keep_going,
        }
    }

    /// Last season of a history run.
    pub fn history_end(&self, to: Option<u32>) -> u32 {
        to.unwrap_or_else(|| self.today().year().unsigned_abs())
    }
}
