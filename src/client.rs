use chrono::Local;
use tracing::instrument;
use url::Url;

use crate::error::Result;
use crate::liiga_scraper::driver::{self, ScrapeOptions};
use crate::liiga_scraper::DEFAULT_BASE_URL;
use crate::model::Record;

/// The main entry point for scraping liiga.fi.
///
/// `LiigaClient` wraps a [`reqwest::Client`] and a site base URL, and exposes
/// one method per run mode. Records are handed to `emit` in output order as
/// soon as each page is parsed.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> liiga_scraper::Result<()> {
/// use chrono::NaiveDate;
/// use liiga_scraper::{LiigaClient, ScrapeOptions, SkipPolicy};
///
/// let client = LiigaClient::new();
/// let options = ScrapeOptions {
///     today: NaiveDate::from_ymd_opt(2015, 4, 1).unwrap(),
///     skip: SkipPolicy::Future,
///     keep_going: false,
/// };
/// let mut games = 0;
/// client
///     .scrape_season("/ottelut/2014-2015/runkosarja/", &options, &mut |record| {
///         if matches!(record, liiga_scraper::Record::Game(_)) {
///             games += 1;
///         }
///         Ok(())
///     })
///     .await?;
/// println!("Scraped {games} games");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LiigaClient {
    http: reqwest::Client,
    base_url: Url,
}

impl Default for LiigaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LiigaClient {
    /// Create a new client against liiga.fi with default settings.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            http: client,
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!()),
        }
    }

    /// Point the client at another host serving the same pages.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Season, teams and every played game of a regular season schedule page.
    /// `url` may be absolute or relative to the base URL.
    #[instrument(skip(self, emit))]
    pub async fn scrape_season<E>(&self, url: &str, options: &ScrapeOptions, emit: &mut E) -> Result<()>
    where
        E: FnMut(Record) -> Result<()>,
    {
        let url = self.base_url.join(url)?;
        driver::scrape_season(&self.http, url.as_str(), false, options, emit).await
    }

    /// Every played game of a playoffs schedule page.
    #[instrument(skip(self, emit))]
    pub async fn scrape_playoffs<E>(&self, url: &str, options: &ScrapeOptions, emit: &mut E) -> Result<()>
    where
        E: FnMut(Record) -> Result<()>,
    {
        let url = self.base_url.join(url)?;
        driver::scrape_season(&self.http, url.as_str(), true, options, emit).await
    }

    /// One game's detail page. `home` and `away` are team ids.
    #[instrument(skip(self, emit))]
    pub async fn scrape_game<E>(
        &self,
        season_label: &str,
        number: u32,
        home: &str,
        away: &str,
        playoffs: bool,
        emit: &mut E,
    ) -> Result<()>
    where
        E: FnMut(Record) -> Result<()>,
    {
        driver::scrape_game(
            &self.http,
            self.base(),
            season_label,
            number,
            home,
            away,
            playoffs,
            emit,
        )
        .await
    }

    /// Schedule-only games, playoffs and team season stats for seasons
    /// `from..=to`, given as ending years.
    #[instrument(skip(self, emit))]
    pub async fn scrape_history<E>(
        &self,
        from: u32,
        to: u32,
        options: &ScrapeOptions,
        emit: &mut E,
    ) -> Result<()>
    where
        E: FnMut(Record) -> Result<()>,
    {
        driver::scrape_history(&self.http, self.base(), from, to, options, emit).await
    }

    /// Player season lines for every season and team on record.
    #[instrument(skip(self, emit))]
    pub async fn scrape_player_stats<E>(&self, emit: &mut E) -> Result<()>
    where
        E: FnMut(Record) -> Result<()>,
    {
        driver::scrape_player_stats(&self.http, self.base(), emit).await
    }

    /// Player time on ice of one season, after a timestamp record.
    #[instrument(skip(self, emit))]
    pub async fn scrape_player_times<E>(&self, season_id: u32, emit: &mut E) -> Result<()>
    where
        E: FnMut(Record) -> Result<()>,
    {
        let now = Local::now().naive_local();
        driver::scrape_player_times(&self.http, self.base(), season_id, now, emit).await
    }

    /// Team power-play and short-handed tables of one season, after a
    /// timestamp record.
    #[instrument(skip(self, emit))]
    pub async fn scrape_team_times<E>(&self, season_id: u32, emit: &mut E) -> Result<()>
    where
        E: FnMut(Record) -> Result<()>,
    {
        let now = Local::now().naive_local();
        driver::scrape_team_times(&self.http, self.base(), season_id, now, emit).await
    }
}
