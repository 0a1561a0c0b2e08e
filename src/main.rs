use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use url::Url;

use liiga_scraper::{LiigaClient, Record};

mod cli;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only records.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.timeout_secs))
        .build()
        .context("failed to build http client")?;
    let base_url = Url::parse(&cli.base_url)
        .with_context(|| format!("invalid base url {}", cli.base_url))?;
    let client = LiigaClient::with_client(http).with_base_url(base_url);

    let mut stdout = io::stdout().lock();
    let mut written = 0usize;
    let mut emit = |record: Record| -> liiga_scraper::Result<()> {
        writeln!(stdout, "{}", record.to_json_line()?)?;
        written += 1;
        Ok(())
    };

    let result = match &cli.command {
        Command::Season { url, skip_today } => {
            client
                .scrape_season(url, &cli.options(*skip_today), &mut emit)
                .await
        }
        Command::Playoffs { url, skip_today } => {
            client
                .scrape_playoffs(url, &cli.options(*skip_today), &mut emit)
                .await
        }
        Command::Game {
            season,
            number,
            home,
            away,
            playoffs,
        } => {
            client
                .scrape_game(season, *number, home, away, *playoffs, &mut emit)
                .await
        }
        Command::History { from, to } => {
            client
                .scrape_history(*from, cli.history_end(*to), &cli.options(false), &mut emit)
                .await
        }
        Command::PlayerStats => client.scrape_player_stats(&mut emit).await,
        Command::PlayerTimes { season } => client.scrape_player_times(*season, &mut emit).await,
        Command::TeamTimes { season } => client.scrape_team_times(*season, &mut emit).await,
    };
    result.context("scrape failed")?;

    info!(records = written, "done");
    Ok(())
}
