use std::str::FromStr;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{LiigaError, Result};
use crate::liiga_scraper::dom::parenthesized;
use crate::liiga_scraper::games::clock::GameClock;
use crate::liiga_scraper::games::context::GameContext;
use crate::liiga_scraper::games::lineup::parse_side;
use crate::liiga_scraper::games::periods::period_label;
use crate::liiga_scraper::select_text;
use crate::liiga_scraper::tables::SHOT_OUTCOMES;
use crate::model::{EventKind, GameEvent, Shot, ShotResult, Side};

/// Context set by the most recent grouping block of the shot map.
#[derive(Debug, Default)]
struct ShotGroup {
    location: Option<Side>,
    period: Option<String>,
    category: Option<String>,
}

impl ShotGroup {
    fn update(&mut self, block: &ElementRef) -> Result<()> {
        let attr = |name| {
            block
                .value()
                .attr(name)
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };
        if let Some(location) = attr("data-location") {
            self.location = Some(parse_side(location)?);
        }
        if let Some(period) = attr("data-period") {
            self.period = Some(period_label(period));
        }
        if let Some(category) = attr("data-category") {
            self.category = Some(category.to_lowercase());
        }
        Ok(())
    }
}

struct TooltipSelectors {
    time: Selector,
    player: Selector,
    result: Selector,
}

fn shot_result(text: &str, category: Option<&str>) -> Result<ShotResult> {
    let lower = text.to_lowercase();
    SHOT_OUTCOMES
        .iter()
        .find(|(prefix, _)| lower.starts_with(prefix))
        .map(|(_, result)| *result)
        .or_else(|| category.and_then(|c| ShotResult::from_str(c).ok()))
        .ok_or_else(|| LiigaError::UnknownShotOutcome(text.to_string()))
}

fn parse_tooltip(
    tooltip: &ElementRef,
    group: &ShotGroup,
    selectors: &TooltipSelectors,
    ctx: &mut GameContext,
) -> Result<GameEvent> {
    let clock = GameClock::parse(&select_text(tooltip, &selectors.time))?;
    let location = group.location.ok_or_else(|| LiigaError::NoShotLocation {
        clock: clock.to_string(),
    })?;

    let (_, shooter) = ctx.names.find(&select_text(tooltip, &selectors.player))?;
    let shooter = shooter.clone();

    let result_text = select_text(tooltip, &selectors.result);
    let result = shot_result(&result_text, group.category.as_deref())?;
    let blocker = match result {
        ShotResult::Blocked => {
            let name = parenthesized(&result_text).ok_or_else(|| LiigaError::MissingPlayer {
                kind: "blocked shot",
                clock: clock.to_string(),
            })?;
            Some(ctx.names.find_on(location.opposite(), name)?.clone())
        }
        _ => None,
    };

    Ok(GameEvent {
        id: ctx.next_shot_id(clock),
        season: ctx.season.clone(),
        gameid: ctx.game_id,
        time: clock.to_string(),
        team: ctx.team(location).to_string(),
        vsteam: ctx.team(location.opposite()).to_string(),
        period: group
            .period
            .clone()
            .unwrap_or_else(|| clock.period(false, ctx.playoffs)),
        side: location,
        kind: EventKind::Shot(Shot {
            shooter,
            result,
            blocker,
            category: group.category.clone(),
        }),
    })
}

/// Shot events of the shot map overlay, in document order. Grouping blocks
/// set the side, period and category for the tooltips that follow them.
pub(crate) fn parse_shots(document: &Html, ctx: &mut GameContext) -> Result<Vec<GameEvent>> {
    let block_selector =
        Selector::parse("div.shotmap div.sm-group, div.shotmap div.sm-tooltip")?;
    let selectors = TooltipSelectors {
        time: Selector::parse("span.sm-time")?,
        player: Selector::parse("span.sm-player")?,
        result: Selector::parse("span.sm-result")?,
    };

    let mut group = ShotGroup::default();
    let mut shots = vec![];
    for block in document.select(&block_selector) {
        if block.value().classes().any(|c| c == "sm-group") {
            group.update(&block)?;
        } else {
            shots.push(parse_tooltip(&block, &group, &selectors, ctx)?);
        }
    }
    debug!(count = shots.len(), game_id = ctx.game_id, "parsed shots");
    Ok(shots)
}
