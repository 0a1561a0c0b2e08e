//! Classification of event log rows.
//!
//! Each row has a home cell, a clock cell and an away cell. Exactly one side
//! cell carries the event; its markup is scanned for an emphasis element
//! (the scoring line of a goal), `#NN` jersey badges and player links with
//! their trailing text. Badges and links are zipped into mentioned players,
//! and the ordered [`RULES`] decide the event kind: the first rule whose
//! predicate holds builds the event.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{LiigaError, Result};
use crate::liiga_scraper::dom::{full_text, lead_text, parenthesized, tail_text};
use crate::liiga_scraper::games::clock::GameClock;
use crate::liiga_scraper::games::context::GameContext;
use crate::liiga_scraper::tables::{
    penalty_category, DURATION_MARKER, GOALKEEPER_ENTERS_WORD, GOALKEEPER_IN_MARKER,
    GOALKEEPER_LEAVES_WORD, GOALKEEPER_MARKER, GOALKEEPER_OUT_MARKER, GOALKEEPER_SWAP_MARKER,
    GOAL_CODES, GOAL_TEXT, NO_GOAL_TEXT, OVERTIME_CODE, PENALTY_REASON_SUFFIXES,
    PENALTY_SHOT_MISS_MARKER, SHOOTOUT_CODE, TEAM_PENALTY_MARKER, TIMEOUT_MARKER,
    VIDEO_CHECK_MARKER,
};
use crate::liiga_scraper::values::required_int;
use crate::liiga_scraper::{player_id, row_cells};
use crate::model::{
    EventKind, EventPlayer, GameEvent, Goal, GoalkeeperChange, Penalty, PenaltyShot,
    PenaltyShotResult, Side,
};

static RE_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[-–—]\d+$").unwrap_or_else(|_| unreachable!()));

static RE_GOALKEEPER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{GOALKEEPER_MARKER}\b")).unwrap_or_else(|_| unreachable!())
});

/// A player link and the text that trails it up to the next element.
#[derive(Debug, Clone)]
struct Link {
    id: String,
    name: String,
    trailing: String,
}

/// A jersey badge zipped with the player link at the same position.
#[derive(Debug, Clone)]
struct Mention {
    number: u32,
    id: String,
    name: String,
    trailing: String,
}

#[derive(Debug, Clone)]
struct Emphasis {
    text: String,
    tail: String,
}

/// The scanned event side of one row.
#[derive(Debug)]
struct EventCell {
    clock: GameClock,
    side: Side,
    playoffs: bool,
    /// Text before the first child element.
    side_text: String,
    full_text: String,
    lower_text: String,
    emphasis: Option<Emphasis>,
    links: Vec<Link>,
    mentions: Vec<Mention>,
    /// Badges and links did not pair up one to one.
    unpaired: bool,
    /// Opposing goalkeeper named on the other side of a shootout row.
    goalkeeper: Option<EventPlayer>,
}

impl EventCell {
    fn scan(
        cell: &ElementRef,
        side: Side,
        clock: GameClock,
        playoffs: bool,
        goalkeeper: Option<EventPlayer>,
    ) -> Result<Self> {
        // A shootout scoring line is a bare badge in the emphasis, not a mention.
        let badge_emphasis = clock != GameClock::SHOOTOUT_MARK || playoffs;
        let (emphasis, badges, links) = scan_markup(cell, badge_emphasis);
        let unpaired = badges.len() != links.len();
        let mentions = badges
            .iter()
            .zip(&links)
            .map(|(badge, link)| {
                Ok(Mention {
                    number: required_int(badge)?,
                    id: link.id.clone(),
                    name: link.name.clone(),
                    trailing: link.trailing.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let full_text = full_text(cell);
        Ok(Self {
            clock,
            side,
            playoffs,
            side_text: lead_text(cell).trim().to_string(),
            lower_text: full_text.to_lowercase(),
            full_text,
            emphasis,
            links,
            mentions,
            unpaired,
            goalkeeper,
        })
    }

    fn player(&self, ctx: &GameContext, mention: &Mention) -> EventPlayer {
        ctx.event_player(
            self.side,
            Some(mention.id.clone()),
            Some(mention.number),
            &mention.name,
        )
    }

    fn first_mention(&self, kind: &'static str) -> Result<&Mention> {
        self.mentions.first().ok_or_else(|| self.missing(kind))
    }

    fn missing(&self, kind: &'static str) -> LiigaError {
        LiigaError::MissingPlayer {
            kind,
            clock: self.clock.to_string(),
        }
    }

    fn unrecognized(&self) -> LiigaError {
        LiigaError::UnrecognizedEvent {
            clock: self.clock.to_string(),
            side_text: self.full_text.clone(),
            players: format!("{:?}", self.mentions),
        }
    }
}

fn badge_number(element: &ElementRef) -> Option<String> {
    full_text(element)
        .strip_prefix('#')
        .map(|number| number.trim().to_string())
}

fn has_badge_span(element: &ElementRef) -> bool {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|e| e.value().name() == "span" && badge_number(&e).is_some())
}

/// With `badge_emphasis`, an emphasis whose own text is a `#NN` badge counts
/// as a badge at its position.
fn scan_markup(
    cell: &ElementRef,
    badge_emphasis: bool,
) -> (Option<Emphasis>, Vec<String>, Vec<Link>) {
    let mut emphasis = None;
    let mut badges = vec![];
    let mut links = vec![];
    for element in cell.descendants().skip(1).filter_map(ElementRef::wrap) {
        match element.value().name() {
            "strong" | "b" => {
                if badge_emphasis && !has_badge_span(&element) {
                    badges.extend(badge_number(&element));
                }
                emphasis = Some(Emphasis {
                    text: full_text(&element),
                    tail: tail_text(&element),
                })
            }
            "span" => badges.extend(badge_number(&element)),
            "a" => links.push(Link {
                id: player_id(element.value().attr("href").unwrap_or_default()),
                name: full_text(&element),
                trailing: tail_text(&element).trim().to_string(),
            }),
            _ => {}
        }
    }
    (emphasis, badges, links)
}

/// One classification rule: a predicate over the scanned cell and the
/// builder that runs when it is the first to match.
struct Rule {
    name: &'static str,
    applies: fn(&EventCell) -> bool,
    build: fn(&EventCell, &mut GameContext) -> Result<EventKind>,
}

/// Rules in priority order. Overlapping cues (a duration marker next to a
/// penalty keyword, a team penalty with a player attached) are settled by
/// position in this list.
const RULES: &[Rule] = &[
    Rule {
        name: "goal",
        applies: is_goal,
        build: build_goal,
    },
    Rule {
        name: "shootout goal",
        applies: is_shootout_goal,
        build: build_shootout_goal,
    },
    Rule {
        name: "timed penalty",
        applies: is_timed_penalty,
        build: build_timed_penalty,
    },
    Rule {
        name: "keyword penalty",
        applies: is_keyword_penalty,
        build: build_keyword_penalty,
    },
    Rule {
        name: "team penalty",
        applies: is_team_penalty,
        build: build_team_penalty,
    },
    Rule {
        name: "timeout",
        applies: is_timeout,
        build: |_, _| Ok(EventKind::Timeout),
    },
    Rule {
        name: "goalkeeper out",
        applies: is_goalkeeper_out,
        build: build_goalkeeper_out,
    },
    Rule {
        name: "goalkeeper in",
        applies: is_goalkeeper_in,
        build: build_goalkeeper_in,
    },
    Rule {
        name: "goalkeeper change",
        applies: is_goalkeeper_swap,
        build: build_goalkeeper_swap,
    },
    Rule {
        name: "video check",
        applies: is_video_check,
        build: |_, _| Ok(EventKind::VideoCheck),
    },
    Rule {
        name: "missed penalty shot",
        applies: is_missed_penalty_shot,
        build: build_missed_penalty_shot,
    },
    Rule {
        name: "shootout attempt",
        applies: is_shootout_attempt,
        build: build_shootout_attempt,
    },
];

fn rule_for(cell: &EventCell) -> Option<&'static Rule> {
    RULES.iter().find(|rule| (rule.applies)(cell))
}

fn is_goal(cell: &EventCell) -> bool {
    cell.emphasis.is_some() && !cell.mentions.is_empty()
}

fn is_shootout_goal(cell: &EventCell) -> bool {
    cell.emphasis.is_some() && cell.mentions.is_empty()
}

fn is_timed_penalty(cell: &EventCell) -> bool {
    cell.mentions
        .first()
        .is_some_and(|m| has_duration(&m.trailing) || has_duration(&cell.side_text))
}

fn is_keyword_penalty(cell: &EventCell) -> bool {
    cell.mentions
        .first()
        .is_some_and(|m| penalty_category(&m.trailing).is_some())
}

fn is_team_penalty(cell: &EventCell) -> bool {
    cell.full_text.contains(TEAM_PENALTY_MARKER)
}

fn is_timeout(cell: &EventCell) -> bool {
    cell.lower_text.contains(TIMEOUT_MARKER)
}

fn is_goalkeeper_out(cell: &EventCell) -> bool {
    cell.lower_text.contains(GOALKEEPER_OUT_MARKER)
}

fn is_goalkeeper_in(cell: &EventCell) -> bool {
    cell.lower_text.contains(GOALKEEPER_IN_MARKER)
}

fn is_goalkeeper_swap(cell: &EventCell) -> bool {
    cell.lower_text.contains(GOALKEEPER_SWAP_MARKER)
}

fn is_video_check(cell: &EventCell) -> bool {
    cell.lower_text.contains(VIDEO_CHECK_MARKER)
}

fn is_missed_penalty_shot(cell: &EventCell) -> bool {
    cell.clock != GameClock::SHOOTOUT_MARK && cell.lower_text.contains(PENALTY_SHOT_MISS_MARKER)
}

fn is_shootout_attempt(cell: &EventCell) -> bool {
    cell.clock == GameClock::SHOOTOUT_MARK
        && !cell.links.is_empty()
        && cell.mentions.is_empty()
        && !cell.playoffs
}

fn has_duration(text: &str) -> bool {
    text.split_whitespace().any(|w| w == DURATION_MARKER)
}

/// `2 min kampitus` → (2, "kampitus").
fn duration_and_reason(text: &str) -> Result<(u32, String)> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let marker = words
        .iter()
        .position(|w| *w == DURATION_MARKER)
        .unwrap_or_default();
    let minutes = marker
        .checked_sub(1)
        .and_then(|i| words.get(i))
        .copied()
        .unwrap_or_default();
    let reason = words.iter().skip(marker + 1).join(" ");
    Ok((required_int(minutes)?, reason))
}

fn find_score(text: &str) -> Option<String> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| c == '(' || c == ')' || c == ','))
        .find(|t| RE_SCORE.is_match(t))
        .map(str::to_string)
}

/// Comma separated annotation codes from a goal's trailing text. The goal's
/// own score is skipped; anything else outside the known codes is an error.
fn goal_codes(meta: &str, score: Option<&str>) -> Result<Vec<String>> {
    meta.split(',')
        .map(|t| t.trim_matches(|c: char| c == '(' || c == ')' || c.is_whitespace()))
        .filter(|t| !t.is_empty() && Some(*t) != score)
        .map(|t| {
            GOAL_CODES
                .iter()
                .find(|code| **code == t)
                .map(|code| code.to_string())
                .ok_or_else(|| LiigaError::UnknownGoalCode(t.to_string()))
        })
        .collect()
}

fn build_goal(cell: &EventCell, ctx: &mut GameContext) -> Result<EventKind> {
    if cell.unpaired {
        return Err(cell.unrecognized());
    }
    let scorer = cell.first_mention("goal")?;
    let emphasis = cell.emphasis.as_ref();
    let score = find_score(&scorer.trailing).or_else(|| emphasis.and_then(|e| find_score(&e.text)));

    let last = cell.mentions.last().unwrap_or(scorer);
    let meta = format!(
        "{},{}",
        last.trailing,
        emphasis.map(|e| e.tail.as_str()).unwrap_or_default()
    );
    let mut codes = goal_codes(&meta, score.as_deref())?;
    if cell.clock > GameClock::REGULATION_END {
        codes.push(OVERTIME_CODE.to_string());
    }

    Ok(EventKind::Goal(Goal {
        scorer: cell.player(ctx, scorer),
        assist1: cell.mentions.get(1).map(|m| cell.player(ctx, m)),
        assist2: cell.mentions.get(2).map(|m| cell.player(ctx, m)),
        score,
        goalattr: codes.join(" "),
        goalkeeper: cell.goalkeeper.clone(),
        psorder: None,
        psteamorder: None,
    }))
}

fn build_shootout_goal(cell: &EventCell, ctx: &mut GameContext) -> Result<EventKind> {
    let link = cell.links.first().ok_or_else(|| cell.missing("shootout goal"))?;
    let badge = cell
        .emphasis
        .as_ref()
        .map(|e| e.text.trim_start_matches('#').to_string())
        .unwrap_or_default();
    let scorer = ctx.event_player(
        cell.side,
        Some(link.id.clone()),
        Some(required_int(&badge)?),
        &link.name,
    );
    let (psorder, psteamorder) = ctx.next_shootout_order(cell.side);
    Ok(EventKind::Goal(Goal {
        scorer,
        assist1: None,
        assist2: None,
        score: find_score(&link.trailing),
        goalattr: SHOOTOUT_CODE.to_string(),
        goalkeeper: cell.goalkeeper.clone(),
        psorder: Some(psorder),
        psteamorder: Some(psteamorder),
    }))
}

/// Trim a dangling `(`, the team penalty prefix and suffixes such as
/// misconduct that are recorded apart from the reason.
fn clean_reason(reason: &str) -> String {
    let reason = reason.split_whitespace().join(" ");
    let mut reason = reason.trim_end_matches('(').trim();
    reason = reason
        .strip_prefix(TEAM_PENALTY_MARKER)
        .unwrap_or(reason)
        .trim();
    for suffix in PENALTY_REASON_SUFFIXES {
        if let Some(stripped) = reason.strip_suffix(suffix) {
            reason = strip_trailing_duration(stripped.trim_end()).trim_end_matches([',', '+', ' ']);
        }
    }
    reason.to_string()
}

/// `kampitus, 10 min` → `kampitus, `. Text without a trailing duration is
/// returned as is.
fn strip_trailing_duration(text: &str) -> &str {
    let Some(rest) = text.strip_suffix(DURATION_MARKER) else {
        return text;
    };
    let rest = rest.trim_end();
    let without_minutes = rest.trim_end_matches(|c: char| c.is_ascii_digit());
    if without_minutes.len() == rest.len() {
        text
    } else {
        without_minutes
    }
}

fn penalty(
    player: Option<EventPlayer>,
    boxed: Option<EventPlayer>,
    minutes: u32,
    reason: &str,
    teampenalty: bool,
) -> EventKind {
    let reason = clean_reason(reason);
    EventKind::Penalty(Penalty {
        player,
        boxed,
        minutes,
        reasoncategory: penalty_category(&reason),
        reason,
        teampenalty,
    })
}

fn build_timed_penalty(cell: &EventCell, ctx: &mut GameContext) -> Result<EventKind> {
    let first = cell.first_mention("penalty")?;
    if has_duration(&first.trailing) {
        let (minutes, reason) = duration_and_reason(&first.trailing)?;
        let boxed = cell
            .mentions
            .get(1)
            .filter(|m| m.id != first.id)
            .map(|m| cell.player(ctx, m));
        Ok(penalty(
            Some(cell.player(ctx, first)),
            boxed,
            minutes,
            &reason,
            false,
        ))
    } else {
        // Duration in the side's own text: a team penalty served by the
        // first mentioned player.
        let (minutes, reason) = duration_and_reason(&cell.side_text)?;
        let reason = if reason.is_empty() {
            first.trailing.as_str()
        } else {
            reason.as_str()
        };
        Ok(penalty(
            None,
            Some(cell.player(ctx, first)),
            minutes,
            reason,
            true,
        ))
    }
}

fn build_keyword_penalty(cell: &EventCell, ctx: &mut GameContext) -> Result<EventKind> {
    let first = cell.first_mention("penalty")?;
    Ok(penalty(
        Some(cell.player(ctx, first)),
        None,
        0,
        &first.trailing,
        false,
    ))
}

fn build_team_penalty(cell: &EventCell, ctx: &mut GameContext) -> Result<EventKind> {
    match cell.mentions.first() {
        Some(first) => Ok(penalty(
            None,
            Some(cell.player(ctx, first)),
            0,
            &cell.side_text,
            true,
        )),
        None => {
            let (minutes, reason) = duration_and_reason(&cell.side_text)?;
            Ok(penalty(None, None, minutes, &reason, true))
        }
    }
}

fn build_goalkeeper_out(cell: &EventCell, ctx: &mut GameContext) -> Result<EventKind> {
    let goalkeeper = cell.first_mention("goalkeeper out")?;
    Ok(EventKind::GoalkeeperOut(GoalkeeperChange {
        goalkeeperout: Some(cell.player(ctx, goalkeeper)),
        goalkeeperin: None,
    }))
}

fn build_goalkeeper_in(cell: &EventCell, ctx: &mut GameContext) -> Result<EventKind> {
    let goalkeeper = cell.first_mention("goalkeeper in")?;
    Ok(EventKind::GoalkeeperIn(GoalkeeperChange {
        goalkeeperout: None,
        goalkeeperin: Some(cell.player(ctx, goalkeeper)),
    }))
}

fn build_goalkeeper_swap(cell: &EventCell, ctx: &mut GameContext) -> Result<EventKind> {
    let [first, second, ..] = cell.mentions.as_slice() else {
        return Err(cell.missing("goalkeeper change"));
    };
    let trailing = first.trailing.to_lowercase();
    let first_enters =
        trailing.contains(GOALKEEPER_ENTERS_WORD) && !trailing.contains(GOALKEEPER_LEAVES_WORD);
    let (outgoing, incoming) = if first_enters {
        (second, first)
    } else {
        (first, second)
    };
    Ok(EventKind::GoalkeeperChange(GoalkeeperChange {
        goalkeeperout: Some(cell.player(ctx, outgoing)),
        goalkeeperin: Some(cell.player(ctx, incoming)),
    }))
}

fn build_missed_penalty_shot(cell: &EventCell, ctx: &mut GameContext) -> Result<EventKind> {
    let name = parenthesized(&cell.full_text).ok_or_else(|| cell.missing("penalty shot"))?;
    let (_, shooter) = ctx.names.find(name)?;
    Ok(EventKind::PenaltyShot(PenaltyShot {
        player: shooter.clone(),
        result: PenaltyShotResult::NoGoal,
        goalkeeper: cell.goalkeeper.clone(),
        psorder: None,
        psteamorder: None,
    }))
}

fn build_shootout_attempt(cell: &EventCell, ctx: &mut GameContext) -> Result<EventKind> {
    let link = cell
        .links
        .first()
        .ok_or_else(|| cell.missing("shootout attempt"))?;
    let trailing = link.trailing.to_lowercase();
    let result = if trailing.contains(NO_GOAL_TEXT) {
        PenaltyShotResult::NoGoal
    } else if trailing.contains(GOAL_TEXT) {
        PenaltyShotResult::Goal
    } else {
        return Err(cell.unrecognized());
    };
    let number = required_int(cell.side_text.trim_start_matches('#'))?;
    let player = ctx.event_player(cell.side, Some(link.id.clone()), Some(number), &link.name);
    let (psorder, psteamorder) = ctx.next_shootout_order(cell.side);
    Ok(EventKind::PenaltyShot(PenaltyShot {
        player,
        result,
        goalkeeper: cell.goalkeeper.clone(),
        psorder: Some(psorder),
        psteamorder: Some(psteamorder),
    }))
}

/// The cell carrying the event, plus the goalkeeper cell of a shootout row
/// where both sides have text.
type ResolvedSide<'a> = (Side, ElementRef<'a>, Option<ElementRef<'a>>);

fn resolve_side<'a>(
    home: ElementRef<'a>,
    away: ElementRef<'a>,
    clock: GameClock,
) -> Result<Option<ResolvedSide<'a>>> {
    let home_text = full_text(&home);
    let away_text = full_text(&away);
    match (home_text.is_empty(), away_text.is_empty()) {
        (true, true) => Ok(None),
        (false, true) => Ok(Some((Side::Home, home, None))),
        (true, false) => Ok(Some((Side::Away, away, None))),
        (false, false) => {
            if clock == GameClock::SHOOTOUT_MARK {
                let home_marked = RE_GOALKEEPER_MARKER.is_match(&home_text);
                let away_marked = RE_GOALKEEPER_MARKER.is_match(&away_text);
                if home_marked && !away_marked {
                    return Ok(Some((Side::Away, away, Some(home))));
                }
                if away_marked && !home_marked {
                    return Ok(Some((Side::Home, home, Some(away))));
                }
            }
            Err(LiigaError::AmbiguousEventSide {
                clock: clock.to_string(),
                home: home_text,
                away: away_text,
            })
        }
    }
}

fn marked_goalkeeper(cell: &ElementRef, side: Side, ctx: &GameContext) -> Result<Option<EventPlayer>> {
    let (_, badges, links) = scan_markup(cell, false);
    let Some(link) = links.first() else {
        return Ok(None);
    };
    let number = badges.first().map(|b| required_int(b)).transpose()?;
    Ok(Some(ctx.event_player(
        side,
        Some(link.id.clone()),
        number,
        &link.name,
    )))
}

/// Classify one row. `None` when neither side carries text.
fn classify_row(
    home: ElementRef,
    clock: &str,
    away: ElementRef,
    ctx: &mut GameContext,
) -> Result<Option<GameEvent>> {
    let clock = GameClock::parse(clock)?;
    let Some((side, cell, goalkeeper_cell)) = resolve_side(home, away, clock)? else {
        return Ok(None);
    };
    let goalkeeper = goalkeeper_cell
        .map(|gk| marked_goalkeeper(&gk, side.opposite(), ctx))
        .transpose()?
        .flatten();
    let cell = EventCell::scan(&cell, side, clock, ctx.playoffs, goalkeeper)?;

    let rule = rule_for(&cell).ok_or_else(|| cell.unrecognized())?;
    let kind = (rule.build)(&cell, ctx)?;
    debug!(rule = rule.name, clock = %clock, side = %side, "classified event");

    Ok(Some(GameEvent {
        id: ctx.next_event_id(clock),
        season: ctx.season.clone(),
        gameid: ctx.game_id,
        time: clock.to_string(),
        team: ctx.team(side).to_string(),
        vsteam: ctx.team(side.opposite()).to_string(),
        period: clock.period(kind.counts_in_shootout(), ctx.playoffs),
        side,
        kind,
    }))
}

/// Events of the game's event log, in document order.
pub(crate) fn parse_events(document: &Html, ctx: &mut GameContext) -> Result<Vec<GameEvent>> {
    let row_selector = Selector::parse("div.table tr.odd, div.table tr.even")?;
    let mut events = vec![];
    for row in document.select(&row_selector) {
        let cells = row_cells(&row);
        let [home, clock, away] = cells.as_slice() else {
            continue;
        };
        let clock = full_text(clock);
        if !GameClock::looks_like_clock(&clock) {
            continue;
        }
        if let Some(event) = classify_row(*home, &clock, *away, ctx)? {
            events.push(event);
        }
    }
    debug!(count = events.len(), game_id = ctx.game_id, "parsed game events");
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PenaltyCategory, Record};

    fn context(playoffs: bool) -> GameContext {
        let mut ctx = GameContext::new("2014-2015", 2015123, playoffs, "tappara", "hifk");
        let koivu = ctx.event_player(Side::Home, Some("101".to_string()), Some(9), "Koivu Saku");
        ctx.names.insert(Side::Home, "Koivu Saku", koivu);
        ctx
    }

    fn row(home: &str, clock: &str, away: &str) -> String {
        format!(
            r#"<tr class="odd"><td class="home">{home}</td><td>{clock}</td><td class="away">{away}</td></tr>"#
        )
    }

    fn page(rows: &[String]) -> Html {
        Html::parse_document(&format!(
            r#"<div class="table"><table><tbody>{}</tbody></table></div>"#,
            rows.concat()
        ))
    }

    fn events(rows: &[String], ctx: &mut GameContext) -> Result<Vec<GameEvent>> {
        parse_events(&page(rows), ctx)
    }

    fn single(home: &str, clock: &str, away: &str) -> GameEvent {
        let mut events = events(&[row(home, clock, away)], &mut context(false)).unwrap();
        assert_eq!(events.len(), 1);
        events.remove(0)
    }

    fn scanned_rule(home: &str, clock: &str) -> Option<&'static str> {
        let html = page(&[row(home, clock, "")]);
        let selector = Selector::parse("td.home").unwrap();
        let cell = html.select(&selector).next().unwrap();
        let clock = GameClock::parse(clock).unwrap();
        let cell = EventCell::scan(&cell, Side::Home, clock, false, None).unwrap();
        rule_for(&cell).map(|r| r.name)
    }

    const GOAL: &str = r#"<strong><span>#9</span></strong> <a href="/pelaajat/101/">Koivu Saku</a> 1-0 (<span>#27</span> <a href="/pelaajat/102/">Peltonen Ville</a>) YV"#;

    #[test]
    fn test_goal_with_one_assist() {
        let event = single(GOAL, "12:34", "");
        assert_eq!(event.period, "1");
        assert_eq!(event.team, "tappara");
        assert_eq!(event.vsteam, "hifk");
        let EventKind::Goal(goal) = &event.kind else {
            panic!("expected goal, got {:?}", event.kind);
        };
        assert_eq!(goal.scorer.number, Some(9));
        assert_eq!(goal.scorer.id.as_deref(), Some("101"));
        assert_eq!(goal.goalattr, "YV");
        assert_eq!(goal.score.as_deref(), Some("1-0"));
        assert_eq!(goal.assist1.as_ref().map(|p| p.number), Some(Some(27)));
        assert!(goal.assist2.is_none());

        let line = Record::GameEvent(event).to_json_line().unwrap();
        assert!(line.contains(r#""eventtype":"goal""#));
        assert!(line.contains(r#""goalattr":"YV""#));
        assert!(line.contains(r#""assist2":null"#));
        assert!(line.contains(r#""period":"1""#));
    }

    #[test]
    fn test_overtime_goal_gets_overtime_code() {
        let home = r#"<strong>2-1</strong> <span>#9</span> <a href="/pelaajat/101/">Koivu Saku</a> YV, AV"#;
        let event = single(home, "62:10", "");
        assert_eq!(event.period, "JA");
        let EventKind::Goal(goal) = &event.kind else {
            panic!("expected goal");
        };
        assert_eq!(goal.goalattr, "YV AV JA");
        assert_eq!(goal.score.as_deref(), Some("2-1"));
    }

    #[test]
    fn test_unknown_goal_code_is_fatal() {
        let home = r#"<strong>1-0</strong> <span>#9</span> <a href="/pelaajat/101/">Koivu Saku</a> XX"#;
        let err = events(&[row(home, "10:00", "")], &mut context(false)).unwrap_err();
        assert!(matches!(err, LiigaError::UnknownGoalCode(code) if code == "XX"));
    }

    #[test]
    fn test_shootout_sequence_counts_attempts() {
        let mut ctx = context(false);
        let rows = [
            row(
                r#"<strong>#9</strong> <a href="/pelaajat/101/">Koivu Saku</a> maali"#,
                "65:00",
                r#"MV <span>#31</span> <a href="/pelaajat/303/">Lehtonen Kari</a>"#,
            ),
            row(
                "",
                "65:00",
                r#"#27 <a href="/pelaajat/202/">Peltonen Ville</a> ei maalia"#,
            ),
            row(
                r#"#10 <a href="/pelaajat/104/">Aho Sebastian</a> maali"#,
                "65:00",
                "",
            ),
        ];
        let events = events(&rows, &mut ctx).unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.period == "VL"));

        let EventKind::Goal(goal) = &events[0].kind else {
            panic!("expected shootout goal");
        };
        assert_eq!(goal.goalattr, "VL");
        assert_eq!(goal.scorer.number, Some(9));
        assert_eq!((goal.psorder, goal.psteamorder), (Some(1), Some(1)));
        let goalkeeper = goal.goalkeeper.as_ref().unwrap();
        assert_eq!(goalkeeper.name, "Lehtonen Kari");
        assert_eq!(goalkeeper.team, "hifk");

        let EventKind::PenaltyShot(miss) = &events[1].kind else {
            panic!("expected shootout attempt");
        };
        assert_eq!(miss.result, PenaltyShotResult::NoGoal);
        assert_eq!(miss.player.team, "hifk");
        assert_eq!((miss.psorder, miss.psteamorder), (Some(2), Some(1)));

        let EventKind::PenaltyShot(hit) = &events[2].kind else {
            panic!("expected shootout attempt");
        };
        assert_eq!(hit.result, PenaltyShotResult::Goal);
        assert_eq!(hit.player.number, Some(10));
        assert_eq!((hit.psorder, hit.psteamorder), (Some(3), Some(2)));

        let ids: std::collections::HashSet<u64> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_both_sides_outside_shootout_is_ambiguous() {
        let err = events(&[row("Aikalisä", "30:00", "Aikalisä")], &mut context(false)).unwrap_err();
        assert!(matches!(err, LiigaError::AmbiguousEventSide { .. }));
    }

    #[test]
    fn test_timed_penalty_with_boxed_player() {
        let home = r#"<span>#4</span> <a href="/pelaajat/104/">Aho Sebastian</a> 2 min kiinnipitäminen (<span>#9</span> <a href="/pelaajat/101/">Koivu Saku</a>)"#;
        let event = single(home, "05:10", "");
        let EventKind::Penalty(penalty) = &event.kind else {
            panic!("expected penalty");
        };
        assert_eq!(penalty.minutes, 2);
        assert_eq!(penalty.reason, "kiinnipitäminen");
        assert_eq!(penalty.reasoncategory, Some(PenaltyCategory::Holding));
        assert_eq!(penalty.player.as_ref().unwrap().name, "Aho Sebastian");
        assert_eq!(penalty.boxed.as_ref().unwrap().name, "Koivu Saku");
        assert!(!penalty.teampenalty);
    }

    #[test]
    fn test_penalty_suffix_is_stripped() {
        let home = r#"<span>#4</span> <a href="/pelaajat/104/">Aho Sebastian</a> 5 min korkea maila, ottelurangaistus"#;
        let EventKind::Penalty(penalty) = single(home, "41:00", "").kind else {
            panic!("expected penalty");
        };
        assert_eq!(penalty.minutes, 5);
        assert_eq!(penalty.reason, "korkea maila");
    }

    #[test]
    fn test_keyword_penalty_without_duration() {
        let home = r#"<span>#9</span> <a href="/pelaajat/101/">Koivu Saku</a> kampitus"#;
        let EventKind::Penalty(penalty) = single(home, "15:00", "").kind else {
            panic!("expected penalty");
        };
        assert_eq!(penalty.minutes, 0);
        assert_eq!(penalty.reason, "kampitus");
        assert_eq!(penalty.reasoncategory, Some(PenaltyCategory::Tripping));
    }

    #[test]
    fn test_team_penalty_without_player() {
        let event = single("", "22:00", "Joukkuerangaistus 2 min liian monta pelaajaa kentällä");
        assert_eq!(event.team, "hifk");
        let EventKind::Penalty(penalty) = &event.kind else {
            panic!("expected penalty");
        };
        assert_eq!(penalty.minutes, 2);
        assert_eq!(penalty.reason, "liian monta pelaajaa kentällä");
        assert!(penalty.teampenalty);
        assert!(penalty.player.is_none());
        assert!(penalty.boxed.is_none());
    }

    #[test]
    fn test_team_penalty_served_by_player() {
        let home = r#"Joukkuerangaistus 2 min <span>#9</span> <a href="/pelaajat/101/">Koivu Saku</a> liian monta pelaajaa"#;
        let EventKind::Penalty(penalty) = single(home, "22:00", "").kind else {
            panic!("expected penalty");
        };
        assert_eq!(penalty.minutes, 2);
        assert_eq!(penalty.reason, "liian monta pelaajaa");
        assert!(penalty.teampenalty);
        assert!(penalty.player.is_none());
        assert_eq!(penalty.boxed.unwrap().id.as_deref(), Some("101"));
    }

    #[test]
    fn test_goalkeeper_events() {
        let out = single(
            r#"Maalivahti ulos <span>#31</span> <a href="/pelaajat/301/">Rinne Pekka</a>"#,
            "58:30",
            "",
        );
        assert!(matches!(
            &out.kind,
            EventKind::GoalkeeperOut(GoalkeeperChange { goalkeeperout: Some(p), goalkeeperin: None })
                if p.name == "Rinne Pekka"
        ));

        let back = single(
            r#"Maalivahti sisään <span>#31</span> <a href="/pelaajat/301/">Rinne Pekka</a>"#,
            "58:50",
            "",
        );
        assert!(matches!(back.kind, EventKind::GoalkeeperIn(_)));

        let swap = single(
            r#"Maalivahdin vaihto <span>#31</span> <a href="/pelaajat/301/">Rinne Pekka</a> ulos, <span>#1</span> <a href="/pelaajat/302/">Niemi Antti</a> sisään"#,
            "40:00",
            "",
        );
        let EventKind::GoalkeeperChange(change) = swap.kind else {
            panic!("expected goalkeeper change");
        };
        assert_eq!(change.goalkeeperout.unwrap().name, "Rinne Pekka");
        assert_eq!(change.goalkeeperin.unwrap().name, "Niemi Antti");
    }

    #[test]
    fn test_goalkeeper_swap_needs_two_players() {
        let home = r#"Maalivahdin vaihto <span>#31</span> <a href="/pelaajat/301/">Rinne Pekka</a> ulos"#;
        let err = events(&[row(home, "40:00", "")], &mut context(false)).unwrap_err();
        assert!(matches!(err, LiigaError::MissingPlayer { .. }));
    }

    #[test]
    fn test_timeout_and_video_check() {
        let timeout = single("", "55:12", "Aikalisä");
        assert!(matches!(timeout.kind, EventKind::Timeout));
        assert_eq!(timeout.team, "hifk");

        let video = single("Videotarkistus - ei maalia", "18:00", "");
        assert!(matches!(video.kind, EventKind::VideoCheck));
    }

    #[test]
    fn test_missed_penalty_shot_resolves_name_key() {
        let event = single("Rangaistuslaukaus - ei maalia (Saku Koivu)", "33:00", "");
        let EventKind::PenaltyShot(shot) = &event.kind else {
            panic!("expected penalty shot");
        };
        assert_eq!(shot.player.id.as_deref(), Some("101"));
        assert_eq!(shot.result, PenaltyShotResult::NoGoal);
        assert_eq!(shot.psorder, None);
        assert_eq!(event.period, "2");
    }

    #[test]
    fn test_missed_penalty_shot_unknown_name_is_fatal() {
        let rows = [row("Rangaistuslaukaus - ei maalia (Teemu Selanne)", "33:00", "")];
        let err = events(&rows, &mut context(false)).unwrap_err();
        assert!(matches!(err, LiigaError::NameKeyNotFound { name, .. } if name == "Teemu Selanne"));
    }

    #[test]
    fn test_unrecognized_event_carries_inputs() {
        let err = events(&[row("Jotain outoa", "10:00", "")], &mut context(false)).unwrap_err();
        match err {
            LiigaError::UnrecognizedEvent {
                clock, side_text, ..
            } => {
                assert_eq!(clock, "10:00");
                assert_eq!(side_text, "Jotain outoa");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_playoff_rows_at_shootout_mark_are_not_shootouts() {
        let rows = [row(
            r#"#10 <a href="/pelaajat/104/">Aho Sebastian</a> maali"#,
            "65:00",
            "",
        )];
        let err = events(&rows, &mut context(true)).unwrap_err();
        assert!(matches!(err, LiigaError::UnrecognizedEvent { .. }));
    }

    #[test]
    fn test_empty_and_non_clock_rows_are_skipped() {
        let rows = [
            row("", "12:00", ""),
            row("1. erä", "Yht.", ""),
            r#"<tr class="even"><td colspan="3">Erä päättyi</td></tr>"#.to_string(),
        ];
        assert!(events(&rows, &mut context(false)).unwrap().is_empty());
    }

    #[test]
    fn test_rule_priority() {
        // Emphasis wins over everything.
        assert_eq!(scanned_rule(GOAL, "12:34"), Some("goal"));
        // A duration marker wins over a keyword in the same text.
        assert_eq!(
            scanned_rule(
                r#"<span>#9</span> <a href="/pelaajat/101/">Koivu Saku</a> 2 min kampitus"#,
                "12:34"
            ),
            Some("timed penalty")
        );
        assert_eq!(
            scanned_rule(
                r#"<span>#9</span> <a href="/pelaajat/101/">Koivu Saku</a> huitominen"#,
                "12:34"
            ),
            Some("keyword penalty")
        );
        assert_eq!(
            scanned_rule(
                r#"Joukkuerangaistus <span>#9</span> <a href="/pelaajat/101/">Koivu Saku</a>"#,
                "12:34"
            ),
            Some("team penalty")
        );
        assert_eq!(scanned_rule("Aikalisä", "12:34"), Some("timeout"));
        assert_eq!(
            scanned_rule(
                r#"#9 <a href="/pelaajat/101/">Koivu Saku</a> ei maalia"#,
                "65:00"
            ),
            Some("shootout attempt")
        );
        assert_eq!(
            scanned_rule(r#"#9 <a href="/pelaajat/101/">Koivu Saku</a> ei maalia"#, "64:00"),
            None
        );
    }

    #[test]
    fn test_clean_reason() {
        assert_eq!(clean_reason("kampitus ("), "kampitus");
        assert_eq!(clean_reason("Joukkuerangaistus kiekon sulkeminen"), "kiekon sulkeminen");
        assert_eq!(clean_reason("huitominen + käytösrangaistus"), "huitominen");
    }

    #[test]
    fn test_duration_and_reason() {
        assert_eq!(
            duration_and_reason("Joukkuerangaistus 2 min liikaa pelaajia").unwrap(),
            (2, "liikaa pelaajia".to_string())
        );
        assert!(duration_and_reason("min kampitus").is_err());
    }

    #[test]
    fn test_goal_with_badge_inside_emphasis() {
        let home = r#"<strong>#9</strong> <a href="/pelaajat/101/">Koivu Saku</a> 1-0 (<span>#27</span> <a href="/pelaajat/102/">Peltonen Ville</a>) YV"#;
        let event = single(home, "12:34", "");
        assert_eq!(event.period, "1");
        let EventKind::Goal(goal) = &event.kind else {
            panic!("expected goal, got {:?}", event.kind);
        };
        assert_eq!(goal.scorer.number, Some(9));
        assert_eq!(goal.scorer.id.as_deref(), Some("101"));
        let assist = goal.assist1.as_ref().unwrap();
        assert_eq!(assist.number, Some(27));
        assert_eq!(assist.id.as_deref(), Some("102"));
        assert!(goal.assist2.is_none());
        assert_eq!(goal.score.as_deref(), Some("1-0"));
        assert_eq!(goal.goalattr, "YV");
    }

    #[test]
    fn test_goal_with_unpaired_badges_is_fatal() {
        let home = r#"<strong>1-0</strong> <a href="/pelaajat/101/">Koivu Saku</a> (<span>#27</span> <a href="/pelaajat/102/">Peltonen Ville</a>)"#;
        let err = events(&[row(home, "12:34", "")], &mut context(false)).unwrap_err();
        assert!(matches!(err, LiigaError::UnrecognizedEvent { .. }));
    }

    #[test]
    fn test_goal_codes_split_on_commas() {
        assert_eq!(goal_codes(") YV,", Some("1-0")).unwrap(), ["YV"]);
        assert_eq!(goal_codes("1-0, YV2,", Some("1-0")).unwrap(), ["YV2"]);
        assert!(matches!(
            goal_codes("YV, AV, 5", None),
            Err(LiigaError::UnknownGoalCode(code)) if code == "5"
        ));
        assert!(matches!(
            goal_codes("2-0, YV", Some("1-0")),
            Err(LiigaError::UnknownGoalCode(code)) if code == "2-0"
        ));
    }

    #[test]
    fn test_unknown_trailing_number_is_fatal() {
        let home = r#"<strong>2-1</strong> <span>#9</span> <a href="/pelaajat/101/">Koivu Saku</a> YV, AV, 5"#;
        let err = events(&[row(home, "30:00", "")], &mut context(false)).unwrap_err();
        assert!(matches!(err, LiigaError::UnknownGoalCode(code) if code == "5"));
    }

    #[test]
    fn test_penalty_with_misconduct_keeps_only_reason() {
        let home = r#"<span>#9</span> <a href="/pelaajat/101/">Koivu Saku</a> 2 min kampitus, 10 min käytösrangaistus"#;
        let EventKind::Penalty(penalty) = single(home, "15:00", "").kind else {
            panic!("expected penalty");
        };
        assert_eq!(penalty.minutes, 2);
        assert_eq!(penalty.reason, "kampitus");
        assert_eq!(penalty.reasoncategory, Some(PenaltyCategory::Tripping));
        assert_eq!(clean_reason("huitominen + 10 min käytösrangaistus"), "huitominen");
    }

    #[test]
    fn test_missed_penalty_shot_marker_at_shootout_mark() {
        assert_eq!(
            scanned_rule("Rangaistuslaukaus - ei maalia (Saku Koivu)", "33:00"),
            Some("missed penalty shot")
        );
        assert_eq!(
            scanned_rule("Rangaistuslaukaus - ei maalia (Saku Koivu)", "65:00"),
            None
        );
    }

    #[test]
    fn test_shootout_goal_with_home_goalkeeper_marker() {
        let event = single(
            r#"MV <span>#35</span> <a href="/pelaajat/301/">Rinne Pekka</a>"#,
            "65:00",
            r#"<strong>#27</strong> <a href="/pelaajat/202/">Peltonen Ville</a> maali"#,
        );
        assert_eq!(event.side, Side::Away);
        assert_eq!(event.team, "hifk");
        assert_eq!(event.period, "VL");
        let EventKind::Goal(goal) = &event.kind else {
            panic!("expected shootout goal");
        };
        assert_eq!(goal.goalattr, "VL");
        assert_eq!(goal.scorer.number, Some(27));
        assert_eq!(goal.scorer.team, "hifk");
        assert_eq!((goal.psorder, goal.psteamorder), (Some(1), Some(1)));
        let goalkeeper = goal.goalkeeper.as_ref().unwrap();
        assert_eq!(goalkeeper.name, "Rinne Pekka");
        assert_eq!(goalkeeper.number, Some(35));
        assert_eq!(goalkeeper.team, "tappara");
    }

    #[test]
    fn test_goalkeeper_swap_incoming_listed_first() {
        let swap = single(
            r#"Maalivahdin vaihto <span>#1</span> <a href="/pelaajat/302/">Niemi Antti</a> sisään, <span>#31</span> <a href="/pelaajat/301/">Rinne Pekka</a> ulos"#,
            "40:00",
            "",
        );
        let EventKind::GoalkeeperChange(change) = swap.kind else {
            panic!("expected goalkeeper change");
        };
        assert_eq!(change.goalkeeperout.unwrap().name, "Rinne Pekka");
        assert_eq!(change.goalkeeperin.unwrap().name, "Niemi Antti");
    }
}
