use std::collections::HashSet;

use chrono::NaiveDate;
use scraper::Html;

use liiga_scraper::{
    parse_game_page, EventKind, GameEvent, GameShell, Record, Season, ShotResult,
};

const GAME_PAGE: &str = include_str!("fixtures/game.html");

fn shell() -> GameShell {
    GameShell {
        number: 123,
        identifier: "123".to_string(),
        date: NaiveDate::from_ymd_opt(2014, 10, 15),
        time: Some("18:30".to_string()),
        playoffs: false,
        home: "tappara".to_string(),
        away: "hifk".to_string(),
        resultattr: None,
    }
}

fn records() -> Vec<Record> {
    let season = Season::from_label("2014-2015", false).unwrap();
    parse_game_page(&Html::parse_document(GAME_PAGE), &season, &shell()).unwrap()
}

fn ndjson(records: &[Record]) -> String {
    records
        .iter()
        .map(|r| r.to_json_line().unwrap() + "\n")
        .collect()
}

fn record_type(record: &Record) -> &'static str {
    match record {
        Record::Game(_) => "game",
        Record::Player(_) => "player",
        Record::Goalkeeper(_) => "goalkeeper",
        Record::Referee(_) => "referee",
        Record::GameEvent(_) => "gameevent",
        Record::Period(_) => "period",
        Record::GameStats(_) => "gamestats",
        _ => "other",
    }
}

fn events(records: &[Record]) -> Vec<&GameEvent> {
    records
        .iter()
        .filter_map(|r| match r {
            Record::GameEvent(event) => Some(event),
            _ => None,
        })
        .collect()
}

#[test]
fn same_page_gives_identical_output() {
    assert_eq!(ndjson(&records()), ndjson(&records()));
}

#[test]
fn records_come_in_page_order() {
    let records = records();
    let types: Vec<&str> = records.iter().map(record_type).collect();

    let mut expected = vec!["game"];
    expected.extend(["player"; 4]);
    expected.extend(["goalkeeper"; 2]);
    expected.extend(["referee"; 2]);
    expected.extend(["gameevent"; 13]);
    expected.extend(["period"; 3]);
    expected.push("gamestats");
    assert_eq!(types, expected);
}

#[test]
fn game_line_has_sorted_keys() {
    let records = records();
    let line = records[0].to_json_line().unwrap();
    assert!(
        line.starts_with(
            r#"{"attendance":13455,"away":{"points":0,"score":2,"team":"hifk"},"date":"2014-10-15","#
        ),
        "{line}"
    );
    assert!(line.contains(r#""id":2015123,"#));
    assert!(line.contains(r#""resultattr":"","#));
    assert!(line.ends_with(r#""type":"game"}"#));

    let Record::Game(game) = &records[0] else {
        panic!("expected the game first");
    };
    assert_eq!(game.score, "3-2");
    assert_eq!(game.home.points, Some(3));
    assert_eq!(game.endtime.as_deref(), Some("60:00"));
    assert_eq!(game.periods.as_deref(), Some("(1-0, 0-1, 2-1)"));
}

#[test]
fn event_ids_are_unique_within_the_game() {
    let records = records();
    let events = events(&records);
    let ids: HashSet<u64> = events.iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), events.len());
    assert!(events.iter().all(|e| e.id / 10_000_000_000 == 2015123));
    assert!(events.iter().all(|e| e.gameid == 2015123));
}

#[test]
fn event_log_is_classified() {
    let records = records();
    let events = events(&records);
    let kinds: Vec<&str> = events.iter().map(|e| e.kind.name()).collect();
    assert_eq!(
        kinds,
        [
            "penalty",
            "goal",
            "goal",
            "goal",
            "goal",
            "timeout",
            "goal",
            "penalty",
            "goalkeeperout",
            "goalkeeperin",
            "shot",
            "shot",
            "shot",
        ]
    );

    let EventKind::Goal(first) = &events[1].kind else {
        panic!("expected a goal");
    };
    assert_eq!(events[1].period, "1");
    assert_eq!(events[1].team, "tappara");
    assert_eq!(first.goalattr, "YV");
    assert_eq!(first.score.as_deref(), Some("1-0"));
    assert_eq!(first.scorer.id.as_deref(), Some("101"));
    assert_eq!(first.assist1.as_ref().map(|p| p.name.as_str()), Some("Aho Sebastian"));
    assert!(first.assist2.is_none());

    let EventKind::Goal(third) = &events[3].kind else {
        panic!("expected a goal");
    };
    assert_eq!(third.goalattr, "");
    assert_eq!(third.assist2.as_ref().and_then(|p| p.number), Some(35));

    let EventKind::Penalty(penalty) = &events[7].kind else {
        panic!("expected a penalty");
    };
    assert_eq!(events[7].team, "hifk");
    assert_eq!(events[7].vsteam, "tappara");
    assert_eq!(penalty.minutes, 2);
    assert_eq!(penalty.reason, "huitominen");
}

#[test]
fn shot_map_resolves_players_from_rosters() {
    let records = records();
    let shots: Vec<_> = events(&records)
        .into_iter()
        .filter_map(|e| match &e.kind {
            EventKind::Shot(shot) => Some((e, shot)),
            _ => None,
        })
        .collect();
    assert_eq!(shots.len(), 3);

    let (goal_event, goal) = shots[0];
    assert_eq!(goal_event.team, "tappara");
    assert_eq!(goal.result, ShotResult::Goal);
    assert_eq!(goal.shooter.id.as_deref(), Some("101"));

    let (blocked_event, blocked) = shots[1];
    assert_eq!(blocked_event.team, "hifk");
    assert_eq!(blocked_event.period, "2");
    assert_eq!(blocked.result, ShotResult::Blocked);
    assert_eq!(blocked.blocker.as_ref().map(|p| p.team.as_str()), Some("tappara"));

    assert_eq!(shots[2].1.result, ShotResult::Miss);
    assert_ne!(shots[1].0.id, shots[2].0.id);
}

#[test]
fn periods_add_up_to_the_final_score() {
    let records = records();
    let periods: Vec<_> = records
        .iter()
        .filter_map(|r| match r {
            Record::Period(period) => Some(period),
            _ => None,
        })
        .collect();
    let labels: Vec<&str> = periods.iter().map(|p| p.period.as_str()).collect();
    assert_eq!(labels, ["1", "2", "3"]);
    let running: Vec<&str> = periods.iter().map(|p| p.runningscore.as_str()).collect();
    assert_eq!(running, ["1-0", "1-1", "3-2"]);

    let Some(Record::GameStats(stats)) = records.last() else {
        panic!("expected game stats last");
    };
    assert_eq!(stats.score, "3-2");
    assert_eq!((stats.home.shots, stats.away.shots), (30, 27));
    assert_eq!(stats.away.penaltyminutes, 4);
}

#[test]
fn unplayed_page_yields_nothing() {
    let season = Season::from_label("2014-2015", false).unwrap();
    let html = Html::parse_document(r#"<div class="info"><p>-</p></div>"#);
    assert!(parse_game_page(&html, &season, &shell()).unwrap().is_empty());
}
