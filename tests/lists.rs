use std::fs;
use std::path::PathBuf;

use std::collections::HashSet;

use serde_json::{Value, json};

use sofa_rows::config::ConvertConfig;
use sofa_rows::dedup::ConflictPolicy;
use sofa_rows::error::ConvertError;
use sofa_rows::lists::{convert_events, convert_seasons, convert_tournament};
use sofa_rows::schema::{EventsPayload, SeasonsPayload, TournamentPayload};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn listed_event(id: u64, status: i32, home_goals: i32, home_primary: &str) -> Value {
    let sport = json!({"id": 1, "name": "Football", "slug": "football"});
    json!({
        "id": id,
        "slug": "manchester-united-arsenal",
        "tournament": {
            "id": 17, "name": "Premier League", "slug": "premier-league",
            "category": {"id": 1, "name": "England", "slug": "england", "sport": sport}
        },
        "roundInfo": {"round": 26},
        "status": {"code": status, "description": "status", "type": "inprogress"},
        "homeTeam": {
            "id": 35, "name": "Manchester United", "slug": "manchester-united", "sport": sport,
            "teamColors": {"primary": home_primary, "secondary": "#ffffff", "text": "#ffffff"}
        },
        "awayTeam": {"id": 43, "name": "Arsenal", "slug": "arsenal", "sport": sport},
        "homeScore": {"current": home_goals, "display": home_goals},
        "awayScore": {"current": 0, "display": 0}
    })
}

fn listed(events: Vec<Value>) -> EventsPayload {
    serde_json::from_value(json!({ "events": events })).expect("events payload")
}

fn with_policy(conflict_policy: ConflictPolicy) -> ConvertConfig {
    ConvertConfig {
        conflict_policy,
        ..ConvertConfig::default()
    }
}

fn events_payload() -> EventsPayload {
    serde_json::from_str(&read_fixture("events_season.json")).expect("fixture should parse")
}

#[test]
fn events_sharing_a_tournament_yield_one_tournament_row() {
    let list = convert_events(&events_payload(), &ConvertConfig::default()).expect("lenient");
    let bag = &list.bag;

    assert_eq!(list.converted, 2);
    assert_eq!(list.skipped, 1);
    assert_eq!(bag.events.len(), 2);
    assert_eq!(bag.tournaments.len(), 1);
    assert_eq!(bag.categories.len(), 1);
    assert_eq!(bag.sports.len(), 1);
    assert_eq!(bag.seasons.len(), 1);
    assert!(bag.dedup_stats().duplicates > 0);
    assert_eq!(bag.dedup_stats().conflicts, 0);
}

#[test]
fn shared_team_appears_once_with_both_events_pointing_at_it() {
    let list = convert_events(&events_payload(), &ConvertConfig::default()).expect("lenient");
    let bag = &list.bag;

    let team_ids: Vec<&u64> = bag.teams.keys().collect();
    assert_eq!(team_ids, vec![&35, &38, &43]);
    let refs: Vec<bool> = bag
        .events
        .iter()
        .map(|e| e.home_team_id == 35 || e.away_team_id == 35)
        .collect();
    assert_eq!(refs, vec![true, true]);

    // distinct rounds, one status, two score rows per event
    assert_eq!(bag.round_infos.len(), 2);
    assert_eq!(bag.statuses.len(), 1);
    assert_eq!(bag.scores.len(), 4);
    assert!(bag.dangling().is_empty(), "{:?}", bag.dangling());
}

#[test]
fn strict_event_list_rejects_malformed_event() {
    let config = ConvertConfig {
        strict: true,
        ..ConvertConfig::default()
    };
    let err = convert_events(&events_payload(), &config).expect_err("strict");
    assert!(matches!(err, ConvertError::Malformed { entity: "event", .. }));
}

#[test]
fn seasons_are_deduplicated() {
    let payload: SeasonsPayload =
        serde_json::from_str(&read_fixture("seasons.json")).expect("fixture should parse");
    let list = convert_seasons(&payload, &ConvertConfig::default());

    assert_eq!(list.converted, 4);
    let ids: Vec<&u64> = list.bag.seasons.keys().collect();
    assert_eq!(ids, vec![&41886, &52186, &61627]);
    assert_eq!(list.bag.seasons.stats().duplicates, 1);
}

#[test]
fn tournament_payload_builds_its_chain() {
    let payload: TournamentPayload =
        serde_json::from_str(&read_fixture("tournament.json")).expect("fixture should parse");
    let list = convert_tournament(&payload, &ConvertConfig::default()).expect("tournament");
    let bag = &list.bag;

    assert_eq!(bag.row_count(), 3);
    let tournament = bag.tournaments.get(&17).expect("tournament 17");
    assert_eq!(tournament.category_id, 1);
    let category = bag.categories.get(&1).expect("category 1");
    assert_eq!(category.sport_id, 1);
    assert_eq!(category.alpha2.as_deref(), Some("EN"));
    assert!(bag.dangling().is_empty());
}

#[test]
fn empty_tournament_payload_is_malformed() {
    let payload: TournamentPayload = serde_json::from_str("{}").expect("empty payload");
    assert!(convert_tournament(&payload, &ConvertConfig::default()).is_err());
}

#[test]
fn last_wins_event_carries_its_own_time_and_scores() {
    let payload = listed(vec![
        listed_event(12437001, 6, 0, "#ff0000"),
        listed_event(12437001, 100, 3, "#ff0000"),
    ]);
    let list = convert_events(&payload, &with_policy(ConflictPolicy::LastWins)).expect("events");
    let bag = &list.bag;

    let event = bag.events.get(&12437001).expect("event row");
    assert_eq!(event.status_code, Some(100));
    let home = bag
        .scores
        .iter()
        .find(|s| Some(s.id) == event.home_score_id)
        .expect("home score row");
    assert_eq!(home.row.current, 3);
    assert_eq!(bag.scores.len(), 2);
    assert_eq!(bag.events.stats().conflicts, 1);
    assert!(bag.dangling().is_empty(), "{:?}", bag.dangling());
}

#[test]
fn first_wins_event_keeps_its_first_scores() {
    let payload = listed(vec![
        listed_event(12437001, 6, 0, "#ff0000"),
        listed_event(12437001, 100, 3, "#ff0000"),
    ]);
    let list = convert_events(&payload, &ConvertConfig::default()).expect("events");
    let bag = &list.bag;

    let event = bag.events.get(&12437001).expect("event row");
    assert_eq!(event.status_code, Some(6));
    let currents: Vec<i32> = bag.scores.iter().map(|s| s.row.current).collect();
    assert_eq!(currents, vec![0, 0]);
    assert_eq!(bag.times.len(), 0);
}

#[test]
fn conflicting_team_leaves_no_unreferenced_colors() {
    let payload = listed(vec![
        listed_event(12437001, 0, 0, "#ff0000"),
        listed_event(12437015, 0, 0, "#0000cc"),
    ]);
    for policy in [ConflictPolicy::FirstWins, ConflictPolicy::LastWins] {
        let list = convert_events(&payload, &with_policy(policy)).expect("events");
        let bag = &list.bag;

        let referenced: HashSet<_> = bag.teams.iter().filter_map(|t| t.team_colors_id).collect();
        let held: HashSet<_> = bag.team_colors.iter().map(|c| c.id).collect();
        assert_eq!(referenced, held, "{policy:?}");
        assert_eq!(bag.team_colors.len(), 1, "{policy:?}");

        let expected = match policy {
            ConflictPolicy::FirstWins => "#ff0000",
            ConflictPolicy::LastWins => "#0000cc",
        };
        let colors = bag.team_colors.iter().next().expect("colors row");
        assert_eq!(colors.row.primary, expected);
        assert_eq!(bag.teams.stats().conflicts, 1);
        assert!(bag.dangling().is_empty(), "{:?}", bag.dangling());
    }
}
