use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use sofa_rows::match_convert::convert_match;
use sofa_rows::schema::MatchPayload;
use sofa_rows::sink::{JsonLinesSink, emit};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn emitted_rows() -> Vec<(String, Value)> {
    let payload: MatchPayload =
        serde_json::from_str(&read_fixture("football_match.json")).expect("fixture should parse");
    let conversion = convert_match(&payload).expect("conversion");
    let mut rows: Vec<(String, Value)> = Vec::new();
    let n = emit(&conversion.bag, &mut rows).expect("emit");
    assert_eq!(n, conversion.bag.row_count());
    rows
}

fn first_and_last(rows: &[(String, Value)], table: &str) -> (usize, usize) {
    let first = rows
        .iter()
        .position(|(t, _)| t == table)
        .unwrap_or_else(|| panic!("no {table} rows"));
    let last = rows
        .iter()
        .rposition(|(t, _)| t == table)
        .unwrap_or_else(|| panic!("no {table} rows"));
    (first, last)
}

#[test]
fn parents_are_emitted_before_children() {
    let rows = emitted_rows();
    let pairs = [
        ("sports", "categories"),
        ("categories", "tournaments"),
        ("countries", "venues"),
        ("cities", "venues"),
        ("venues", "teams"),
        ("team_colors", "teams"),
        ("managers", "teams"),
        ("tournaments", "events"),
        ("teams", "events"),
        ("scores", "events"),
        ("times", "events"),
        ("events", "lineups"),
        ("lineups", "team_lineups"),
        ("player_colors", "team_lineups"),
        ("players", "lineup_entries"),
        ("player_statistics", "lineup_entries"),
        ("team_lineups", "lineup_entries"),
        ("statistic_periods", "statistic_groups"),
        ("statistic_groups", "statistic_items"),
        ("players", "goal_incidents"),
        ("events", "graph_points"),
    ];
    for (parent, child) in pairs {
        let (_, parent_last) = first_and_last(&rows, parent);
        let (child_first, _) = first_and_last(&rows, child);
        assert!(parent_last < child_first, "{parent} must precede {child}");
    }
}

#[test]
fn surrogate_rows_carry_ids_and_incidents_carry_their_kind() {
    let rows = emitted_rows();

    let (_, score) = rows
        .iter()
        .find(|(t, _)| t == "scores")
        .expect("score row");
    assert!(score["id"].is_u64());
    assert!(score.get("current").is_some());

    let goals: Vec<&Value> = rows
        .iter()
        .filter(|(t, _)| t == "goal_incidents")
        .map(|(_, row)| row)
        .collect();
    assert_eq!(goals.len(), 3);
    for goal in &goals {
        assert_eq!(goal["incident_type"], "goal");
        assert_eq!(goal["event_id"], 12436870);
        assert!(goal["player_id"].is_u64());
    }

    let (_, stats) = rows
        .iter()
        .find(|(t, _)| t == "player_statistics")
        .expect("player statistics row");
    assert!(stats.get("minutes_played").is_some());

    let (_, event) = rows
        .iter()
        .find(|(t, _)| t == "events")
        .expect("event row");
    assert_eq!(event["start_time"], "2024-12-10T19:00:00Z");
}

#[test]
fn json_lines_output_matches_row_count() {
    let payload: MatchPayload =
        serde_json::from_str(&read_fixture("football_match.json")).expect("fixture should parse");
    let conversion = convert_match(&payload).expect("conversion");

    let mut sink = JsonLinesSink::new(Vec::new());
    let n = emit(&conversion.bag, &mut sink).expect("emit");
    assert_eq!(sink.written(), n);

    let text = String::from_utf8(sink.into_inner()).expect("utf8");
    let mut tables = Vec::new();
    for line in text.lines() {
        let value: Value = serde_json::from_str(line).expect("json line");
        tables.push(value["table"].as_str().unwrap_or_default().to_string());
    }
    assert_eq!(tables.len(), conversion.bag.row_count());
    assert_eq!(tables.first().map(String::as_str), Some("sports"));
    assert_eq!(tables.last().map(String::as_str), Some("graph_points"));
}
