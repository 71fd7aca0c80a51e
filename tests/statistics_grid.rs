use std::collections::HashSet;

use serde_json::{Value, json};

use sofa_rows::match_convert::{Phase, convert_match};
use sofa_rows::schema::MatchPayload;

fn team(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "slug": name.to_lowercase(),
        "sport": {"id": 1, "name": "Football", "slug": "football"}
    })
}

fn grid_payload(periods: &[&str], groups: usize, items: usize) -> MatchPayload {
    let statistics: Vec<Value> = periods
        .iter()
        .map(|period| {
            let groups: Vec<Value> = (0..groups)
                .map(|g| {
                    let items: Vec<Value> = (0..items)
                        .map(|i| {
                            json!({
                                "key": format!("stat{g}_{i}"),
                                "name": format!("Stat {g}.{i}"),
                                "home": format!("{}", i + 1),
                                "away": format!("{}", i),
                                "compareCode": 1,
                                "statisticsType": "positive",
                                "valueType": "event",
                                "homeValue": i + 1,
                                "awayValue": i,
                                "renderType": 1
                            })
                        })
                        .collect();
                    json!({"groupName": format!("Group {g}"), "statisticsItems": items})
                })
                .collect();
            json!({"period": period, "groups": groups})
        })
        .collect();

    serde_json::from_value(json!({
        "matchId": 900,
        "base": {
            "event": {
                "id": 900,
                "slug": "home-away",
                "tournament": {
                    "id": 7,
                    "name": "UEFA Champions League",
                    "slug": "uefa-champions-league",
                    "category": {"id": 1465, "name": "Europe", "slug": "europe",
                                 "sport": {"id": 1, "name": "Football", "slug": "football"}}
                },
                "homeTeam": team(35, "Home"),
                "awayTeam": team(43, "Away")
            }
        },
        "stats": {"statistics": statistics}
    }))
    .expect("grid payload")
}

#[test]
fn two_by_three_by_five_grid_builds_linked_rows() {
    let payload = grid_payload(&["ALL", "1ST"], 3, 5);
    let conversion = convert_match(&payload).expect("conversion");
    assert!(conversion.succeeded(Phase::Stats));

    let bag = &conversion.bag;
    assert_eq!(bag.statistic_periods.len(), 2);
    assert_eq!(bag.statistic_groups.len(), 6);
    assert_eq!(bag.statistic_items.len(), 30);

    let period_ids: HashSet<_> = bag.statistic_periods.iter().map(|p| p.id).collect();
    let group_ids: HashSet<_> = bag.statistic_groups.iter().map(|g| g.id).collect();
    assert!(bag.statistic_periods.iter().all(|p| p.row.event_id == 900));
    assert!(bag.statistic_groups.iter().all(|g| period_ids.contains(&g.row.period_id)));
    assert!(bag.statistic_items.iter().all(|i| group_ids.contains(&i.row.group_id)));

    for period in &bag.statistic_periods {
        let groups: Vec<_> = bag
            .statistic_groups
            .iter()
            .filter(|g| g.row.period_id == period.id)
            .collect();
        assert_eq!(groups.len(), 3, "period {}", period.row.period);
        for group in groups {
            let items = bag
                .statistic_items
                .iter()
                .filter(|i| i.row.group_id == group.id)
                .count();
            assert_eq!(items, 5);
        }
    }
    assert!(bag.dangling().is_empty());
}

#[test]
fn empty_statistics_list_skips_the_phase() {
    let payload = grid_payload(&[], 0, 0);
    let conversion = convert_match(&payload).expect("conversion");
    assert!(!conversion.succeeded(Phase::Stats));
    assert!(conversion.bag.statistic_periods.is_empty());
}
