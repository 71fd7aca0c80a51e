use anyhow::Result;
use tracing::debug;

use crate::bag::RecordBag;
use crate::convert::{self, PlayerBundle};
use crate::error::ConvertError;
use crate::match_convert::{MatchContext, Skips};
use crate::rows::{
    CardIncident, GoalIncident, IncidentDetail, IncidentRow, InjuryTimeIncident, PeriodIncident,
    SubstitutionIncident, VarDecisionIncident,
};
use crate::schema::{IncidentSchema, IncidentsSchema, PlayerSchema};

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedIncident {
    pub row: IncidentRow,
    // players the row points at; absorbed as references only
    pub players: Vec<PlayerBundle>,
}

pub fn build(
    list: &IncidentsSchema,
    ctx: &MatchContext,
    bag: &mut RecordBag,
    skips: &mut Skips,
) -> Result<()> {
    let mut unsupported = 0usize;
    for incident in &list.incidents {
        match incident_row(incident, ctx.event_id) {
            Ok(Some(converted)) => {
                for player in converted.players {
                    bag.add_player_reference(player);
                }
                bag.push_incident(converted.row);
            }
            Ok(None) => unsupported += 1,
            Err(err) => skips.skip(err)?,
        }
    }
    if unsupported > 0 {
        debug!(
            match_id = ctx.match_id,
            unsupported, "ignored incidents of unsupported kinds"
        );
    }
    Ok(())
}

/// `Ok(None)` for incident kinds that have no table.
pub fn incident_row(
    incident: &IncidentSchema,
    event_id: u64,
) -> Result<Option<ConvertedIncident>, ConvertError> {
    let mut players = Vec::new();

    let row = match incident {
        IncidentSchema::Goal(goal) => {
            let Some(scorer) = goal.player.as_ref() else {
                return Err(ConvertError::malformed(
                    "goal incident",
                    format!("goal at minute {:?} has no scorer", goal.time),
                ));
            };
            let (Some(home_score), Some(away_score)) = (goal.home_score, goal.away_score) else {
                return Err(ConvertError::malformed(
                    "goal incident",
                    format!("goal at minute {:?} has no running score", goal.time),
                ));
            };
            let player_id = Some(reference(scorer, &mut players)?);
            let assist1_player_id = optional_reference(goal.assist1.as_ref(), &mut players);
            let assist2_player_id = optional_reference(goal.assist2.as_ref(), &mut players);
            IncidentRow {
                event_id,
                time: goal.time,
                added_time: goal.added_time,
                reversed_period_time: goal.reversed_period_time,
                is_home: goal.is_home,
                detail: IncidentDetail::Goal(GoalIncident {
                    home_score,
                    away_score,
                    incident_class: goal.incident_class.clone(),
                    player_id,
                    assist1_player_id,
                    assist2_player_id,
                }),
            }
        }
        IncidentSchema::Card(card) => {
            let player_id = optional_reference(card.player.as_ref(), &mut players);
            IncidentRow {
                event_id,
                time: card.time,
                added_time: card.added_time,
                reversed_period_time: card.reversed_period_time,
                is_home: card.is_home,
                detail: IncidentDetail::Card(CardIncident {
                    incident_class: card.incident_class.clone(),
                    player_name: card
                        .player_name
                        .clone()
                        .or_else(|| card.player.as_ref().and_then(|p| p.name.clone())),
                    reason: card.reason.clone(),
                    rescinded: card.rescinded,
                    player_id,
                }),
            }
        }
        IncidentSchema::Substitution(sub) => {
            let (Some(player_in), Some(player_out)) = (sub.player_in.as_ref(), sub.player_out.as_ref())
            else {
                return Err(ConvertError::malformed(
                    "substitution incident",
                    format!("substitution at minute {:?} is missing a player", sub.time),
                ));
            };
            let player_in_id = Some(reference(player_in, &mut players)?);
            let player_out_id = Some(reference(player_out, &mut players)?);
            IncidentRow {
                event_id,
                time: sub.time,
                added_time: sub.added_time,
                reversed_period_time: sub.reversed_period_time,
                is_home: sub.is_home,
                detail: IncidentDetail::Substitution(SubstitutionIncident {
                    incident_class: sub.incident_class.clone(),
                    injury: sub.injury,
                    player_in_id,
                    player_out_id,
                }),
            }
        }
        IncidentSchema::Period(period) => IncidentRow {
            event_id,
            time: period.time,
            added_time: period.added_time,
            reversed_period_time: period.reversed_period_time,
            is_home: None,
            detail: IncidentDetail::Period(PeriodIncident {
                text: period.text.clone(),
                home_score: period.home_score,
                away_score: period.away_score,
                is_live: period.is_live,
                time_seconds: period.time_seconds,
                reversed_period_time_seconds: period.reversed_period_time_seconds,
                period_time_seconds: period.period_time_seconds,
            }),
        },
        IncidentSchema::InjuryTime(injury) => IncidentRow {
            event_id,
            time: injury.time,
            added_time: injury.added_time,
            reversed_period_time: injury.reversed_period_time,
            is_home: None,
            detail: IncidentDetail::InjuryTime(InjuryTimeIncident {
                length: injury.length,
            }),
        },
        IncidentSchema::VarDecision(var) => {
            let player_id = optional_reference(var.player.as_ref(), &mut players);
            IncidentRow {
                event_id,
                time: var.time,
                added_time: var.added_time,
                reversed_period_time: var.reversed_period_time,
                is_home: var.is_home,
                detail: IncidentDetail::VarDecision(VarDecisionIncident {
                    confirmed: var.confirmed,
                    decision: var.decision.clone(),
                    reason: var.reason.clone(),
                    incident_class: var.incident_class.clone(),
                    player_id,
                }),
            }
        }
        IncidentSchema::Unsupported => return Ok(None),
    };

    Ok(Some(ConvertedIncident { row, players }))
}

fn reference(src: &PlayerSchema, players: &mut Vec<PlayerBundle>) -> Result<u64, ConvertError> {
    let bundle = convert::lineup_player(src)?;
    let id = bundle.player.id;
    players.push(bundle);
    Ok(id)
}

// A participant the incident can live without; one without an id is dropped.
fn optional_reference(src: Option<&PlayerSchema>, players: &mut Vec<PlayerBundle>) -> Option<u64> {
    match reference(src?, players) {
        Ok(id) => Some(id),
        Err(err) => {
            debug!(error = %err, "dropping player reference");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::incident_row;
    use crate::rows::IncidentDetail;
    use crate::schema::IncidentSchema;

    fn incident(value: serde_json::Value) -> IncidentSchema {
        serde_json::from_value(value).expect("incident json")
    }

    #[test]
    fn goal_carries_scorer_and_assist_references() {
        let src = incident(json!({
            "incidentType": "goal",
            "time": 33,
            "isHome": true,
            "homeScore": 1,
            "awayScore": 0,
            "incidentClass": "regular",
            "player": {"id": 814594, "name": "Rasmus Højlund"},
            "assist1": {"id": 288205, "name": "Bruno Fernandes"}
        }));
        let converted = incident_row(&src, 12436870).expect("ok").expect("supported");
        assert_eq!(converted.row.table(), "goal_incidents");
        assert_eq!(converted.row.player_refs(), vec![814594, 288205]);
        assert_eq!(converted.players.len(), 2);
        let IncidentDetail::Goal(goal) = &converted.row.detail else {
            panic!("expected a goal");
        };
        assert_eq!(goal.home_score, 1);
        assert_eq!(goal.assist2_player_id, None);
    }

    #[test]
    fn goal_without_scorer_is_malformed() {
        let src = incident(json!({"incidentType": "goal", "time": 12, "homeScore": 1, "awayScore": 0}));
        assert!(incident_row(&src, 1).is_err());
    }

    #[test]
    fn goal_without_running_score_is_malformed() {
        let src = incident(json!({
            "incidentType": "goal",
            "time": 12,
            "player": {"id": 814594, "name": "Rasmus Højlund"}
        }));
        assert!(incident_row(&src, 1).is_err());
    }

    #[test]
    fn optional_player_without_id_keeps_the_incident() {
        let card = incident(json!({
            "incidentType": "card",
            "time": 55,
            "incidentClass": "yellow",
            "player": {"name": "Declan Rice"},
            "isHome": false
        }));
        let converted = incident_row(&card, 1).expect("ok").expect("supported");
        assert!(converted.players.is_empty());
        let IncidentDetail::Card(row) = &converted.row.detail else {
            panic!("expected a card");
        };
        assert_eq!(row.player_id, None);
        assert_eq!(row.player_name.as_deref(), Some("Declan Rice"));

        let var = incident(json!({
            "incidentType": "varDecision",
            "time": 61,
            "confirmed": true,
            "player": {"name": "Unknown"}
        }));
        let converted = incident_row(&var, 1).expect("ok").expect("supported");
        assert!(converted.row.player_refs().is_empty());

        let goal = incident(json!({
            "incidentType": "goal",
            "time": 33,
            "homeScore": 1,
            "awayScore": 0,
            "player": {"id": 814594, "name": "Rasmus Højlund"},
            "assist1": {"name": "Unknown"}
        }));
        let converted = incident_row(&goal, 1).expect("ok").expect("supported");
        assert_eq!(converted.row.player_refs(), vec![814594]);
    }

    #[test]
    fn unknown_kinds_are_ignored() {
        let src = incident(json!({"incidentType": "penaltyShootout", "time": 120}));
        assert!(incident_row(&src, 1).expect("ok").is_none());
    }

    #[test]
    fn card_without_player_keeps_name_only() {
        let src = incident(json!({
            "incidentType": "card",
            "time": 70,
            "incidentClass": "yellow",
            "playerName": "Assistant coach",
            "isHome": false
        }));
        let converted = incident_row(&src, 1).expect("ok").expect("supported");
        assert!(converted.players.is_empty());
        assert_eq!(converted.row.table(), "card_incidents");
    }
}
