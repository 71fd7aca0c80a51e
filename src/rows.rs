use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

pub use crate::schema::PlayerStatisticsSchema as PlayerStatValues;

/// Surrogate id for rows the source never identifies (scores, colors,
/// lineup entries, statistics...). Unique within one `RecordBag`; renumbered
/// when bags are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LocalId(pub u32);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Local<T> {
    pub id: LocalId,
    #[serde(flatten)]
    pub row: T,
}

// ---------------------------------------------------------------------------
// Identity chain
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SportRow {
    pub id: u64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub alpha2: Option<String>,
    pub flag: Option<String>,
    pub sport_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TournamentRow {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub competition_type: Option<i32>,
    pub category_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonRow {
    pub id: u64,
    pub name: String,
    pub year: String,
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRow {
    pub alpha3: String,
    pub alpha2: Option<String>,
    pub name: String,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRow {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StadiumRow {
    pub name: String,
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueCoordinatesRow {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueRow {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub capacity: Option<u32>,
    pub city_id: Option<LocalId>,
    pub stadium_id: Option<LocalId>,
    pub coordinates_id: Option<LocalId>,
    pub country_alpha3: Option<String>,
}

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamColorsRow {
    pub primary: String,
    pub secondary: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagerRow {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub short_name: Option<String>,
    pub country_alpha3: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRow {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub short_name: Option<String>,
    pub name_code: Option<String>,
    pub gender: Option<String>,
    pub full_name: Option<String>,
    pub class: Option<i32>,
    pub national: Option<bool>,
    pub sport_id: Option<u64>,
    pub country_alpha3: Option<String>,
    pub team_colors_id: Option<LocalId>,
    pub manager_id: Option<u64>,
    pub venue_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefereeRow {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub yellow_red_cards: u32,
    pub games: u32,
    pub sport_id: Option<u64>,
    pub country_alpha3: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupPlayerRow {
    pub id: u64,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub slug: Option<String>,
    pub short_name: Option<String>,
    pub position: Option<String>,
    pub jersey_number: Option<String>,
    pub height: Option<u32>,
    pub user_count: Option<u64>,
    pub sofascore_id: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub market_value: Option<i64>,
    pub market_value_currency: Option<String>,
    pub country_alpha3: Option<String>,
}

// ---------------------------------------------------------------------------
// Event core
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusRow {
    pub code: i32,
    pub description: String,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeFootballRow {
    pub injury_time1: i32,
    pub injury_time2: i32,
    pub current_period_start: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub current: i32,
    pub display: i32,
    pub period1: i32,
    pub period2: i32,
    pub normaltime: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundInfoRow {
    pub round: i32,
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRow {
    pub id: u64,
    pub slug: String,
    pub start_time: Option<DateTime<Utc>>,
    pub winner_code: Option<i32>,
    pub has_global_highlights: bool,
    pub has_xg: bool,
    pub has_event_player_statistics: bool,
    pub has_event_player_heat_map: bool,
    pub attendance: Option<u32>,
    pub default_period_count: Option<i32>,
    pub default_period_length: Option<i32>,
    pub default_overtime_length: Option<i32>,
    pub current_period_start: Option<DateTime<Utc>>,
    pub fan_rating_event: Option<bool>,
    pub season_statistics_type: Option<String>,
    pub show_toto_promo: Option<bool>,
    pub status_code: Option<i32>,
    pub time_id: Option<LocalId>,
    pub tournament_id: u64,
    pub season_id: Option<u64>,
    pub round_info_id: Option<LocalId>,
    pub home_score_id: Option<LocalId>,
    pub away_score_id: Option<LocalId>,
    pub home_team_id: u64,
    pub away_team_id: u64,
    pub venue_id: Option<u64>,
    pub referee_id: Option<u64>,
}

// ---------------------------------------------------------------------------
// Lineups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootballLineupRow {
    pub confirmed: bool,
    pub event_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerColorRow {
    pub primary: Option<String>,
    pub number: Option<String>,
    pub outline: Option<String>,
    pub fancy_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamLineupRow {
    pub formation: Option<String>,
    pub is_home: bool,
    pub team_id: u64,
    pub player_color_id: Option<LocalId>,
    pub goalkeeper_color_id: Option<LocalId>,
    pub lineup_id: LocalId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStatisticsRow {
    #[serde(flatten)]
    pub values: PlayerStatValues,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupPlayerEntryRow {
    pub shirt_number: Option<u32>,
    pub jersey_number: Option<String>,
    pub position: Option<String>,
    pub substitute: bool,
    pub captain: Option<bool>,
    pub player_id: u64,
    pub team_id: u64,
    pub statistics_id: Option<LocalId>,
    pub team_lineup_id: LocalId,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticPeriodRow {
    pub period: String,
    pub event_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticGroupRow {
    pub group_name: String,
    pub period_id: LocalId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticItemRow {
    pub key: Option<String>,
    pub name: String,
    pub home: String,
    pub away: String,
    pub compare_code: i32,
    pub statistics_type: String,
    pub value_type: String,
    pub home_value: f64,
    pub away_value: f64,
    pub render_type: i32,
    pub home_total: Option<i32>,
    pub away_total: Option<i32>,
    pub group_id: LocalId,
}

// ---------------------------------------------------------------------------
// Incidents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentRow {
    pub event_id: u64,
    pub time: Option<i32>,
    pub added_time: Option<i32>,
    pub reversed_period_time: Option<i32>,
    pub is_home: Option<bool>,
    #[serde(flatten)]
    pub detail: IncidentDetail,
}

impl IncidentRow {
    pub fn table(&self) -> &'static str {
        self.detail.table()
    }

    /// Player ids this incident points at, in field order.
    pub fn player_refs(&self) -> Vec<u64> {
        match &self.detail {
            IncidentDetail::Goal(goal) => [goal.player_id, goal.assist1_player_id, goal.assist2_player_id]
                .into_iter()
                .flatten()
                .collect(),
            IncidentDetail::Card(card) => card.player_id.into_iter().collect(),
            IncidentDetail::Substitution(sub) => [sub.player_in_id, sub.player_out_id]
                .into_iter()
                .flatten()
                .collect(),
            IncidentDetail::VarDecision(var) => var.player_id.into_iter().collect(),
            IncidentDetail::Period(_) | IncidentDetail::InjuryTime(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "incident_type", rename_all = "snake_case")]
pub enum IncidentDetail {
    Goal(GoalIncident),
    Card(CardIncident),
    Substitution(SubstitutionIncident),
    Period(PeriodIncident),
    InjuryTime(InjuryTimeIncident),
    VarDecision(VarDecisionIncident),
}

impl IncidentDetail {
    pub fn table(&self) -> &'static str {
        match self {
            IncidentDetail::Goal(_) => "goal_incidents",
            IncidentDetail::Card(_) => "card_incidents",
            IncidentDetail::Substitution(_) => "substitution_incidents",
            IncidentDetail::Period(_) => "period_incidents",
            IncidentDetail::InjuryTime(_) => "injury_time_incidents",
            IncidentDetail::VarDecision(_) => "var_decision_incidents",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalIncident {
    pub home_score: i32,
    pub away_score: i32,
    pub incident_class: Option<String>,
    pub player_id: Option<u64>,
    pub assist1_player_id: Option<u64>,
    pub assist2_player_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardIncident {
    pub incident_class: Option<String>,
    pub player_name: Option<String>,
    pub reason: Option<String>,
    pub rescinded: Option<bool>,
    pub player_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubstitutionIncident {
    pub incident_class: Option<String>,
    pub injury: bool,
    pub player_in_id: Option<u64>,
    pub player_out_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodIncident {
    pub text: String,
    pub home_score: i32,
    pub away_score: i32,
    pub is_live: bool,
    pub time_seconds: Option<i32>,
    pub reversed_period_time_seconds: Option<i32>,
    pub period_time_seconds: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InjuryTimeIncident {
    pub length: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarDecisionIncident {
    pub confirmed: Option<bool>,
    pub decision: Option<String>,
    pub reason: Option<String>,
    pub incident_class: Option<String>,
    pub player_id: Option<u64>,
}

// ---------------------------------------------------------------------------
// Momentum graph
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphPointRow {
    // Fractional minutes mark added time (45.5, 90.5).
    pub minute: f64,
    // Positive favours the home side.
    pub value: i32,
    pub event_id: u64,
}
