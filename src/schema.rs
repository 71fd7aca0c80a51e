// Source payload shapes, as delivered by the scraper (camelCase JSON).
//
// Anything the upstream API is known to omit is `Option`; lists default to
// empty. Converters decide what is mandatory, not the deserializer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPayload {
    pub match_id: u64,
    #[serde(default)]
    pub base: Option<DetailsSchema>,
    #[serde(default)]
    pub stats: Option<StatsSchema>,
    #[serde(default)]
    pub lineup: Option<LineupsSchema>,
    #[serde(default)]
    pub incidents: Option<IncidentsSchema>,
    #[serde(default)]
    pub graph: Option<GraphSchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailsSchema {
    #[serde(default)]
    pub event: Option<EventSchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TournamentPayload {
    #[serde(default)]
    pub tournament: Option<TournamentSchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonsPayload {
    #[serde(default)]
    pub seasons: Vec<SeasonSchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventsPayload {
    #[serde(default)]
    pub events: Vec<EventSchema>,
}

// ---------------------------------------------------------------------------
// Identity chain
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SportSchema {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategorySchema {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub alpha2: Option<String>,
    #[serde(default)]
    pub sport: Option<SportSchema>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSchema {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub competition_type: Option<i32>,
    #[serde(default)]
    pub category: Option<CategorySchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonSchema {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub year: String,
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CountrySchema {
    #[serde(default)]
    pub alpha2: Option<String>,
    #[serde(default)]
    pub alpha3: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CitySchema {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StadiumSchema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueCoordinatesSchema {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueSchema {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub city: Option<CitySchema>,
    #[serde(default)]
    pub stadium: Option<StadiumSchema>,
    #[serde(default)]
    pub venue_coordinates: Option<VenueCoordinatesSchema>,
    #[serde(default)]
    pub country: Option<CountrySchema>,
}

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct TeamColorsSchema {
    #[serde(default)]
    pub primary: String,
    #[serde(default)]
    pub secondary: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSchema {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub country: Option<CountrySchema>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSchema {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub name_code: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, rename = "class")]
    pub class: Option<i32>,
    #[serde(default)]
    pub national: Option<bool>,
    #[serde(default)]
    pub sport: Option<SportSchema>,
    #[serde(default)]
    pub country: Option<CountrySchema>,
    #[serde(default)]
    pub team_colors: Option<TeamColorsSchema>,
    #[serde(default)]
    pub manager: Option<ManagerSchema>,
    #[serde(default)]
    pub venue: Option<VenueSchema>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefereeSchema {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub yellow_cards: u32,
    #[serde(default)]
    pub red_cards: u32,
    #[serde(default)]
    pub yellow_red_cards: u32,
    #[serde(default)]
    pub games: u32,
    #[serde(default)]
    pub sport: Option<SportSchema>,
    #[serde(default)]
    pub country: Option<CountrySchema>,
}

// ---------------------------------------------------------------------------
// Event core
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct StatusSchema {
    pub code: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeFootballSchema {
    #[serde(default)]
    pub injury_time1: i32,
    #[serde(default)]
    pub injury_time2: i32,
    #[serde(default)]
    pub current_period_start_timestamp: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreSchema {
    #[serde(default)]
    pub current: i32,
    #[serde(default)]
    pub display: i32,
    #[serde(default)]
    pub period1: i32,
    #[serde(default)]
    pub period2: i32,
    #[serde(default)]
    pub normaltime: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoundInfoSchema {
    pub round: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSchema {
    pub id: u64,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub start_timestamp: Option<i64>,
    #[serde(default)]
    pub winner_code: Option<i32>,
    #[serde(default)]
    pub has_global_highlights: bool,
    #[serde(default)]
    pub has_xg: bool,
    #[serde(default)]
    pub has_event_player_statistics: bool,
    #[serde(default)]
    pub has_event_player_heat_map: bool,
    #[serde(default)]
    pub attendance: Option<u32>,
    #[serde(default)]
    pub default_period_count: Option<i32>,
    #[serde(default)]
    pub default_period_length: Option<i32>,
    #[serde(default)]
    pub default_overtime_length: Option<i32>,
    #[serde(default)]
    pub current_period_start_timestamp: Option<i64>,
    #[serde(default)]
    pub fan_rating_event: Option<bool>,
    #[serde(default)]
    pub season_statistics_type: Option<String>,
    #[serde(default)]
    pub show_toto_promo: Option<bool>,
    #[serde(default)]
    pub tournament: Option<TournamentSchema>,
    #[serde(default)]
    pub season: Option<SeasonSchema>,
    #[serde(default)]
    pub round_info: Option<RoundInfoSchema>,
    #[serde(default)]
    pub status: Option<StatusSchema>,
    #[serde(default)]
    pub home_team: Option<TeamSchema>,
    #[serde(default)]
    pub away_team: Option<TeamSchema>,
    #[serde(default)]
    pub home_score: Option<ScoreSchema>,
    #[serde(default)]
    pub away_score: Option<ScoreSchema>,
    #[serde(default)]
    pub time: Option<TimeFootballSchema>,
    #[serde(default)]
    pub venue: Option<VenueSchema>,
    #[serde(default)]
    pub referee: Option<RefereeSchema>,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct StatsSchema {
    #[serde(default)]
    pub statistics: Vec<StatisticPeriodSchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatisticPeriodSchema {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub groups: Vec<StatisticGroupSchema>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticGroupSchema {
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub statistics_items: Vec<StatisticItemSchema>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticItemSchema {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub home: String,
    #[serde(default)]
    pub away: String,
    #[serde(default)]
    pub compare_code: i32,
    #[serde(default)]
    pub statistics_type: String,
    #[serde(default)]
    pub value_type: String,
    #[serde(default)]
    pub home_value: Option<f64>,
    #[serde(default)]
    pub away_value: Option<f64>,
    #[serde(default)]
    pub render_type: i32,
    #[serde(default)]
    pub home_total: Option<i32>,
    #[serde(default)]
    pub away_total: Option<i32>,
}

// ---------------------------------------------------------------------------
// Lineups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LineupsSchema {
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub home: Option<TeamLineupSchema>,
    #[serde(default)]
    pub away: Option<TeamLineupSchema>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamLineupSchema {
    #[serde(default)]
    pub players: Vec<LineupEntrySchema>,
    #[serde(default)]
    pub formation: Option<String>,
    #[serde(default)]
    pub player_color: Option<PlayerColorSchema>,
    #[serde(default)]
    pub goalkeeper_color: Option<PlayerColorSchema>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerColorSchema {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub outline: Option<String>,
    #[serde(default)]
    pub fancy_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupEntrySchema {
    #[serde(default)]
    pub player: Option<PlayerSchema>,
    #[serde(default)]
    pub team_id: Option<u64>,
    #[serde(default)]
    pub shirt_number: Option<u32>,
    #[serde(default)]
    pub jersey_number: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub substitute: bool,
    #[serde(default)]
    pub captain: Option<bool>,
    #[serde(default)]
    pub statistics: Option<PlayerStatisticsSchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketValueSchema {
    pub value: i64,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSchema {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub jersey_number: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub user_count: Option<u64>,
    #[serde(default)]
    pub sofascore_id: Option<String>,
    #[serde(default)]
    pub date_of_birth_timestamp: Option<i64>,
    #[serde(default)]
    pub market_value_currency: Option<String>,
    #[serde(default)]
    pub proposed_market_value_raw: Option<MarketValueSchema>,
    #[serde(default)]
    pub country: Option<CountrySchema>,
}

/// Per-player match statistics. Shared verbatim with the row layer, every
/// field is optional because the upstream feed only sends what was recorded.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct PlayerStatisticsSchema {
    // passing
    pub total_pass: Option<i32>,
    pub accurate_pass: Option<i32>,
    pub total_long_balls: Option<i32>,
    pub accurate_long_balls: Option<i32>,
    pub goal_assist: Option<i32>,
    pub total_cross: Option<i32>,
    pub accurate_cross: Option<i32>,
    pub key_pass: Option<i32>,
    // defending
    pub aerial_lost: Option<i32>,
    pub aerial_won: Option<i32>,
    pub duel_lost: Option<i32>,
    pub duel_won: Option<i32>,
    pub challenge_lost: Option<i32>,
    pub total_contest: Option<i32>,
    pub won_contest: Option<i32>,
    pub total_clearance: Option<i32>,
    pub outfielder_block: Option<i32>,
    pub interception_won: Option<i32>,
    pub total_tackle: Option<i32>,
    // general
    pub was_fouled: Option<i32>,
    pub fouls: Option<i32>,
    pub total_offside: Option<i32>,
    pub minutes_played: Option<i32>,
    pub touches: Option<i32>,
    pub rating: Option<f64>,
    pub dispossessed: Option<i32>,
    pub possession_lost_ctrl: Option<i32>,
    // advanced
    pub expected_goals: Option<f64>,
    pub expected_assists: Option<f64>,
    // goalkeeping
    pub good_high_claim: Option<i32>,
    pub saved_shots_from_inside_the_box: Option<i32>,
    pub saves: Option<i32>,
    pub total_keeper_sweeper: Option<i32>,
    pub accurate_keeper_sweeper: Option<i32>,
    pub goals_prevented: Option<f64>,
    pub error_lead_to_a_shot: Option<i32>,
    pub punches: Option<i32>,
    // attacking
    pub big_chance_created: Option<i32>,
    pub big_chance_missed: Option<i32>,
    pub shot_off_target: Option<i32>,
    pub on_target_scoring_attempt: Option<i32>,
    pub blocked_scoring_attempt: Option<i32>,
    pub goals: Option<i32>,
}

// ---------------------------------------------------------------------------
// Incidents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct IncidentsSchema {
    #[serde(default)]
    pub incidents: Vec<IncidentSchema>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "incidentType", rename_all = "camelCase")]
pub enum IncidentSchema {
    Goal(GoalIncidentSchema),
    Card(CardIncidentSchema),
    Substitution(SubstitutionIncidentSchema),
    Period(PeriodIncidentSchema),
    InjuryTime(InjuryTimeIncidentSchema),
    VarDecision(VarDecisionIncidentSchema),
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalIncidentSchema {
    #[serde(default)]
    pub time: Option<i32>,
    #[serde(default)]
    pub added_time: Option<i32>,
    #[serde(default)]
    pub reversed_period_time: Option<i32>,
    #[serde(default)]
    pub is_home: Option<bool>,
    #[serde(default)]
    pub home_score: Option<i32>,
    #[serde(default)]
    pub away_score: Option<i32>,
    #[serde(default)]
    pub incident_class: Option<String>,
    #[serde(default)]
    pub player: Option<PlayerSchema>,
    #[serde(default)]
    pub assist1: Option<PlayerSchema>,
    #[serde(default)]
    pub assist2: Option<PlayerSchema>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardIncidentSchema {
    #[serde(default)]
    pub time: Option<i32>,
    #[serde(default)]
    pub added_time: Option<i32>,
    #[serde(default)]
    pub reversed_period_time: Option<i32>,
    #[serde(default)]
    pub is_home: Option<bool>,
    #[serde(default)]
    pub incident_class: Option<String>,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub rescinded: Option<bool>,
    #[serde(default)]
    pub player: Option<PlayerSchema>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutionIncidentSchema {
    #[serde(default)]
    pub time: Option<i32>,
    #[serde(default)]
    pub added_time: Option<i32>,
    #[serde(default)]
    pub reversed_period_time: Option<i32>,
    #[serde(default)]
    pub is_home: Option<bool>,
    #[serde(default)]
    pub incident_class: Option<String>,
    #[serde(default)]
    pub injury: bool,
    #[serde(default)]
    pub player_in: Option<PlayerSchema>,
    #[serde(default)]
    pub player_out: Option<PlayerSchema>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodIncidentSchema {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub home_score: i32,
    #[serde(default)]
    pub away_score: i32,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default)]
    pub time: Option<i32>,
    #[serde(default)]
    pub added_time: Option<i32>,
    #[serde(default)]
    pub time_seconds: Option<i32>,
    #[serde(default)]
    pub reversed_period_time: Option<i32>,
    #[serde(default)]
    pub reversed_period_time_seconds: Option<i32>,
    #[serde(default)]
    pub period_time_seconds: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjuryTimeIncidentSchema {
    #[serde(default)]
    pub length: i32,
    #[serde(default)]
    pub time: Option<i32>,
    #[serde(default)]
    pub added_time: Option<i32>,
    #[serde(default)]
    pub reversed_period_time: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VarDecisionIncidentSchema {
    #[serde(default)]
    pub time: Option<i32>,
    #[serde(default)]
    pub added_time: Option<i32>,
    #[serde(default)]
    pub reversed_period_time: Option<i32>,
    #[serde(default)]
    pub is_home: Option<bool>,
    #[serde(default)]
    pub incident_class: Option<String>,
    #[serde(default)]
    pub confirmed: Option<bool>,
    #[serde(default)]
    pub decision: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub player: Option<PlayerSchema>,
}

// ---------------------------------------------------------------------------
// Momentum graph
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSchema {
    #[serde(default)]
    pub graph_points: Vec<GraphPointSchema>,
    #[serde(default)]
    pub period_time: Option<i32>,
    #[serde(default)]
    pub period_count: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphPointSchema {
    pub minute: f64,
    pub value: i32,
}
