use std::collections::{BTreeSet, HashMap, HashSet};

use crate::convert::{
    CategoryBundle, EventBundle, ManagerBundle, PlayerBundle, RefereeBundle, TeamBundle,
    TournamentBundle, VenueBundle,
};
use crate::dedup::{ConflictPolicy, DedupStats, EntityTable, Insert, Keyed};
use crate::rows::{
    CategoryRow, CityRow, CountryRow, EventRow, FootballLineupRow, GraphPointRow, IncidentRow,
    LineupPlayerEntryRow, LineupPlayerRow, Local, LocalId, ManagerRow, PlayerColorRow,
    PlayerStatisticsRow, RefereeRow, RoundInfoRow, ScoreRow, SeasonRow, SportRow, StadiumRow,
    StatisticGroupRow, StatisticItemRow, StatisticPeriodRow, StatusRow, TeamColorsRow,
    TeamLineupRow, TeamRow, TimeFootballRow, TournamentRow, VenueCoordinatesRow, VenueRow,
};

pub const INCIDENT_TABLES: [&str; 6] = [
    "goal_incidents",
    "card_incidents",
    "substitution_incidents",
    "period_incidents",
    "injury_time_incidents",
    "var_decision_incidents",
];

/// Rows produced by one conversion. Identity tables are deduplicated by
/// natural key; per-match children are plain lists. Surrogate ids come from a
/// single counter, so a `LocalId` is unique across every table of the bag.
#[derive(Debug, Clone)]
pub struct RecordBag {
    next_id: u32,
    // players that were only seen as incident references
    player_refs: BTreeSet<u64>,
    pub sports: EntityTable<SportRow>,
    pub countries: EntityTable<CountryRow>,
    pub categories: EntityTable<CategoryRow>,
    pub tournaments: EntityTable<TournamentRow>,
    pub seasons: EntityTable<SeasonRow>,
    pub cities: EntityTable<Local<CityRow>>,
    pub stadiums: EntityTable<Local<StadiumRow>>,
    pub venue_coordinates: EntityTable<Local<VenueCoordinatesRow>>,
    pub venues: EntityTable<VenueRow>,
    pub team_colors: EntityTable<Local<TeamColorsRow>>,
    pub managers: EntityTable<ManagerRow>,
    pub teams: EntityTable<TeamRow>,
    pub referees: EntityTable<RefereeRow>,
    pub statuses: EntityTable<StatusRow>,
    pub round_infos: EntityTable<Local<RoundInfoRow>>,
    pub times: Vec<Local<TimeFootballRow>>,
    pub scores: Vec<Local<ScoreRow>>,
    pub events: EntityTable<EventRow>,
    pub player_colors: EntityTable<Local<PlayerColorRow>>,
    pub players: EntityTable<LineupPlayerRow>,
    pub lineups: Vec<Local<FootballLineupRow>>,
    pub team_lineups: Vec<Local<TeamLineupRow>>,
    pub player_statistics: Vec<Local<PlayerStatisticsRow>>,
    pub lineup_entries: Vec<Local<LineupPlayerEntryRow>>,
    pub statistic_periods: Vec<Local<StatisticPeriodRow>>,
    pub statistic_groups: Vec<Local<StatisticGroupRow>>,
    pub statistic_items: Vec<Local<StatisticItemRow>>,
    pub incidents: Vec<Local<IncidentRow>>,
    pub graph_points: Vec<Local<GraphPointRow>>,
}

impl Default for RecordBag {
    fn default() -> Self {
        Self::new(ConflictPolicy::default())
    }
}

impl RecordBag {
    pub fn new(policy: ConflictPolicy) -> Self {
        Self {
            next_id: 0,
            player_refs: BTreeSet::new(),
            sports: EntityTable::new("sports", policy),
            countries: EntityTable::new("countries", policy),
            categories: EntityTable::new("categories", policy),
            tournaments: EntityTable::new("tournaments", policy),
            seasons: EntityTable::new("seasons", policy),
            cities: EntityTable::new("cities", policy),
            stadiums: EntityTable::new("stadiums", policy),
            venue_coordinates: EntityTable::new("venue_coordinates", policy),
            venues: EntityTable::new("venues", policy),
            team_colors: EntityTable::new("team_colors", policy),
            managers: EntityTable::new("managers", policy),
            teams: EntityTable::new("teams", policy),
            referees: EntityTable::new("referees", policy),
            statuses: EntityTable::new("statuses", policy),
            round_infos: EntityTable::new("round_infos", policy),
            times: Vec::new(),
            scores: Vec::new(),
            events: EntityTable::new("events", policy),
            player_colors: EntityTable::new("player_colors", policy),
            players: EntityTable::new("players", policy),
            lineups: Vec::new(),
            team_lineups: Vec::new(),
            player_statistics: Vec::new(),
            lineup_entries: Vec::new(),
            statistic_periods: Vec::new(),
            statistic_groups: Vec::new(),
            statistic_items: Vec::new(),
            incidents: Vec::new(),
            graph_points: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Identity chain
    // -----------------------------------------------------------------------

    pub fn add_sport(&mut self, row: SportRow) -> u64 {
        let id = row.id;
        self.sports.insert(row);
        id
    }

    pub fn add_country(&mut self, row: CountryRow) -> String {
        let alpha3 = row.alpha3.clone();
        self.countries.insert(row);
        alpha3
    }

    pub fn add_category(&mut self, bundle: CategoryBundle) -> u64 {
        self.add_sport(bundle.sport);
        let id = bundle.category.id;
        self.categories.insert(bundle.category);
        id
    }

    pub fn add_tournament(&mut self, bundle: TournamentBundle) -> u64 {
        self.add_category(CategoryBundle {
            sport: bundle.sport,
            category: bundle.category,
        });
        let id = bundle.tournament.id;
        self.tournaments.insert(bundle.tournament);
        id
    }

    pub fn add_season(&mut self, row: SeasonRow) -> u64 {
        let id = row.id;
        self.seasons.insert(row);
        id
    }

    // -----------------------------------------------------------------------
    // Location and participants
    // -----------------------------------------------------------------------

    pub fn add_venue(&mut self, bundle: VenueBundle) -> u64 {
        let VenueBundle {
            country,
            city,
            stadium,
            coordinates,
            mut venue,
        } = bundle;
        if let Some(country) = country {
            self.add_country(country);
        }
        venue.city_id = city.map(|row| intern(&mut self.cities, &mut self.next_id, row));
        venue.stadium_id = stadium.map(|row| intern(&mut self.stadiums, &mut self.next_id, row));
        venue.coordinates_id =
            coordinates.map(|row| intern(&mut self.venue_coordinates, &mut self.next_id, row));
        let id = venue.id;
        if self.venues.insert(venue) == Insert::Conflict {
            self.prune_unreferenced();
        }
        id
    }

    pub fn add_manager(&mut self, bundle: ManagerBundle) -> u64 {
        if let Some(country) = bundle.country {
            self.add_country(country);
        }
        let id = bundle.manager.id;
        self.managers.insert(bundle.manager);
        id
    }

    pub fn add_team(&mut self, bundle: TeamBundle) -> u64 {
        let TeamBundle {
            sport,
            country,
            colors,
            manager,
            venue,
            mut team,
        } = bundle;
        if let Some(sport) = sport {
            self.add_sport(sport);
        }
        if let Some(country) = country {
            self.add_country(country);
        }
        if let Some(manager) = manager {
            self.add_manager(manager);
        }
        if let Some(venue) = venue {
            self.add_venue(venue);
        }
        team.team_colors_id = colors.map(|row| intern(&mut self.team_colors, &mut self.next_id, row));
        let id = team.id;
        if self.teams.insert(team) == Insert::Conflict {
            self.prune_unreferenced();
        }
        id
    }

    pub fn add_referee(&mut self, bundle: RefereeBundle) -> u64 {
        if let Some(sport) = bundle.sport {
            self.add_sport(sport);
        }
        if let Some(country) = bundle.country {
            self.add_country(country);
        }
        let id = bundle.referee.id;
        self.referees.insert(bundle.referee);
        id
    }

    pub fn add_player(&mut self, bundle: PlayerBundle) -> u64 {
        if let Some(country) = bundle.country {
            self.add_country(country);
        }
        let id = bundle.player.id;
        if self.player_refs.remove(&id) {
            self.players.replace(bundle.player);
        } else {
            self.players.insert(bundle.player);
        }
        id
    }

    /// Player seen only as an incident participant. Never overrides a row
    /// that came from a lineup.
    pub fn add_player_reference(&mut self, bundle: PlayerBundle) -> u64 {
        if let Some(country) = bundle.country {
            self.countries.insert_if_absent(country);
        }
        let id = bundle.player.id;
        if self.players.insert_if_absent(bundle.player) {
            self.player_refs.insert(id);
        }
        id
    }

    pub fn add_player_color(&mut self, row: PlayerColorRow) -> LocalId {
        intern(&mut self.player_colors, &mut self.next_id, row)
    }

    // -----------------------------------------------------------------------
    // Event core
    // -----------------------------------------------------------------------

    /// Absorbs an event with every row it depends on. Re-absorbing an event
    /// with equal time and score values reuses its rows; different values
    /// make the event a conflict, settled by the bag's policy together with
    /// its time and score rows.
    pub fn add_event(&mut self, bundle: EventBundle) -> u64 {
        let EventBundle {
            tournament,
            season,
            home,
            away,
            status,
            round_info,
            time,
            home_score,
            away_score,
            venue,
            referee,
            mut event,
        } = bundle;

        self.add_tournament(tournament);
        if let Some(season) = season {
            self.add_season(season);
        }
        if let Some(venue) = venue {
            self.add_venue(venue);
        }
        self.add_team(home);
        self.add_team(away);
        if let Some(referee) = referee {
            self.add_referee(referee);
        }
        if let Some(status) = status {
            self.statuses.insert(status);
        }
        event.round_info_id =
            round_info.map(|row| intern(&mut self.round_infos, &mut self.next_id, row));

        let reusable = self.events.get(&event.id).filter(|existing| {
            same_row(&self.times, existing.time_id, time.as_ref())
                && same_row(&self.scores, existing.home_score_id, home_score.as_ref())
                && same_row(&self.scores, existing.away_score_id, away_score.as_ref())
        });
        if let Some(existing) = reusable {
            event.time_id = existing.time_id;
            event.home_score_id = existing.home_score_id;
            event.away_score_id = existing.away_score_id;
        } else {
            event.time_id = time.map(|row| push(&mut self.times, &mut self.next_id, row));
            event.home_score_id = home_score.map(|row| push(&mut self.scores, &mut self.next_id, row));
            event.away_score_id = away_score.map(|row| push(&mut self.scores, &mut self.next_id, row));
        }

        let id = event.id;
        if self.events.insert(event) == Insert::Conflict {
            self.prune_unreferenced();
        }
        id
    }

    // -----------------------------------------------------------------------
    // Per-match children
    // -----------------------------------------------------------------------

    pub fn push_lineup(&mut self, row: FootballLineupRow) -> LocalId {
        push(&mut self.lineups, &mut self.next_id, row)
    }

    pub fn push_team_lineup(&mut self, row: TeamLineupRow) -> LocalId {
        push(&mut self.team_lineups, &mut self.next_id, row)
    }

    pub fn push_player_statistics(&mut self, row: PlayerStatisticsRow) -> LocalId {
        push(&mut self.player_statistics, &mut self.next_id, row)
    }

    pub fn push_lineup_entry(&mut self, row: LineupPlayerEntryRow) -> LocalId {
        push(&mut self.lineup_entries, &mut self.next_id, row)
    }

    pub fn push_statistic_period(&mut self, row: StatisticPeriodRow) -> LocalId {
        push(&mut self.statistic_periods, &mut self.next_id, row)
    }

    pub fn push_statistic_group(&mut self, row: StatisticGroupRow) -> LocalId {
        push(&mut self.statistic_groups, &mut self.next_id, row)
    }

    pub fn push_statistic_item(&mut self, row: StatisticItemRow) -> LocalId {
        push(&mut self.statistic_items, &mut self.next_id, row)
    }

    pub fn push_incident(&mut self, row: IncidentRow) -> LocalId {
        push(&mut self.incidents, &mut self.next_id, row)
    }

    pub fn push_graph_point(&mut self, row: GraphPointRow) -> LocalId {
        push(&mut self.graph_points, &mut self.next_id, row)
    }

    // -----------------------------------------------------------------------
    // Merge
    // -----------------------------------------------------------------------

    /// Moves every row of `other` into this bag, parent tables first. Incoming
    /// surrogate ids are renumbered and every surrogate FK is rewritten.
    pub fn merge(&mut self, other: RecordBag) {
        let mut remap: HashMap<LocalId, LocalId> = HashMap::new();

        // Events already present with equal time and scores share those rows.
        for incoming in other.events.iter() {
            let Some(existing) = self.events.get(&incoming.id) else {
                continue;
            };
            let same = same_row(
                &self.times,
                existing.time_id,
                find_row(&other.times, incoming.time_id),
            ) && same_row(
                &self.scores,
                existing.home_score_id,
                find_row(&other.scores, incoming.home_score_id),
            ) && same_row(
                &self.scores,
                existing.away_score_id,
                find_row(&other.scores, incoming.away_score_id),
            );
            if same {
                link(&mut remap, incoming.time_id, existing.time_id);
                link(&mut remap, incoming.home_score_id, existing.home_score_id);
                link(&mut remap, incoming.away_score_id, existing.away_score_id);
            }
        }

        let RecordBag {
            next_id: _,
            player_refs,
            sports,
            countries,
            categories,
            tournaments,
            seasons,
            cities,
            stadiums,
            venue_coordinates,
            venues,
            team_colors,
            managers,
            teams,
            referees,
            statuses,
            round_infos,
            times,
            scores,
            events,
            player_colors,
            players,
            lineups,
            team_lineups,
            player_statistics,
            lineup_entries,
            statistic_periods,
            statistic_groups,
            statistic_items,
            incidents,
            graph_points,
        } = other;

        for row in sports.into_rows() {
            self.sports.insert(row);
        }
        for row in countries.into_rows() {
            self.countries.insert(row);
        }
        for row in categories.into_rows() {
            self.categories.insert(row);
        }
        for row in tournaments.into_rows() {
            self.tournaments.insert(row);
        }
        for row in seasons.into_rows() {
            self.seasons.insert(row);
        }
        for local in cities.into_rows() {
            let id = intern(&mut self.cities, &mut self.next_id, local.row);
            remap.insert(local.id, id);
        }
        for local in stadiums.into_rows() {
            let id = intern(&mut self.stadiums, &mut self.next_id, local.row);
            remap.insert(local.id, id);
        }
        for local in venue_coordinates.into_rows() {
            let id = intern(&mut self.venue_coordinates, &mut self.next_id, local.row);
            remap.insert(local.id, id);
        }
        for mut row in venues.into_rows() {
            row.city_id = remapped(&remap, row.city_id);
            row.stadium_id = remapped(&remap, row.stadium_id);
            row.coordinates_id = remapped(&remap, row.coordinates_id);
            self.venues.insert(row);
        }
        for local in team_colors.into_rows() {
            let id = intern(&mut self.team_colors, &mut self.next_id, local.row);
            remap.insert(local.id, id);
        }
        for row in managers.into_rows() {
            self.managers.insert(row);
        }
        for mut row in teams.into_rows() {
            row.team_colors_id = remapped(&remap, row.team_colors_id);
            self.teams.insert(row);
        }
        for row in referees.into_rows() {
            self.referees.insert(row);
        }
        for row in statuses.into_rows() {
            self.statuses.insert(row);
        }
        for local in round_infos.into_rows() {
            let id = intern(&mut self.round_infos, &mut self.next_id, local.row);
            remap.insert(local.id, id);
        }
        for local in times {
            if remap.contains_key(&local.id) {
                continue;
            }
            let id = push(&mut self.times, &mut self.next_id, local.row);
            remap.insert(local.id, id);
        }
        for local in scores {
            if remap.contains_key(&local.id) {
                continue;
            }
            let id = push(&mut self.scores, &mut self.next_id, local.row);
            remap.insert(local.id, id);
        }
        for mut row in events.into_rows() {
            row.time_id = remapped(&remap, row.time_id);
            row.round_info_id = remapped(&remap, row.round_info_id);
            row.home_score_id = remapped(&remap, row.home_score_id);
            row.away_score_id = remapped(&remap, row.away_score_id);
            self.events.insert(row);
        }
        for local in player_colors.into_rows() {
            let id = intern(&mut self.player_colors, &mut self.next_id, local.row);
            remap.insert(local.id, id);
        }
        for row in players.into_rows() {
            if player_refs.contains(&row.id) {
                let id = row.id;
                if self.players.insert_if_absent(row) {
                    self.player_refs.insert(id);
                }
            } else if self.player_refs.remove(&row.id) {
                self.players.replace(row);
            } else {
                self.players.insert(row);
            }
        }
        for local in lineups {
            let id = push(&mut self.lineups, &mut self.next_id, local.row);
            remap.insert(local.id, id);
        }
        for mut local in team_lineups {
            local.row.player_color_id = remapped(&remap, local.row.player_color_id);
            local.row.goalkeeper_color_id = remapped(&remap, local.row.goalkeeper_color_id);
            local.row.lineup_id = remapped_id(&remap, local.row.lineup_id);
            let id = push(&mut self.team_lineups, &mut self.next_id, local.row);
            remap.insert(local.id, id);
        }
        for local in player_statistics {
            let id = push(&mut self.player_statistics, &mut self.next_id, local.row);
            remap.insert(local.id, id);
        }
        for mut local in lineup_entries {
            local.row.statistics_id = remapped(&remap, local.row.statistics_id);
            local.row.team_lineup_id = remapped_id(&remap, local.row.team_lineup_id);
            push(&mut self.lineup_entries, &mut self.next_id, local.row);
        }
        for local in statistic_periods {
            let id = push(&mut self.statistic_periods, &mut self.next_id, local.row);
            remap.insert(local.id, id);
        }
        for mut local in statistic_groups {
            local.row.period_id = remapped_id(&remap, local.row.period_id);
            let id = push(&mut self.statistic_groups, &mut self.next_id, local.row);
            remap.insert(local.id, id);
        }
        for mut local in statistic_items {
            local.row.group_id = remapped_id(&remap, local.row.group_id);
            push(&mut self.statistic_items, &mut self.next_id, local.row);
        }
        for local in incidents {
            push(&mut self.incidents, &mut self.next_id, local.row);
        }
        for local in graph_points {
            push(&mut self.graph_points, &mut self.next_id, local.row);
        }
        self.prune_unreferenced();
    }

    /// Drops surrogate rows no venue, team or event points at. A conflicting
    /// insert leaves the losing row's dependencies behind.
    fn prune_unreferenced(&mut self) {
        let mut used: HashSet<LocalId> = HashSet::new();
        for venue in self.venues.iter() {
            used.extend(venue.city_id);
            used.extend(venue.stadium_id);
            used.extend(venue.coordinates_id);
        }
        for team in self.teams.iter() {
            used.extend(team.team_colors_id);
        }
        for event in self.events.iter() {
            used.extend(event.round_info_id);
            used.extend(event.time_id);
            used.extend(event.home_score_id);
            used.extend(event.away_score_id);
        }
        self.cities.retain(|local| used.contains(&local.id));
        self.stadiums.retain(|local| used.contains(&local.id));
        self.venue_coordinates.retain(|local| used.contains(&local.id));
        self.team_colors.retain(|local| used.contains(&local.id));
        self.round_infos.retain(|local| used.contains(&local.id));
        self.times.retain(|local| used.contains(&local.id));
        self.scores.retain(|local| used.contains(&local.id));
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Row count per table, in parent-first emission order.
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        let mut out = vec![
            ("sports", self.sports.len()),
            ("countries", self.countries.len()),
            ("categories", self.categories.len()),
            ("tournaments", self.tournaments.len()),
            ("seasons", self.seasons.len()),
            ("cities", self.cities.len()),
            ("stadiums", self.stadiums.len()),
            ("venue_coordinates", self.venue_coordinates.len()),
            ("venues", self.venues.len()),
            ("team_colors", self.team_colors.len()),
            ("managers", self.managers.len()),
            ("teams", self.teams.len()),
            ("referees", self.referees.len()),
            ("statuses", self.statuses.len()),
            ("round_infos", self.round_infos.len()),
            ("times", self.times.len()),
            ("scores", self.scores.len()),
            ("events", self.events.len()),
            ("player_colors", self.player_colors.len()),
            ("players", self.players.len()),
            ("lineups", self.lineups.len()),
            ("team_lineups", self.team_lineups.len()),
            ("player_statistics", self.player_statistics.len()),
            ("lineup_entries", self.lineup_entries.len()),
            ("statistic_periods", self.statistic_periods.len()),
            ("statistic_groups", self.statistic_groups.len()),
            ("statistic_items", self.statistic_items.len()),
        ];
        for table in INCIDENT_TABLES {
            let n = self
                .incidents
                .iter()
                .filter(|local| local.row.table() == table)
                .count();
            out.push((table, n));
        }
        out.push(("graph_points", self.graph_points.len()));
        out
    }

    pub fn count(&self, table: &str) -> usize {
        self.counts()
            .into_iter()
            .find(|(name, _)| *name == table)
            .map(|(_, n)| n)
            .unwrap_or(0)
    }

    pub fn row_count(&self) -> usize {
        self.counts().iter().map(|(_, n)| n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn dedup_stats(&self) -> DedupStats {
        let mut total = DedupStats::default();
        for stats in [
            self.sports.stats(),
            self.countries.stats(),
            self.categories.stats(),
            self.tournaments.stats(),
            self.seasons.stats(),
            self.cities.stats(),
            self.stadiums.stats(),
            self.venue_coordinates.stats(),
            self.venues.stats(),
            self.team_colors.stats(),
            self.managers.stats(),
            self.teams.stats(),
            self.referees.stats(),
            self.statuses.stats(),
            self.round_infos.stats(),
            self.events.stats(),
            self.player_colors.stats(),
            self.players.stats(),
        ] {
            total.absorb(stats);
        }
        total
    }

    /// Every FK in the bag that points at a row the bag does not hold.
    /// Empty for any bag built through the `add_*` / `push_*` methods.
    pub fn dangling(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut check = |ok: bool, what: String| {
            if !ok {
                out.push(what);
            }
        };

        let cities = local_ids(self.cities.iter());
        let stadiums = local_ids(self.stadiums.iter());
        let coordinates = local_ids(self.venue_coordinates.iter());
        let colors = local_ids(self.team_colors.iter());
        let rounds = local_ids(self.round_infos.iter());
        let times = local_ids(self.times.iter());
        let scores = local_ids(self.scores.iter());
        let player_colors = local_ids(self.player_colors.iter());
        let lineups = local_ids(self.lineups.iter());
        let team_lineups = local_ids(self.team_lineups.iter());
        let player_stats = local_ids(self.player_statistics.iter());
        let periods = local_ids(self.statistic_periods.iter());
        let groups = local_ids(self.statistic_groups.iter());

        let country_ok = |alpha3: &Option<String>| {
            alpha3
                .as_ref()
                .is_none_or(|code| self.countries.contains_key(code))
        };
        let local_ok = |set: &HashSet<LocalId>, id: Option<LocalId>| id.is_none_or(|id| set.contains(&id));

        for row in self.categories.iter() {
            check(
                self.sports.contains_key(&row.sport_id),
                format!("category {} -> sport {}", row.id, row.sport_id),
            );
        }
        for row in self.tournaments.iter() {
            check(
                self.categories.contains_key(&row.category_id),
                format!("tournament {} -> category {}", row.id, row.category_id),
            );
        }
        for row in self.venues.iter() {
            check(local_ok(&cities, row.city_id), format!("venue {} -> city", row.id));
            check(local_ok(&stadiums, row.stadium_id), format!("venue {} -> stadium", row.id));
            check(
                local_ok(&coordinates, row.coordinates_id),
                format!("venue {} -> coordinates", row.id),
            );
            check(country_ok(&row.country_alpha3), format!("venue {} -> country", row.id));
        }
        for row in self.managers.iter() {
            check(country_ok(&row.country_alpha3), format!("manager {} -> country", row.id));
        }
        for row in self.teams.iter() {
            check(
                row.sport_id.is_none_or(|id| self.sports.contains_key(&id)),
                format!("team {} -> sport", row.id),
            );
            check(country_ok(&row.country_alpha3), format!("team {} -> country", row.id));
            check(
                local_ok(&colors, row.team_colors_id),
                format!("team {} -> team colors", row.id),
            );
            check(
                row.manager_id.is_none_or(|id| self.managers.contains_key(&id)),
                format!("team {} -> manager", row.id),
            );
            check(
                row.venue_id.is_none_or(|id| self.venues.contains_key(&id)),
                format!("team {} -> venue", row.id),
            );
        }
        for row in self.referees.iter() {
            check(
                row.sport_id.is_none_or(|id| self.sports.contains_key(&id)),
                format!("referee {} -> sport", row.id),
            );
            check(country_ok(&row.country_alpha3), format!("referee {} -> country", row.id));
        }
        for row in self.players.iter() {
            check(country_ok(&row.country_alpha3), format!("player {} -> country", row.id));
        }
        for row in self.events.iter() {
            let id = row.id;
            check(
                row.status_code.is_none_or(|code| self.statuses.contains_key(&code)),
                format!("event {id} -> status"),
            );
            check(local_ok(&times, row.time_id), format!("event {id} -> time"));
            check(
                self.tournaments.contains_key(&row.tournament_id),
                format!("event {id} -> tournament {}", row.tournament_id),
            );
            check(
                row.season_id.is_none_or(|s| self.seasons.contains_key(&s)),
                format!("event {id} -> season"),
            );
            check(local_ok(&rounds, row.round_info_id), format!("event {id} -> round info"));
            check(local_ok(&scores, row.home_score_id), format!("event {id} -> home score"));
            check(local_ok(&scores, row.away_score_id), format!("event {id} -> away score"));
            check(
                self.teams.contains_key(&row.home_team_id),
                format!("event {id} -> home team {}", row.home_team_id),
            );
            check(
                self.teams.contains_key(&row.away_team_id),
                format!("event {id} -> away team {}", row.away_team_id),
            );
            check(
                row.venue_id.is_none_or(|v| self.venues.contains_key(&v)),
                format!("event {id} -> venue"),
            );
            check(
                row.referee_id.is_none_or(|r| self.referees.contains_key(&r)),
                format!("event {id} -> referee"),
            );
        }
        for local in &self.lineups {
            check(
                self.events.contains_key(&local.row.event_id),
                format!("lineup {} -> event", local.id.0),
            );
        }
        for local in &self.team_lineups {
            let row = &local.row;
            check(
                self.teams.contains_key(&row.team_id),
                format!("team lineup {} -> team {}", local.id.0, row.team_id),
            );
            check(
                local_ok(&player_colors, row.player_color_id),
                format!("team lineup {} -> player color", local.id.0),
            );
            check(
                local_ok(&player_colors, row.goalkeeper_color_id),
                format!("team lineup {} -> goalkeeper color", local.id.0),
            );
            check(
                lineups.contains(&row.lineup_id),
                format!("team lineup {} -> lineup", local.id.0),
            );
        }
        for local in &self.lineup_entries {
            let row = &local.row;
            check(
                self.players.contains_key(&row.player_id),
                format!("lineup entry {} -> player {}", local.id.0, row.player_id),
            );
            check(
                self.teams.contains_key(&row.team_id),
                format!("lineup entry {} -> team {}", local.id.0, row.team_id),
            );
            check(
                local_ok(&player_stats, row.statistics_id),
                format!("lineup entry {} -> statistics", local.id.0),
            );
            check(
                team_lineups.contains(&row.team_lineup_id),
                format!("lineup entry {} -> team lineup", local.id.0),
            );
        }
        for local in &self.statistic_periods {
            check(
                self.events.contains_key(&local.row.event_id),
                format!("statistic period {} -> event", local.id.0),
            );
        }
        for local in &self.statistic_groups {
            check(
                periods.contains(&local.row.period_id),
                format!("statistic group {} -> period", local.id.0),
            );
        }
        for local in &self.statistic_items {
            check(
                groups.contains(&local.row.group_id),
                format!("statistic item {} -> group", local.id.0),
            );
        }
        for local in &self.incidents {
            check(
                self.events.contains_key(&local.row.event_id),
                format!("{} {} -> event", local.row.table(), local.id.0),
            );
            for player_id in local.row.player_refs() {
                check(
                    self.players.contains_key(&player_id),
                    format!("{} {} -> player {player_id}", local.row.table(), local.id.0),
                );
            }
        }
        for local in &self.graph_points {
            check(
                self.events.contains_key(&local.row.event_id),
                format!("graph point {} -> event", local.id.0),
            );
        }
        out
    }
}

fn next_local(counter: &mut u32) -> LocalId {
    *counter += 1;
    LocalId(*counter)
}

fn push<T>(list: &mut Vec<Local<T>>, counter: &mut u32, row: T) -> LocalId {
    let id = next_local(counter);
    list.push(Local { id, row });
    id
}

fn find_row<T>(rows: &[Local<T>], id: Option<LocalId>) -> Option<&T> {
    let id = id?;
    rows.iter().find(|local| local.id == id).map(|local| &local.row)
}

fn same_row<T: PartialEq>(rows: &[Local<T>], id: Option<LocalId>, incoming: Option<&T>) -> bool {
    match (find_row(rows, id), incoming) {
        (None, None) => id.is_none(),
        (Some(current), Some(incoming)) => current == incoming,
        _ => false,
    }
}

// Value-keyed rows: an equal value already in the table lends its id.
fn intern<T>(table: &mut EntityTable<Local<T>>, counter: &mut u32, row: T) -> LocalId
where
    T: Keyed + PartialEq,
{
    if let Some(existing) = table.get(&row.key()) {
        let id = existing.id;
        table.insert(Local { id, row });
        return id;
    }
    let id = next_local(counter);
    table.insert(Local { id, row });
    id
}

fn link(remap: &mut HashMap<LocalId, LocalId>, from: Option<LocalId>, to: Option<LocalId>) {
    if let (Some(from), Some(to)) = (from, to) {
        remap.insert(from, to);
    }
}

fn remapped(remap: &HashMap<LocalId, LocalId>, id: Option<LocalId>) -> Option<LocalId> {
    id.and_then(|id| remap.get(&id).copied())
}

fn remapped_id(remap: &HashMap<LocalId, LocalId>, id: LocalId) -> LocalId {
    remap.get(&id).copied().unwrap_or(id)
}

fn local_ids<'a, T: 'a>(rows: impl Iterator<Item = &'a Local<T>>) -> HashSet<LocalId> {
    rows.map(|local| local.id).collect()
}

#[cfg(test)]
mod tests {
    use super::RecordBag;
    use crate::convert::{PlayerBundle, VenueBundle};
    use crate::dedup::ConflictPolicy;
    use crate::rows::{CityRow, LineupPlayerRow, StatisticGroupRow, StatisticPeriodRow, VenueRow};

    fn venue(id: u64, city: &str) -> VenueBundle {
        VenueBundle {
            country: None,
            city: Some(CityRow {
                name: city.to_string(),
            }),
            stadium: None,
            coordinates: None,
            venue: VenueRow {
                id,
                name: format!("venue {id}"),
                slug: format!("venue-{id}"),
                capacity: None,
                city_id: None,
                stadium_id: None,
                coordinates_id: None,
                country_alpha3: None,
            },
        }
    }

    fn player(id: u64, name: &str, position: Option<&str>) -> PlayerBundle {
        PlayerBundle {
            country: None,
            player: LineupPlayerRow {
                id,
                name: name.to_string(),
                first_name: None,
                last_name: None,
                slug: None,
                short_name: None,
                position: position.map(str::to_string),
                jersey_number: None,
                height: None,
                user_count: None,
                sofascore_id: None,
                date_of_birth: None,
                market_value: None,
                market_value_currency: None,
                country_alpha3: None,
            },
        }
    }

    #[test]
    fn equal_values_share_one_surrogate_id() {
        let mut bag = RecordBag::default();
        bag.add_venue(venue(1, "Manchester"));
        bag.add_venue(venue(2, "Manchester"));
        assert_eq!(bag.cities.len(), 1);
        let ids: Vec<_> = bag.venues.iter().map(|v| v.city_id).collect();
        assert_eq!(ids[0], ids[1]);
        assert!(bag.dangling().is_empty());
    }

    #[test]
    fn merge_renumbers_and_rewrites_surrogate_fks() {
        let mut main = RecordBag::default();
        main.add_venue(venue(1, "Manchester"));

        let mut scratch = RecordBag::default();
        scratch.add_venue(venue(2, "London"));
        let period_id = scratch.push_statistic_period(StatisticPeriodRow {
            period: "ALL".to_string(),
            event_id: 1,
        });
        scratch.push_statistic_group(StatisticGroupRow {
            group_name: "Match overview".to_string(),
            period_id,
        });

        main.merge(scratch);
        assert_eq!(main.cities.len(), 2);
        assert_eq!(main.statistic_groups.len(), 1);
        let period = &main.statistic_periods[0];
        assert_eq!(main.statistic_groups[0].row.period_id, period.id);

        let london = main.venues.get(&2).and_then(|v| v.city_id).expect("city fk");
        assert!(main.cities.iter().any(|c| c.id == london && c.row.name == "London"));
    }

    #[test]
    fn losing_venue_leaves_no_city_behind() {
        let mut first = RecordBag::new(ConflictPolicy::FirstWins);
        first.add_venue(venue(1, "Manchester"));
        first.add_venue(venue(1, "Salford"));
        let names: Vec<&str> = first.cities.iter().map(|c| c.row.name.as_str()).collect();
        assert_eq!(names, vec!["Manchester"]);
        assert_eq!(first.venues.stats().conflicts, 1);

        let mut last = RecordBag::new(ConflictPolicy::LastWins);
        last.add_venue(venue(1, "Manchester"));
        last.add_venue(venue(1, "Salford"));
        let names: Vec<&str> = last.cities.iter().map(|c| c.row.name.as_str()).collect();
        assert_eq!(names, vec!["Salford"]);
        assert!(last.dangling().is_empty());
    }

    #[test]
    fn lineup_player_replaces_incident_reference() {
        let mut bag = RecordBag::new(ConflictPolicy::FirstWins);
        bag.add_player_reference(player(10, "B. Fernandes", None));
        bag.add_player(player(10, "Bruno Fernandes", Some("M")));
        let row = bag.players.get(&10).expect("player row");
        assert_eq!(row.name, "Bruno Fernandes");
        assert_eq!(bag.players.stats().conflicts, 0);

        bag.add_player_reference(player(10, "B. Fernandes", None));
        let row = bag.players.get(&10).expect("player row");
        assert_eq!(row.position.as_deref(), Some("M"));
    }
}
