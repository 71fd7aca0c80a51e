use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ConvertError;
use crate::rows::{
    CategoryRow, CityRow, CountryRow, EventRow, GraphPointRow, LineupPlayerRow, ManagerRow,
    PlayerColorRow, PlayerStatisticsRow, RefereeRow, RoundInfoRow, ScoreRow, SeasonRow, SportRow,
    StadiumRow, StatusRow, TeamColorsRow, TeamRow, TimeFootballRow, TournamentRow,
    VenueCoordinatesRow, VenueRow,
};
use crate::schema::{
    CategorySchema, CitySchema, CountrySchema, EventSchema, GraphPointSchema, ManagerSchema,
    PlayerColorSchema, PlayerSchema, PlayerStatisticsSchema, RefereeSchema, RoundInfoSchema,
    ScoreSchema, SeasonSchema, SportSchema, StadiumSchema, StatusSchema, TeamColorsSchema,
    TeamSchema, TimeFootballSchema, TournamentSchema, VenueCoordinatesSchema, VenueSchema,
};

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

pub fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

pub fn birth_date(secs: i64) -> Option<NaiveDate> {
    timestamp(secs).map(|t| t.date_naive())
}

/// Leading numeric part of a display string: "54%" -> 54, "12/20 (60%)" -> 12.
pub fn lenient_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// Leaf converters
// ---------------------------------------------------------------------------

pub fn sport(src: &SportSchema) -> SportRow {
    SportRow {
        id: src.id,
        name: src.name.clone(),
        slug: src.slug.clone(),
    }
}

pub fn country(src: &CountrySchema) -> Option<CountryRow> {
    let alpha3 = src.alpha3.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    Some(CountryRow {
        alpha3: alpha3.to_string(),
        alpha2: src.alpha2.clone(),
        name: src.name.clone().unwrap_or_else(|| alpha3.to_string()),
        slug: src.slug.clone(),
    })
}

pub fn category_row(src: &CategorySchema) -> Result<CategoryRow, ConvertError> {
    let Some(sport) = src.sport.as_ref() else {
        return Err(ConvertError::malformed(
            "category",
            format!("category {} has no sport", src.id),
        ));
    };
    Ok(CategoryRow {
        id: src.id,
        name: src.name.clone(),
        slug: src.slug.clone(),
        alpha2: src.alpha2.clone(),
        flag: src.flag.clone(),
        sport_id: sport.id,
    })
}

pub fn tournament_row(src: &TournamentSchema) -> Result<TournamentRow, ConvertError> {
    let Some(category) = src.category.as_ref() else {
        return Err(ConvertError::malformed(
            "tournament",
            format!("tournament {} has no category", src.id),
        ));
    };
    Ok(TournamentRow {
        id: src.id,
        name: src.name.clone(),
        slug: src.slug.clone(),
        competition_type: src.competition_type,
        category_id: category.id,
    })
}

pub fn season(src: &SeasonSchema) -> SeasonRow {
    SeasonRow {
        id: src.id,
        name: src.name.clone(),
        year: src.year.clone(),
    }
}

pub fn team_colors(src: &TeamColorsSchema) -> TeamColorsRow {
    TeamColorsRow {
        primary: src.primary.clone(),
        secondary: src.secondary.clone(),
        text: src.text.clone(),
    }
}

pub fn manager(src: &ManagerSchema) -> ManagerRow {
    ManagerRow {
        id: src.id,
        name: src.name.clone(),
        slug: src.slug.clone(),
        short_name: src.short_name.clone(),
        country_alpha3: src.country.as_ref().and_then(country).map(|c| c.alpha3),
    }
}

pub fn referee(src: &RefereeSchema) -> RefereeRow {
    RefereeRow {
        id: src.id,
        name: src.name.clone(),
        slug: src.slug.clone(),
        yellow_cards: src.yellow_cards,
        red_cards: src.red_cards,
        yellow_red_cards: src.yellow_red_cards,
        games: src.games,
        sport_id: src.sport.as_ref().map(|s| s.id),
        country_alpha3: src.country.as_ref().and_then(country).map(|c| c.alpha3),
    }
}

pub fn city(src: &CitySchema) -> Option<CityRow> {
    let name = src.name.trim();
    if name.is_empty() {
        return None;
    }
    Some(CityRow {
        name: name.to_string(),
    })
}

pub fn stadium(src: &StadiumSchema) -> Option<StadiumRow> {
    let name = src.name.trim();
    if name.is_empty() {
        return None;
    }
    Some(StadiumRow {
        name: name.to_string(),
        capacity: src.capacity,
    })
}

pub fn venue_coordinates(src: &VenueCoordinatesSchema) -> Option<VenueCoordinatesRow> {
    if !src.latitude.is_finite() || !src.longitude.is_finite() {
        return None;
    }
    Some(VenueCoordinatesRow {
        latitude: src.latitude,
        longitude: src.longitude,
    })
}

pub fn status(src: &StatusSchema) -> StatusRow {
    StatusRow {
        code: src.code,
        description: src.description.clone(),
        kind: src.kind.clone(),
    }
}

pub fn round_info(src: &RoundInfoSchema) -> RoundInfoRow {
    RoundInfoRow {
        round: src.round,
        name: src.name.clone(),
        slug: src.slug.clone(),
    }
}

pub fn time_football(src: &TimeFootballSchema) -> TimeFootballRow {
    TimeFootballRow {
        injury_time1: src.injury_time1,
        injury_time2: src.injury_time2,
        current_period_start: src.current_period_start_timestamp.and_then(timestamp),
    }
}

pub fn score(src: &ScoreSchema) -> ScoreRow {
    ScoreRow {
        current: src.current,
        display: src.display,
        period1: src.period1,
        period2: src.period2,
        normaltime: src.normaltime,
    }
}

pub fn player(src: &PlayerSchema) -> Result<LineupPlayerRow, ConvertError> {
    let Some(id) = src.id else {
        let name = src.name.as_deref().unwrap_or("?");
        return Err(ConvertError::malformed(
            "player",
            format!("player {name} has no id"),
        ));
    };
    let market = src.proposed_market_value_raw.as_ref();
    Ok(LineupPlayerRow {
        id,
        name: src
            .name
            .clone()
            .or_else(|| src.short_name.clone())
            .unwrap_or_default(),
        first_name: src.first_name.clone(),
        last_name: src.last_name.clone(),
        slug: src.slug.clone(),
        short_name: src.short_name.clone(),
        position: src.position.clone(),
        jersey_number: src.jersey_number.clone(),
        height: src.height,
        user_count: src.user_count,
        sofascore_id: src.sofascore_id.clone(),
        date_of_birth: src.date_of_birth_timestamp.and_then(birth_date),
        market_value: market.map(|m| m.value),
        market_value_currency: src
            .market_value_currency
            .clone()
            .or_else(|| market.and_then(|m| m.currency.clone())),
        country_alpha3: src.country.as_ref().and_then(country).map(|c| c.alpha3),
    })
}

pub fn player_statistics(src: &PlayerStatisticsSchema) -> PlayerStatisticsRow {
    PlayerStatisticsRow {
        values: src.clone(),
    }
}

pub fn player_color(src: &PlayerColorSchema) -> PlayerColorRow {
    PlayerColorRow {
        primary: src.primary.clone(),
        number: src.number.clone(),
        outline: src.outline.clone(),
        fancy_number: src.fancy_number.clone(),
    }
}

pub fn graph_point(src: &GraphPointSchema, event_id: u64) -> GraphPointRow {
    GraphPointRow {
        minute: src.minute,
        value: src.value,
        event_id,
    }
}

/// Event row with its natural-key FKs set. Surrogate FKs (time, round info,
/// scores) stay empty until the bag absorbs the whole bundle.
pub fn event_row(src: &EventSchema) -> Result<EventRow, ConvertError> {
    let Some(tournament) = src.tournament.as_ref() else {
        return Err(ConvertError::malformed(
            "event",
            format!("event {} has no tournament", src.id),
        ));
    };
    let (Some(home), Some(away)) = (src.home_team.as_ref(), src.away_team.as_ref()) else {
        return Err(ConvertError::malformed(
            "event",
            format!("event {} is missing a home or away team", src.id),
        ));
    };

    Ok(EventRow {
        id: src.id,
        slug: src.slug.clone(),
        start_time: src.start_timestamp.and_then(timestamp),
        winner_code: src.winner_code,
        has_global_highlights: src.has_global_highlights,
        has_xg: src.has_xg,
        has_event_player_statistics: src.has_event_player_statistics,
        has_event_player_heat_map: src.has_event_player_heat_map,
        attendance: src.attendance,
        default_period_count: src.default_period_count,
        default_period_length: src.default_period_length,
        default_overtime_length: src.default_overtime_length,
        current_period_start: src.current_period_start_timestamp.and_then(timestamp),
        fan_rating_event: src.fan_rating_event,
        season_statistics_type: src.season_statistics_type.clone(),
        show_toto_promo: src.show_toto_promo,
        status_code: src.status.as_ref().map(|s| s.code),
        time_id: None,
        tournament_id: tournament.id,
        season_id: src.season.as_ref().map(|s| s.id),
        round_info_id: None,
        home_score_id: None,
        away_score_id: None,
        home_team_id: home.id,
        away_team_id: away.id,
        venue_id: src.venue.as_ref().map(|v| v.id),
        referee_id: src.referee.as_ref().map(|r| r.id),
    })
}

// ---------------------------------------------------------------------------
// Composite converters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBundle {
    pub sport: SportRow,
    pub category: CategoryRow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TournamentBundle {
    pub sport: SportRow,
    pub category: CategoryRow,
    pub tournament: TournamentRow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VenueBundle {
    pub country: Option<CountryRow>,
    pub city: Option<CityRow>,
    pub stadium: Option<StadiumRow>,
    pub coordinates: Option<VenueCoordinatesRow>,
    pub venue: VenueRow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManagerBundle {
    pub country: Option<CountryRow>,
    pub manager: ManagerRow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamBundle {
    pub sport: Option<SportRow>,
    pub country: Option<CountryRow>,
    pub colors: Option<TeamColorsRow>,
    pub manager: Option<ManagerBundle>,
    pub venue: Option<VenueBundle>,
    pub team: TeamRow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefereeBundle {
    pub sport: Option<SportRow>,
    pub country: Option<CountryRow>,
    pub referee: RefereeRow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerBundle {
    pub country: Option<CountryRow>,
    pub player: LineupPlayerRow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventBundle {
    pub tournament: TournamentBundle,
    pub season: Option<SeasonRow>,
    pub home: TeamBundle,
    pub away: TeamBundle,
    pub status: Option<StatusRow>,
    pub round_info: Option<RoundInfoRow>,
    pub time: Option<TimeFootballRow>,
    pub home_score: Option<ScoreRow>,
    pub away_score: Option<ScoreRow>,
    pub venue: Option<VenueBundle>,
    pub referee: Option<RefereeBundle>,
    pub event: EventRow,
}

pub fn category(src: &CategorySchema) -> Result<CategoryBundle, ConvertError> {
    let category = category_row(src)?;
    let Some(sport_src) = src.sport.as_ref() else {
        return Err(ConvertError::malformed(
            "category",
            format!("category {} has no sport", src.id),
        ));
    };
    Ok(CategoryBundle {
        sport: sport(sport_src),
        category,
    })
}

pub fn tournament(src: &TournamentSchema) -> Result<TournamentBundle, ConvertError> {
    let tournament = tournament_row(src)?;
    let Some(category_src) = src.category.as_ref() else {
        return Err(ConvertError::malformed(
            "tournament",
            format!("tournament {} has no category", src.id),
        ));
    };
    let CategoryBundle { sport, category } = category(category_src)?;
    Ok(TournamentBundle {
        sport,
        category,
        tournament,
    })
}

pub fn venue(src: &VenueSchema) -> VenueBundle {
    let country = src.country.as_ref().and_then(country);
    VenueBundle {
        venue: VenueRow {
            id: src.id,
            name: src.name.clone(),
            slug: src.slug.clone(),
            capacity: src.capacity,
            city_id: None,
            stadium_id: None,
            coordinates_id: None,
            country_alpha3: country.as_ref().map(|c| c.alpha3.clone()),
        },
        country,
        city: src.city.as_ref().and_then(city),
        stadium: src.stadium.as_ref().and_then(stadium),
        coordinates: src.venue_coordinates.as_ref().and_then(venue_coordinates),
    }
}

pub fn manager_bundle(src: &ManagerSchema) -> ManagerBundle {
    ManagerBundle {
        country: src.country.as_ref().and_then(country),
        manager: manager(src),
    }
}

pub fn referee_bundle(src: &RefereeSchema) -> RefereeBundle {
    RefereeBundle {
        sport: src.sport.as_ref().map(sport),
        country: src.country.as_ref().and_then(country),
        referee: referee(src),
    }
}

pub fn lineup_player(src: &PlayerSchema) -> Result<PlayerBundle, ConvertError> {
    Ok(PlayerBundle {
        player: player(src)?,
        country: src.country.as_ref().and_then(country),
    })
}

pub fn team(src: &TeamSchema) -> TeamBundle {
    let country = src.country.as_ref().and_then(country);
    let manager = src.manager.as_ref().map(manager_bundle);
    let venue = src.venue.as_ref().map(venue);

    TeamBundle {
        team: TeamRow {
            id: src.id,
            name: src.name.clone(),
            slug: src.slug.clone(),
            short_name: src.short_name.clone(),
            name_code: src.name_code.clone(),
            gender: src.gender.clone(),
            full_name: src.full_name.clone(),
            class: src.class,
            national: src.national,
            sport_id: src.sport.as_ref().map(|s| s.id),
            country_alpha3: country.as_ref().map(|c| c.alpha3.clone()),
            team_colors_id: None,
            manager_id: manager.as_ref().map(|m| m.manager.id),
            venue_id: venue.as_ref().map(|v| v.venue.id),
        },
        sport: src.sport.as_ref().map(sport),
        country,
        colors: src.team_colors.as_ref().map(team_colors),
        manager,
        venue,
    }
}

pub fn event(src: &EventSchema) -> Result<EventBundle, ConvertError> {
    let event = event_row(src)?;
    let (Some(tournament_src), Some(home_src), Some(away_src)) = (
        src.tournament.as_ref(),
        src.home_team.as_ref(),
        src.away_team.as_ref(),
    ) else {
        return Err(ConvertError::malformed(
            "event",
            format!("event {} is missing its tournament or teams", src.id),
        ));
    };

    Ok(EventBundle {
        tournament: tournament(tournament_src)?,
        season: src.season.as_ref().map(season),
        home: team(home_src),
        away: team(away_src),
        status: src.status.as_ref().map(status),
        round_info: src.round_info.as_ref().map(round_info),
        time: src.time.as_ref().map(time_football),
        home_score: src.home_score.as_ref().map(score),
        away_score: src.away_score.as_ref().map(score),
        venue: src.venue.as_ref().map(venue),
        referee: src.referee.as_ref().map(referee_bundle),
        event,
    })
}
