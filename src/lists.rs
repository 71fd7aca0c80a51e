use tracing::{info, warn};

use crate::bag::RecordBag;
use crate::config::ConvertConfig;
use crate::convert;
use crate::error::ConvertError;
use crate::schema::{EventsPayload, SeasonsPayload, TournamentPayload};

#[derive(Debug, Clone)]
pub struct ListConversion {
    pub bag: RecordBag,
    pub converted: usize,
    pub skipped: usize,
}

pub fn convert_tournament(
    payload: &TournamentPayload,
    config: &ConvertConfig,
) -> Result<ListConversion, ConvertError> {
    let Some(src) = payload.tournament.as_ref() else {
        return Err(ConvertError::malformed(
            "tournament payload",
            "no tournament object",
        ));
    };
    let mut bag = RecordBag::new(config.conflict_policy);
    bag.add_tournament(convert::tournament(src)?);
    info!(tournament_id = src.id, "converted tournament");
    Ok(ListConversion {
        bag,
        converted: 1,
        skipped: 0,
    })
}

pub fn convert_seasons(payload: &SeasonsPayload, config: &ConvertConfig) -> ListConversion {
    let mut bag = RecordBag::new(config.conflict_policy);
    for season in &payload.seasons {
        bag.add_season(convert::season(season));
    }
    info!(
        seasons = payload.seasons.len(),
        distinct = bag.seasons.len(),
        "converted seasons"
    );
    ListConversion {
        bag,
        converted: payload.seasons.len(),
        skipped: 0,
    }
}

/// Every listed event lands in one bag, so shared tournaments, teams and
/// venues come out once. A malformed event is skipped unless `strict` is set.
pub fn convert_events(
    payload: &EventsPayload,
    config: &ConvertConfig,
) -> Result<ListConversion, ConvertError> {
    let mut bag = RecordBag::new(config.conflict_policy);
    let mut converted = 0;
    let mut skipped = 0;

    for event in &payload.events {
        match convert::event(event) {
            Ok(bundle) => {
                bag.add_event(bundle);
                converted += 1;
            }
            Err(err) if config.strict => return Err(err),
            Err(err) => {
                warn!(event_id = event.id, error = %err, "skipping malformed event");
                skipped += 1;
            }
        }
    }

    info!(converted, skipped, rows = bag.row_count(), "converted event list");
    Ok(ListConversion {
        bag,
        converted,
        skipped,
    })
}
