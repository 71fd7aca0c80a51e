use anyhow::Result;

use crate::bag::RecordBag;
use crate::convert::lenient_number;
use crate::error::ConvertError;
use crate::match_convert::{MatchContext, Skips};
use crate::rows::{LocalId, StatisticGroupRow, StatisticItemRow, StatisticPeriodRow};
use crate::schema::{StatisticItemSchema, StatsSchema};

pub fn build(
    stats: &StatsSchema,
    ctx: &MatchContext,
    bag: &mut RecordBag,
    skips: &mut Skips,
) -> Result<()> {
    for period in &stats.statistics {
        let name = period.period.trim();
        if name.is_empty() {
            skips.skip(ConvertError::malformed(
                "statistic period",
                "period without a name",
            ))?;
            continue;
        }
        let period_id = bag.push_statistic_period(StatisticPeriodRow {
            period: name.to_string(),
            event_id: ctx.event_id,
        });

        for group in &period.groups {
            let group_id = bag.push_statistic_group(StatisticGroupRow {
                group_name: group.group_name.clone(),
                period_id,
            });
            for item in &group.statistics_items {
                match statistic_item(item, group_id) {
                    Ok(row) => {
                        bag.push_statistic_item(row);
                    }
                    Err(err) => skips.skip(err)?,
                }
            }
        }
    }
    Ok(())
}

/// Numeric values fall back to the display strings when the feed omits them.
pub fn statistic_item(
    src: &StatisticItemSchema,
    group_id: LocalId,
) -> Result<StatisticItemRow, ConvertError> {
    let home_value = src.home_value.or_else(|| lenient_number(&src.home));
    let away_value = src.away_value.or_else(|| lenient_number(&src.away));
    let (Some(home_value), Some(away_value)) = (home_value, away_value) else {
        return Err(ConvertError::malformed(
            "statistic item",
            format!("{} has no numeric value ({:?} / {:?})", src.name, src.home, src.away),
        ));
    };

    Ok(StatisticItemRow {
        key: src.key.clone(),
        name: src.name.clone(),
        home: src.home.clone(),
        away: src.away.clone(),
        compare_code: src.compare_code,
        statistics_type: src.statistics_type.clone(),
        value_type: src.value_type.clone(),
        home_value,
        away_value,
        render_type: src.render_type,
        home_total: src.home_total,
        away_total: src.away_total,
        group_id,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::statistic_item;
    use crate::rows::LocalId;
    use crate::schema::StatisticItemSchema;

    fn item(value: serde_json::Value) -> StatisticItemSchema {
        serde_json::from_value(value).expect("statistic item json")
    }

    #[test]
    fn percentages_fall_back_to_display_text() {
        let src = item(json!({
            "name": "Ball possession",
            "home": "58%",
            "away": "42%",
            "compareCode": 1,
            "statisticsType": "positive",
            "valueType": "event",
            "renderType": 2,
            "key": "ballPossession"
        }));
        let row = statistic_item(&src, LocalId(4)).expect("row");
        assert_eq!(row.home_value, 58.0);
        assert_eq!(row.away_value, 42.0);
        assert_eq!(row.group_id, LocalId(4));
    }

    #[test]
    fn explicit_values_win_over_display_text() {
        let src = item(json!({
            "name": "Accurate passes",
            "home": "412/480 (86%)",
            "away": "300/377 (80%)",
            "homeValue": 412,
            "awayValue": 300,
            "homeTotal": 480,
            "awayTotal": 377
        }));
        let row = statistic_item(&src, LocalId(1)).expect("row");
        assert_eq!(row.home_value, 412.0);
        assert_eq!(row.home_total, Some(480));
    }

    #[test]
    fn item_without_any_number_is_malformed() {
        let src = item(json!({"name": "Form", "home": "WWDLW", "away": "LLDWW"}));
        assert!(statistic_item(&src, LocalId(1)).is_err());
    }
}
