use anyhow::{Context, Result, bail};

use crate::bag::RecordBag;
use crate::convert;
use crate::error::ConvertError;
use crate::match_convert::{MatchContext, Skips};
use crate::rows::{FootballLineupRow, LineupPlayerEntryRow, LocalId, TeamLineupRow};
use crate::schema::{LineupsSchema, TeamLineupSchema};

pub fn build(
    lineups: &LineupsSchema,
    ctx: &MatchContext,
    bag: &mut RecordBag,
    skips: &mut Skips,
) -> Result<()> {
    if lineups.home.is_none() && lineups.away.is_none() {
        bail!("lineup payload has neither a home nor an away side");
    }

    let lineup_id = bag.push_lineup(FootballLineupRow {
        confirmed: lineups.confirmed,
        event_id: ctx.event_id,
    });

    let sides = [
        (lineups.home.as_ref(), true, ctx.home_team_id),
        (lineups.away.as_ref(), false, ctx.away_team_id),
    ];
    for (side, is_home, team_id) in sides {
        let Some(side) = side else {
            continue;
        };
        build_side(side, is_home, team_id, lineup_id, bag, skips)
            .with_context(|| format!("{} lineup", if is_home { "home" } else { "away" }))?;
    }
    Ok(())
}

fn build_side(
    side: &TeamLineupSchema,
    is_home: bool,
    team_id: u64,
    lineup_id: LocalId,
    bag: &mut RecordBag,
    skips: &mut Skips,
) -> Result<()> {
    let player_color_id = side
        .player_color
        .as_ref()
        .map(|c| bag.add_player_color(convert::player_color(c)));
    let goalkeeper_color_id = side
        .goalkeeper_color
        .as_ref()
        .map(|c| bag.add_player_color(convert::player_color(c)));

    let team_lineup_id = bag.push_team_lineup(TeamLineupRow {
        formation: side.formation.clone(),
        is_home,
        team_id,
        player_color_id,
        goalkeeper_color_id,
        lineup_id,
    });

    for entry in &side.players {
        let Some(player) = entry.player.as_ref() else {
            skips.skip(ConvertError::malformed(
                "lineup entry",
                format!("entry with shirt {:?} has no player", entry.shirt_number),
            ))?;
            continue;
        };
        let bundle = match convert::lineup_player(player) {
            Ok(bundle) => bundle,
            Err(err) => {
                skips.skip(err)?;
                continue;
            }
        };

        let jersey_number = entry
            .jersey_number
            .clone()
            .or_else(|| bundle.player.jersey_number.clone());
        let player_id = bag.add_player(bundle);
        let statistics_id = entry
            .statistics
            .as_ref()
            .map(|s| bag.push_player_statistics(convert::player_statistics(s)));

        bag.push_lineup_entry(LineupPlayerEntryRow {
            shirt_number: entry.shirt_number,
            jersey_number,
            position: entry.position.clone(),
            substitute: entry.substitute,
            captain: entry.captain,
            player_id,
            team_id,
            statistics_id,
            team_lineup_id,
        });
    }
    Ok(())
}
