use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Value, json};

use crate::bag::{INCIDENT_TABLES, RecordBag};

/// Downstream consumer of flattened rows, e.g. a persistence layer doing
/// get-or-create upserts. Rows arrive parent table first.
pub trait RowSink {
    fn write_row(&mut self, table: &str, row: &Value) -> Result<()>;
}

impl RowSink for Vec<(String, Value)> {
    fn write_row(&mut self, table: &str, row: &Value) -> Result<()> {
        self.push((table.to_string(), row.clone()));
        Ok(())
    }
}

/// Writes `{"table": .., "row": ..}` per line.
pub struct JsonLinesSink<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RowSink for JsonLinesSink<W> {
    fn write_row(&mut self, table: &str, row: &Value) -> Result<()> {
        let line = json!({ "table": table, "row": row });
        serde_json::to_writer(&mut self.out, &line).context("write row")?;
        self.out.write_all(b"\n").context("write row")?;
        self.written += 1;
        Ok(())
    }
}

pub fn emit(bag: &RecordBag, sink: &mut dyn RowSink) -> Result<usize> {
    let mut n = 0;
    n += write_table(sink, "sports", bag.sports.iter())?;
    n += write_table(sink, "countries", bag.countries.iter())?;
    n += write_table(sink, "categories", bag.categories.iter())?;
    n += write_table(sink, "tournaments", bag.tournaments.iter())?;
    n += write_table(sink, "seasons", bag.seasons.iter())?;
    n += write_table(sink, "cities", bag.cities.iter())?;
    n += write_table(sink, "stadiums", bag.stadiums.iter())?;
    n += write_table(sink, "venue_coordinates", bag.venue_coordinates.iter())?;
    n += write_table(sink, "venues", bag.venues.iter())?;
    n += write_table(sink, "team_colors", bag.team_colors.iter())?;
    n += write_table(sink, "managers", bag.managers.iter())?;
    n += write_table(sink, "teams", bag.teams.iter())?;
    n += write_table(sink, "referees", bag.referees.iter())?;
    n += write_table(sink, "statuses", bag.statuses.iter())?;
    n += write_table(sink, "round_infos", bag.round_infos.iter())?;
    n += write_table(sink, "times", bag.times.iter())?;
    n += write_table(sink, "scores", bag.scores.iter())?;
    n += write_table(sink, "events", bag.events.iter())?;
    n += write_table(sink, "player_colors", bag.player_colors.iter())?;
    n += write_table(sink, "players", bag.players.iter())?;
    n += write_table(sink, "lineups", bag.lineups.iter())?;
    n += write_table(sink, "team_lineups", bag.team_lineups.iter())?;
    n += write_table(sink, "player_statistics", bag.player_statistics.iter())?;
    n += write_table(sink, "lineup_entries", bag.lineup_entries.iter())?;
    n += write_table(sink, "statistic_periods", bag.statistic_periods.iter())?;
    n += write_table(sink, "statistic_groups", bag.statistic_groups.iter())?;
    n += write_table(sink, "statistic_items", bag.statistic_items.iter())?;
    for table in INCIDENT_TABLES {
        let rows = bag.incidents.iter().filter(|local| local.row.table() == table);
        n += write_table(sink, table, rows)?;
    }
    n += write_table(sink, "graph_points", bag.graph_points.iter())?;
    Ok(n)
}

fn write_table<'a, T>(
    sink: &mut dyn RowSink,
    table: &str,
    rows: impl Iterator<Item = &'a T>,
) -> Result<usize>
where
    T: Serialize + 'a,
{
    let mut n = 0;
    for row in rows {
        let value = serde_json::to_value(row).with_context(|| format!("serialize {table} row"))?;
        sink.write_row(table, &value)
            .with_context(|| format!("sink rejected {table} row"))?;
        n += 1;
    }
    Ok(n)
}
