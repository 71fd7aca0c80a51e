use anyhow::Result;

use crate::bag::RecordBag;
use crate::convert;
use crate::error::ConvertError;
use crate::match_convert::{MatchContext, Skips};
use crate::schema::GraphSchema;

pub fn build(
    graph: &GraphSchema,
    ctx: &MatchContext,
    bag: &mut RecordBag,
    skips: &mut Skips,
) -> Result<()> {
    for point in &graph.graph_points {
        if !point.minute.is_finite() || point.minute < 0.0 {
            skips.skip(ConvertError::malformed(
                "graph point",
                format!("minute {} out of range", point.minute),
            ))?;
            continue;
        }
        bag.push_graph_point(convert::graph_point(point, ctx.event_id));
    }
    Ok(())
}
