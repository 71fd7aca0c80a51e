use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::bag::RecordBag;
use crate::config::ConvertConfig;
use crate::convert;
use crate::error::ConvertError;
use crate::schema::MatchPayload;
use crate::{graph, incidents, lineups, statistics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Base,
    Stats,
    Lineup,
    Incidents,
    Graph,
}

impl Phase {
    pub const OPTIONAL: [Phase; 4] = [Phase::Stats, Phase::Lineup, Phase::Incidents, Phase::Graph];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Base => "base",
            Phase::Stats => "stats",
            Phase::Lineup => "lineup",
            Phase::Incidents => "incidents",
            Phase::Graph => "graph",
        }
    }

    pub fn from_name(raw: &str) -> Option<Phase> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "base" => Some(Phase::Base),
            "stats" | "statistics" => Some(Phase::Stats),
            "lineup" | "lineups" => Some(Phase::Lineup),
            "incidents" | "incident" => Some(Phase::Incidents),
            "graph" | "momentum" => Some(Phase::Graph),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Succeeded,
    Failed(String),
    // no data for the phase in the payload
    Skipped,
    Disabled,
}

/// Ids every optional phase hangs its rows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchContext {
    pub match_id: u64,
    pub event_id: u64,
    pub sport_id: u64,
    pub home_team_id: u64,
    pub away_team_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub phase: Phase,
    pub entity: &'static str,
    pub detail: String,
}

/// Collects malformed records an optional phase chose to skip. In strict mode
/// the first one fails the phase instead.
#[derive(Debug)]
pub struct Skips {
    match_id: u64,
    phase: Phase,
    strict: bool,
    records: Vec<SkippedRecord>,
}

impl Skips {
    pub fn new(match_id: u64, phase: Phase, strict: bool) -> Self {
        Self {
            match_id,
            phase,
            strict,
            records: Vec::new(),
        }
    }

    pub fn skip(&mut self, err: ConvertError) -> Result<()> {
        if self.strict {
            return Err(err.into());
        }
        warn!(
            match_id = self.match_id,
            phase = self.phase.name(),
            error = %err,
            "skipping malformed record"
        );
        let (entity, detail) = match err {
            ConvertError::Malformed { entity, detail } => (entity, detail),
            ConvertError::MissingOptional { component } => (component, "missing".to_string()),
            ConvertError::MissingMandatory { component, .. } => {
                (component, "missing".to_string())
            }
            ConvertError::InvalidMandatory {
                component, source, ..
            } => (component, source.to_string()),
        };
        self.records.push(SkippedRecord {
            phase: self.phase,
            entity,
            detail,
        });
        Ok(())
    }

    pub fn into_records(self) -> Vec<SkippedRecord> {
        self.records
    }
}

#[derive(Debug, Clone)]
pub struct MatchConversion {
    pub match_id: u64,
    pub bag: RecordBag,
    pub phases: BTreeMap<Phase, PhaseStatus>,
    pub skipped: Vec<SkippedRecord>,
}

impl MatchConversion {
    pub fn succeeded(&self, phase: Phase) -> bool {
        matches!(self.phases.get(&phase), Some(PhaseStatus::Succeeded))
    }

    pub fn status(&self, phase: Phase) -> Option<&PhaseStatus> {
        self.phases.get(&phase)
    }

    pub fn failed_phases(&self) -> Vec<Phase> {
        self.phases
            .iter()
            .filter(|(_, status)| matches!(status, PhaseStatus::Failed(_)))
            .map(|(phase, _)| *phase)
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchConverter {
    config: ConvertConfig,
}

impl MatchConverter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(ConvertConfig::from_env())
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    pub fn convert(&self, payload: &MatchPayload) -> Result<MatchConversion, ConvertError> {
        let match_id = payload.match_id;
        info!(match_id, "converting match");

        let mut bag = RecordBag::new(self.config.conflict_policy);
        let ctx = build_base(payload, &mut bag)?;
        debug!(match_id, phase = "base", rows = bag.row_count(), "phase built");

        let mut phases = BTreeMap::new();
        phases.insert(Phase::Base, PhaseStatus::Succeeded);
        let mut skipped = Vec::new();

        for phase in Phase::OPTIONAL {
            if !self.config.runs(phase) {
                debug!(match_id, phase = phase.name(), "phase disabled");
                phases.insert(phase, PhaseStatus::Disabled);
                continue;
            }
            if !can_build(phase, payload) {
                debug!(match_id, phase = phase.name(), "no data for phase");
                phases.insert(phase, PhaseStatus::Skipped);
                continue;
            }

            let mut scratch = RecordBag::new(self.config.conflict_policy);
            let mut skips = Skips::new(match_id, phase, self.config.strict);
            match build(phase, payload, &ctx, &mut scratch, &mut skips) {
                Ok(()) => {
                    debug!(
                        match_id,
                        phase = phase.name(),
                        rows = scratch.row_count(),
                        "phase built"
                    );
                    bag.merge(scratch);
                    skipped.extend(skips.into_records());
                    phases.insert(phase, PhaseStatus::Succeeded);
                }
                Err(err) => {
                    let reason = format!("{err:#}");
                    warn!(match_id, phase = phase.name(), error = %reason, "phase failed");
                    phases.insert(phase, PhaseStatus::Failed(reason));
                }
            }
        }

        info!(
            match_id,
            rows = bag.row_count(),
            skipped = skipped.len(),
            "match converted"
        );
        Ok(MatchConversion {
            match_id,
            bag,
            phases,
            skipped,
        })
    }
}

pub fn convert_match(payload: &MatchPayload) -> Result<MatchConversion, ConvertError> {
    MatchConverter::default().convert(payload)
}

fn build_base(payload: &MatchPayload, bag: &mut RecordBag) -> Result<MatchContext, ConvertError> {
    let Some(event) = payload.base.as_ref().and_then(|base| base.event.as_ref()) else {
        return Err(ConvertError::MissingMandatory {
            match_id: payload.match_id,
            component: "base",
        });
    };
    if event.id != payload.match_id {
        warn!(
            match_id = payload.match_id,
            event_id = event.id,
            "payload match id differs from its event id"
        );
    }

    let bundle = convert::event(event).map_err(|err| ConvertError::InvalidMandatory {
        match_id: payload.match_id,
        component: "base",
        source: Box::new(err),
    })?;
    let ctx = MatchContext {
        match_id: payload.match_id,
        event_id: bundle.event.id,
        sport_id: bundle.tournament.sport.id,
        home_team_id: bundle.event.home_team_id,
        away_team_id: bundle.event.away_team_id,
    };
    bag.add_event(bundle);
    Ok(ctx)
}

fn can_build(phase: Phase, payload: &MatchPayload) -> bool {
    match phase {
        Phase::Base => payload.base.as_ref().is_some_and(|b| b.event.is_some()),
        Phase::Stats => payload
            .stats
            .as_ref()
            .is_some_and(|s| !s.statistics.is_empty()),
        Phase::Lineup => payload.lineup.is_some(),
        Phase::Incidents => payload
            .incidents
            .as_ref()
            .is_some_and(|i| !i.incidents.is_empty()),
        Phase::Graph => payload
            .graph
            .as_ref()
            .is_some_and(|g| !g.graph_points.is_empty()),
    }
}

fn build(
    phase: Phase,
    payload: &MatchPayload,
    ctx: &MatchContext,
    bag: &mut RecordBag,
    skips: &mut Skips,
) -> Result<()> {
    match (phase, payload) {
        (Phase::Stats, MatchPayload { stats: Some(stats), .. }) => {
            statistics::build(stats, ctx, bag, skips)
        }
        (Phase::Lineup, MatchPayload { lineup: Some(lineup), .. }) => {
            lineups::build(lineup, ctx, bag, skips)
        }
        (Phase::Incidents, MatchPayload { incidents: Some(list), .. }) => {
            incidents::build(list, ctx, bag, skips)
        }
        (Phase::Graph, MatchPayload { graph: Some(points), .. }) => {
            graph::build(points, ctx, bag, skips)
        }
        (phase, _) => Err(ConvertError::MissingOptional {
            component: phase.name(),
        }
        .into()),
    }
}
