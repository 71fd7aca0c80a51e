use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt::Debug;

use serde::Serialize;
use tracing::debug;

use crate::rows::{
    CategoryRow, CityRow, CountryRow, EventRow, LineupPlayerRow, Local, ManagerRow,
    PlayerColorRow, RefereeRow, RoundInfoRow, SeasonRow, SportRow, StadiumRow, StatusRow,
    TeamColorsRow, TeamRow, TournamentRow, VenueCoordinatesRow, VenueRow,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    #[default]
    FirstWins,
    LastWins,
}

/// Business identity of a row: the source id, a code, or the full value for
/// rows the source never identifies.
pub trait Keyed {
    type Key: Ord + Clone + Debug;

    fn key(&self) -> Self::Key;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    New,
    Duplicate,
    Conflict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    pub inserted: usize,
    pub duplicates: usize,
    pub conflicts: usize,
}

impl DedupStats {
    pub fn absorb(&mut self, other: DedupStats) {
        self.inserted += other.inserted;
        self.duplicates += other.duplicates;
        self.conflicts += other.conflicts;
    }
}

/// One canonical row per natural key. Iteration follows key order so output
/// never depends on which payload a row came from first.
#[derive(Debug, Clone)]
pub struct EntityTable<R: Keyed> {
    name: &'static str,
    policy: ConflictPolicy,
    rows: BTreeMap<R::Key, R>,
    stats: DedupStats,
}

impl<R: Keyed + PartialEq> EntityTable<R> {
    pub fn new(name: &'static str, policy: ConflictPolicy) -> Self {
        Self {
            name,
            policy,
            rows: BTreeMap::new(),
            stats: DedupStats::default(),
        }
    }

    pub fn insert(&mut self, row: R) -> Insert {
        match self.rows.entry(row.key()) {
            Entry::Vacant(slot) => {
                slot.insert(row);
                self.stats.inserted += 1;
                Insert::New
            }
            Entry::Occupied(mut slot) => {
                if slot.get() == &row {
                    self.stats.duplicates += 1;
                    return Insert::Duplicate;
                }
                self.stats.conflicts += 1;
                debug!(
                    table = self.name,
                    key = ?slot.key(),
                    policy = ?self.policy,
                    "conflicting rows for one natural key"
                );
                if self.policy == ConflictPolicy::LastWins {
                    slot.insert(row);
                }
                Insert::Conflict
            }
        }
    }

    /// Inserts a row only referenced from elsewhere (e.g. a player named in
    /// an incident). An existing row is kept and nothing is counted.
    pub fn insert_if_absent(&mut self, row: R) -> bool {
        match self.rows.entry(row.key()) {
            Entry::Vacant(slot) => {
                slot.insert(row);
                self.stats.inserted += 1;
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Overwrites whatever the key holds, without conflict accounting.
    pub fn replace(&mut self, row: R) {
        if self.rows.insert(row.key(), row).is_none() {
            self.stats.inserted += 1;
        }
    }

    /// Drops rows without touching the dedup counters.
    pub fn retain(&mut self, mut keep: impl FnMut(&R) -> bool) {
        self.rows.retain(|_, row| keep(row));
    }

    pub fn get(&self, key: &R::Key) -> Option<&R> {
        self.rows.get(key)
    }

    pub fn contains_key(&self, key: &R::Key) -> bool {
        self.rows.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.rows.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &R::Key> {
        self.rows.keys()
    }

    pub fn into_rows(self) -> impl Iterator<Item = R> {
        self.rows.into_values()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn stats(&self) -> DedupStats {
        self.stats
    }
}

impl<T: Keyed> Keyed for Local<T> {
    type Key = T::Key;

    fn key(&self) -> Self::Key {
        self.row.key()
    }
}

macro_rules! keyed_by_id {
    ($($row:ty),+ $(,)?) => {
        $(
            impl Keyed for $row {
                type Key = u64;

                fn key(&self) -> u64 {
                    self.id
                }
            }
        )+
    };
}

keyed_by_id!(
    SportRow,
    CategoryRow,
    TournamentRow,
    SeasonRow,
    VenueRow,
    ManagerRow,
    TeamRow,
    RefereeRow,
    LineupPlayerRow,
    EventRow,
);

impl Keyed for CountryRow {
    type Key = String;

    fn key(&self) -> String {
        self.alpha3.clone()
    }
}

impl Keyed for StatusRow {
    type Key = i32;

    fn key(&self) -> i32 {
        self.code
    }
}

impl Keyed for CityRow {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }
}

impl Keyed for StadiumRow {
    type Key = (String, Option<u32>);

    fn key(&self) -> Self::Key {
        (self.name.clone(), self.capacity)
    }
}

impl Keyed for VenueCoordinatesRow {
    // f64 has no total order; the bit patterns do, and equal coordinates
    // from the same feed always share them.
    type Key = (u64, u64);

    fn key(&self) -> Self::Key {
        (self.latitude.to_bits(), self.longitude.to_bits())
    }
}

impl Keyed for TeamColorsRow {
    type Key = (String, String, String);

    fn key(&self) -> Self::Key {
        (
            self.primary.clone(),
            self.secondary.clone(),
            self.text.clone(),
        )
    }
}

impl Keyed for RoundInfoRow {
    type Key = (i32, Option<String>, Option<String>);

    fn key(&self) -> Self::Key {
        (self.round, self.name.clone(), self.slug.clone())
    }
}

impl Keyed for PlayerColorRow {
    type Key = (
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
    );

    fn key(&self) -> Self::Key {
        (
            self.primary.clone(),
            self.number.clone(),
            self.outline.clone(),
            self.fancy_number.clone(),
        )
    }
}
