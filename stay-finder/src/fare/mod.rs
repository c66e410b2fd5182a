//! Fare lookup with symmetric pairs and fallback pricing.
//!
//! Fare rows fetched for any station are kept in a session-wide table.
//! Lookups treat A→B and B→A as the same fare, so a row fetched for one
//! destination also serves the reverse trip for another.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::{Fare, StationId};
use crate::providers::FareTableProvider;

/// One row of a fare table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareRow {
    pub from: StationId,
    pub to: StationId,
    pub fare: Fare,
}

/// Known fares between station pairs.
///
/// Each pair is stored once under its ordered key, so both directions
/// always resolve to the same fare.
#[derive(Debug, Clone, Default)]
pub struct FareTable {
    entries: HashMap<(StationId, StationId), Fare>,
}

fn pair_key(a: &StationId, b: &StationId) -> (StationId, StationId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

impl FareTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fare for the pair in both directions. A later row for the
    /// same pair replaces the earlier one, whichever direction it names.
    pub fn insert(&mut self, from: StationId, to: StationId, fare: Fare) {
        self.entries.insert(pair_key(&from, &to), fare);
    }

    /// Fare between two stations in either direction.
    pub fn get(&self, a: &StationId, b: &StationId) -> Option<Fare> {
        self.entries.get(&pair_key(a, b)).copied()
    }

    /// Every known fare from `station` to another station.
    pub fn fares_touching(&self, station: &StationId) -> HashMap<StationId, Fare> {
        self.entries
            .iter()
            .filter_map(|((a, b), fare)| {
                if a == station {
                    Some((b.clone(), *fare))
                } else if b == station {
                    Some((a.clone(), *fare))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Number of station pairs with a known fare.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fares from one destination station to every other station.
#[derive(Debug, Clone)]
pub struct FareMap {
    destination: StationId,
    fares: HashMap<StationId, Fare>,
    fallback: Fare,
}

impl FareMap {
    pub fn new(destination: StationId, fares: HashMap<StationId, Fare>, fallback: Fare) -> Self {
        Self {
            destination,
            fares,
            fallback,
        }
    }

    pub fn destination(&self) -> &StationId {
        &self.destination
    }

    /// One-way fare to `station`: zero for the destination itself, the
    /// table value when known, the fallback otherwise.
    pub fn get(&self, station: &StationId) -> Fare {
        if station == &self.destination {
            return Fare::ZERO;
        }
        self.fares.get(station).copied().unwrap_or(self.fallback)
    }
}

/// Resolves fares from a destination, caching fetched rows for the session.
pub struct FareResolver<P> {
    provider: P,
    table: RwLock<FareTable>,
    fetched: RwLock<HashSet<StationId>>,
    fallback: Fare,
}

impl<P: FareTableProvider> FareResolver<P> {
    pub fn new(provider: P, fallback: Fare) -> Self {
        Self {
            provider,
            table: RwLock::new(FareTable::new()),
            fetched: RwLock::new(HashSet::new()),
            fallback,
        }
    }

    /// Fares from `destination` to every other station.
    ///
    /// The provider is queried once per destination per session. A failed
    /// query leaves every pair on the fallback fare and is retried on the
    /// next call.
    pub async fn fares_from(&self, destination: &StationId) -> FareMap {
        let already = self.fetched.read().await.contains(destination);

        if !already {
            match self.provider.fares_from(destination).await {
                Ok(rows) => {
                    debug!(station = %destination, rows = rows.len(), "fetched fare table");
                    let mut table = self.table.write().await;
                    for row in rows {
                        table.insert(row.from, row.to, row.fare);
                    }
                    self.fetched.write().await.insert(destination.clone());
                }
                Err(e) => {
                    warn!(station = %destination, error = %e, "fare table unavailable, using fallback fares");
                }
            }
        }

        let fares = self.table.read().await.fares_touching(destination);
        FareMap::new(destination.clone(), fares, self.fallback)
    }

    /// Number of station pairs with a known fare so far.
    pub async fn known_pairs(&self) -> usize {
        self.table.read().await.len()
    }
}
