//! The per-client "latest-known-location" store (spec.md §3, §4.5).
//!
//! At most one [`LocationRecord`] is live per `client_id`: the one with
//! the numerically largest `client_timestamp` this server has admitted.
//! Ties do not overwrite — first writer wins on equal timestamps (an
//! explicit open-question resolution, see DESIGN.md).

use std::collections::HashMap;
use tokio::sync::RwLock;

/// The authoritative state stored per client (spec.md §3). Once
/// admitted, all five fields are immutable; an update replaces the
/// whole record rather than merging fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRecord {
    /// The server that first admitted this position. Does not change
    /// as the record propagates — it is the origin, not the custodian.
    pub server_name: String,
    pub time_skew: String,
    pub client_id: String,
    /// Client-supplied position, preserved verbatim.
    pub coords: String,
    pub client_timestamp: String,
}

impl LocationRecord {
    pub fn new(
        server_name: impl Into<String>,
        time_skew: impl Into<String>,
        client_id: impl Into<String>,
        coords: impl Into<String>,
        client_timestamp: impl Into<String>,
    ) -> Self {
        Self {
            server_name: server_name.into(),
            time_skew: time_skew.into(),
            client_id: client_id.into(),
            coords: coords.into(),
            client_timestamp: client_timestamp.into(),
        }
    }

    /// Wire serialization: `AT <server_name> <time_skew> <client_id>
    /// <coords> <client_timestamp>` (spec.md §3), with no trail.
    pub fn to_wire(&self) -> String {
        format!(
            "AT {} {} {} {} {}",
            self.server_name, self.time_skew, self.client_id, self.coords, self.client_timestamp
        )
    }

    /// Numeric value of `client_timestamp`, or `None` if it isn't a
    /// finite decimal (malformed peer traffic, spec.md §4.4).
    pub fn timestamp_value(&self) -> Option<f64> {
        self.client_timestamp
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

/// Outcome of a single monotonic-update attempt (spec.md §4.5). The live
/// record is always available on `Accepted`/`Rejected` so callers can
/// echo it back to an IAMAT originator regardless of which branch fired.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    Accepted(LocationRecord),
    Rejected(LocationRecord),
    /// `client_timestamp` did not parse as a finite decimal. The
    /// registry is untouched; there is no live record to report from
    /// this call alone.
    Invalid,
}

impl UpdateOutcome {
    pub fn accepted(&self) -> bool {
        matches!(self, UpdateOutcome::Accepted(_))
    }

    pub fn live(&self) -> Option<&LocationRecord> {
        match self {
            UpdateOutcome::Accepted(r) | UpdateOutcome::Rejected(r) => Some(r),
            UpdateOutcome::Invalid => None,
        }
    }
}

/// `client_id -> LocationRecord`, private to one server instance.
/// In-memory only; nothing here survives a restart.
#[derive(Default)]
pub struct ClientRegistry {
    clients: RwLock<HashMap<String, LocationRecord>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, client_id: &str) -> Option<LocationRecord> {
        self.clients.read().await.get(client_id).cloned()
    }

    /// Apply the monotonic-update rule from spec.md §4.5.
    pub async fn update(&self, candidate: LocationRecord) -> UpdateOutcome {
        let Some(new_ts) = candidate.timestamp_value() else {
            return UpdateOutcome::Invalid;
        };

        let mut clients = self.clients.write().await;
        match clients.get(&candidate.client_id) {
            None => {
                clients.insert(candidate.client_id.clone(), candidate.clone());
                UpdateOutcome::Accepted(candidate)
            }
            Some(existing) => {
                let old_ts = existing.timestamp_value().unwrap_or(f64::NEG_INFINITY);
                if new_ts > old_ts {
                    clients.insert(candidate.client_id.clone(), candidate.clone());
                    UpdateOutcome::Accepted(candidate)
                } else {
                    UpdateOutcome::Rejected(existing.clone())
                }
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
