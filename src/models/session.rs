use chrono::{DateTime, Utc};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::token::DisplayRow;

/// Ordering applied to the merged rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    BySymbolAscending,
    ByBalanceDescending,
}

impl SortKey {
    /// Parse the `sort` query parameter; anything unrecognized falls back to
    /// the default symbol ordering.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("balance") => SortKey::ByBalanceDescending,
            _ => SortKey::BySymbolAscending,
        }
    }
}

/// Phases of a fetch cycle. Error is terminal and reachable from any
/// non-Idle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleState {
    #[default]
    Idle,
    Resolving,
    FetchingBalances,
    FetchingMetadata,
    Ready,
    Error,
}

/// Snapshot of the current fetch cycle. A new cycle clears any previous
/// rows and error before resolving; a terminal error discards rows so stale
/// results are never displayed.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub state: CycleState,
    pub resolved_address: Option<Address>,
    pub sort_key: SortKey,
    pub rows: Vec<DisplayRow>,
    pub error: Option<String>,
    pub generation: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn idle() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: CycleState::Idle,
            resolved_address: None,
            sort_key: SortKey::default(),
            rows: Vec::new(),
            error: None,
            generation: 0,
            started_at: None,
            finished_at: None,
        }
    }

    /// Reset for a fresh cycle tagged with `generation`.
    pub fn begin(&mut self, generation: u64, sort_key: SortKey) {
        self.id = Uuid::new_v4();
        self.state = CycleState::Resolving;
        self.resolved_address = None;
        self.sort_key = sort_key;
        self.rows.clear();
        self.error = None;
        self.generation = generation;
        self.started_at = Some(Utc::now());
        self.finished_at = None;
    }
}
