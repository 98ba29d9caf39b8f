use ethers::types::{Address, U256};
use futures::future::join_all;
use log::{debug, info, warn};
use std::{
    cmp::Ordering,
    collections::HashMap,
    str::FromStr,
    sync::{
        atomic::{AtomicU64, Ordering as AtomicOrdering},
        Arc, Mutex,
    },
};

use crate::{
    errors::CustomError,
    models::{
        session::{CycleState, Session, SortKey},
        token::{DisplayRow, TokenBalanceEntry, TokenMetadata, UNKNOWN_SYMBOL},
    },
    services::{metadata_cache::MetadataCache, provider::ChainDataProvider},
};

/// Orchestrates one balance-fetch cycle: resolve the identifier, list
/// balances, fetch/merge metadata through the cache, and sort the merged
/// rows. Owns the session snapshot the API exposes.
///
/// Overlapping cycles are tolerated: each one is tagged with a generation
/// from a monotonic counter, and a completing cycle commits its session
/// updates only while its generation is still the latest issued. Stale
/// completions are discarded silently.
pub struct BalanceAggregator {
    provider: Arc<dyn ChainDataProvider>,
    cache: MetadataCache,
    session: Mutex<Session>,
    generation: AtomicU64,
}

impl BalanceAggregator {
    /// The cache is handed in by the owner (session/process scope), never a
    /// module-level singleton.
    pub fn new(provider: Arc<dyn ChainDataProvider>, cache: MetadataCache) -> Self {
        Self {
            provider,
            cache,
            session: Mutex::new(Session::idle()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn session_snapshot(&self) -> Session {
        self.session
            .lock()
            .expect("session lock poisoned")
            .clone()
    }

    pub(crate) fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, AtomicOrdering::SeqCst) + 1
    }

    /// Apply `f` to the session only if `generation` is still the latest
    /// issued. Returns whether the update was committed.
    pub(crate) fn update_session<F>(&self, generation: u64, f: F) -> bool
    where
        F: FnOnce(&mut Session),
    {
        let mut session = self.session.lock().expect("session lock poisoned");
        if generation != self.generation.load(AtomicOrdering::SeqCst) {
            return false;
        }
        f(&mut session);
        true
    }

    fn fail_session(&self, generation: u64, error: &CustomError) {
        let committed = self.update_session(generation, |s| {
            s.state = CycleState::Error;
            s.rows.clear();
            s.error = Some(error.to_string());
            s.finished_at = Some(chrono::Utc::now());
        });
        if !committed {
            debug!("discarding stale error from fetch cycle {}", generation);
        }
    }

    /// Resolve a user-supplied identifier to a canonical address.
    ///
    /// Canonical hex input is returned unchanged without touching the
    /// resolver. Anything containing a dot is treated as a name. This is a
    /// deliberate heuristic, not a full address-format validator.
    pub async fn resolve_address(&self, identifier: &str) -> Result<Address, CustomError> {
        let identifier = identifier.trim();
        if let Some(address) = parse_canonical(identifier) {
            return Ok(address);
        }
        if !identifier.contains('.') {
            return Err(CustomError::InvalidIdentifier(identifier.to_string()));
        }
        match self.provider.resolve_name(identifier).await {
            Ok(Some(address)) => Ok(address),
            Ok(None) => Err(CustomError::UnresolvedName(identifier.to_string())),
            Err(e) => Err(CustomError::ResolutionFailed(e.to_string())),
        }
    }

    /// List balances for a resolved address. Zero-balance entries, if the
    /// provider returns them, are passed through untouched; filtering here
    /// would change the number of rendered rows.
    pub async fn fetch_balances(
        &self,
        address: Address,
    ) -> Result<Vec<TokenBalanceEntry>, CustomError> {
        self.provider
            .list_balances(address)
            .await
            .map_err(|e| CustomError::BalanceFetch(e.to_string()))
    }

    /// Fetch metadata for every entry, going to the provider only for cache
    /// misses. Misses are fetched concurrently and merged into the cache.
    ///
    /// Failures are isolated per token: a contract whose metadata fetch
    /// fails is left out of the returned mapping and its row later renders
    /// with placeholder data. One bad contract never aborts the batch.
    pub async fn fetch_metadata_batch(
        &self,
        entries: &[TokenBalanceEntry],
    ) -> HashMap<Address, TokenMetadata> {
        let mut merged = HashMap::new();
        let mut pending: Vec<Address> = Vec::new();
        for entry in entries {
            if let Some(metadata) = self.cache.get(&entry.contract_address) {
                merged.insert(entry.contract_address, metadata);
            } else if !pending.contains(&entry.contract_address) {
                pending.push(entry.contract_address);
            }
        }

        let fetches = pending.into_iter().map(|contract_address| {
            let provider = Arc::clone(&self.provider);
            async move { (contract_address, provider.get_metadata(contract_address).await) }
        });

        for (contract_address, outcome) in join_all(fetches).await {
            match outcome {
                Ok(metadata) => {
                    let stored = self.cache.insert_if_absent(metadata);
                    merged.insert(contract_address, stored);
                }
                Err(e) => {
                    warn!("metadata fetch failed for {:?}: {}", contract_address, e);
                }
            }
        }
        merged
    }

    /// Merge balances with metadata and sort. Pure: identical inputs yield
    /// identical ordered output (rows are built in entry order and the sort
    /// is stable).
    pub fn build_display_rows(
        entries: &[TokenBalanceEntry],
        metadata_by_address: &HashMap<Address, TokenMetadata>,
        sort_key: SortKey,
    ) -> Vec<DisplayRow> {
        let mut rows: Vec<DisplayRow> = entries
            .iter()
            .map(|entry| {
                let metadata = metadata_by_address.get(&entry.contract_address);
                let symbol = metadata
                    .and_then(|m| m.symbol.clone())
                    .unwrap_or_else(|| UNKNOWN_SYMBOL.to_string());
                let decimals = metadata.and_then(|m| m.decimals);
                let formatted_balance = decimals.and_then(|d| {
                    parse_raw_balance(&entry.raw_balance).map(|v| format_units(v, d))
                });
                DisplayRow {
                    contract_address: entry.contract_address,
                    symbol,
                    decimals,
                    raw_balance: entry.raw_balance.clone(),
                    formatted_balance,
                    logo_uri: metadata.and_then(|m| m.logo_uri.clone()),
                }
            })
            .collect();

        match sort_key {
            SortKey::BySymbolAscending => {
                rows.sort_by(|a, b| a.symbol.to_lowercase().cmp(&b.symbol.to_lowercase()));
            }
            SortKey::ByBalanceDescending => {
                // rows that cannot be scaled (unknown decimals) sort last
                rows.sort_by(|a, b| match (scaled_value(a), scaled_value(b)) {
                    (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                });
            }
        }
        rows
    }

    /// Run one full fetch cycle: Resolving → FetchingBalances →
    /// FetchingMetadata → Ready, with Error terminal from any phase. Entry
    /// clears the previous rows and error; a terminal error discards rows
    /// so the caller never renders stale data next to an error message.
    pub async fn run_fetch_cycle(
        &self,
        identifier: &str,
        sort_key: SortKey,
    ) -> Result<Vec<DisplayRow>, CustomError> {
        let generation = self.next_generation();
        self.update_session(generation, |s| s.begin(generation, sort_key));
        info!("fetch cycle {}: resolving {:?}", generation, identifier);

        let address = match self.resolve_address(identifier).await {
            Ok(address) => address,
            Err(e) => {
                self.fail_session(generation, &e);
                return Err(e);
            }
        };
        self.update_session(generation, |s| {
            s.resolved_address = Some(address);
            s.state = CycleState::FetchingBalances;
        });

        let entries = match self.fetch_balances(address).await {
            Ok(entries) => entries,
            Err(e) => {
                self.fail_session(generation, &e);
                return Err(e);
            }
        };
        info!(
            "fetch cycle {}: {} balance entries for {:?}",
            generation,
            entries.len(),
            address
        );
        self.update_session(generation, |s| s.state = CycleState::FetchingMetadata);

        let metadata_by_address = self.fetch_metadata_batch(&entries).await;
        let rows = Self::build_display_rows(&entries, &metadata_by_address, sort_key);

        let committed = self.update_session(generation, |s| {
            s.state = CycleState::Ready;
            s.rows = rows.clone();
            s.finished_at = Some(chrono::Utc::now());
        });
        if !committed {
            debug!("discarding stale result from fetch cycle {}", generation);
        }
        Ok(rows)
    }
}

/// Accept only full-length 0x-prefixed hex as canonical form.
fn parse_canonical(identifier: &str) -> Option<Address> {
    let hex = identifier.strip_prefix("0x")?;
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Address::from_str(identifier).ok()
}

fn parse_raw_balance(raw: &str) -> Option<U256> {
    if let Some(hex) = raw.strip_prefix("0x") {
        U256::from_str_radix(hex, 16).ok()
    } else {
        U256::from_dec_str(raw).ok()
    }
}

/// Scale a raw integer amount down by `decimals`, trimming trailing zeros.
fn format_units(amount: U256, decimals: u8) -> String {
    let mut s = amount.to_string();
    if s.len() <= decimals as usize {
        let pad = decimals as usize - s.len() + 1;
        s.insert_str(0, &"0".repeat(pad));
    }
    let point = s.len() - decimals as usize;
    s.insert(point, '.');

    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Numeric value of a row for balance ordering; None when decimals are
/// unknown or the raw balance does not parse.
fn scaled_value(row: &DisplayRow) -> Option<f64> {
    let decimals = row.decimals?;
    let raw = parse_raw_balance(&row.raw_balance)?;
    let raw: f64 = raw.to_string().parse().ok()?;
    Some(raw / 10f64.powi(decimals as i32))
}
