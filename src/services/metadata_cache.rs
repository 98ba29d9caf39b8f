use ethers::types::Address;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use crate::models::token::TokenMetadata;

/// Session-lifetime token metadata cache. Append-only: entries are added on
/// first successful fetch and never evicted or overwritten, so concurrent
/// duplicate fetches for the same immutable contract cannot lose updates.
#[derive(Clone, Debug, Default)]
pub struct MetadataCache {
    inner: Arc<RwLock<HashMap<Address, TokenMetadata>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, contract_address: &Address) -> Option<TokenMetadata> {
        self.inner
            .read()
            .expect("metadata cache lock poisoned")
            .get(contract_address)
            .cloned()
    }

    pub fn contains(&self, contract_address: &Address) -> bool {
        self.inner
            .read()
            .expect("metadata cache lock poisoned")
            .contains_key(contract_address)
    }

    /// Insert unless an entry already exists; returns the stored metadata
    /// either way.
    pub fn insert_if_absent(&self, metadata: TokenMetadata) -> TokenMetadata {
        self.inner
            .write()
            .expect("metadata cache lock poisoned")
            .entry(metadata.contract_address)
            .or_insert(metadata)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .expect("metadata cache lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(address: Address, symbol: &str) -> TokenMetadata {
        TokenMetadata {
            contract_address: address,
            symbol: Some(symbol.to_string()),
            decimals: Some(18),
            logo_uri: None,
        }
    }

    #[test]
    fn insert_if_absent_keeps_first_write() {
        let cache = MetadataCache::new();
        let address = Address::repeat_byte(0xaa);

        let stored = cache.insert_if_absent(meta(address, "AAA"));
        assert_eq!(stored.symbol.as_deref(), Some("AAA"));

        // second writer for the same contract does not replace the entry
        let stored = cache.insert_if_absent(meta(address, "BBB"));
        assert_eq!(stored.symbol.as_deref(), Some("AAA"));
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get(&address).unwrap().symbol.as_deref(),
            Some("AAA")
        );
    }

    #[test]
    fn miss_returns_none() {
        let cache = MetadataCache::new();
        assert!(cache.get(&Address::repeat_byte(0x01)).is_none());
        assert!(!cache.contains(&Address::repeat_byte(0x01)));
        assert!(cache.is_empty());
    }
}
