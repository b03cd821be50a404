//! # Address Resolver Capability
//!
//! Resolves a logical contract name (e.g. `evidence/2`) to a callable
//! location. The naming service itself is an external collaborator; the
//! evidence layer only depends on this narrow interface.
//!
//! `CachingResolver` decorates any resolver with a lookup cache and the
//! explicit `invalidate()` required for reload: after invalidation the
//! next resolve hits the underlying service again.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::ResolverError;

/// A callable contract location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractLocation {
    /// Contract address on the ledger.
    pub address: String,
}

/// Contract-name resolution with explicit cache invalidation.
pub trait AddressResolver: Send + Sync {
    /// Resolve a logical name to a contract location.
    fn resolve(&self, name: &str) -> Result<ContractLocation, ResolverError>;

    /// Drop any cached resolutions. A no-op for resolvers that do not
    /// cache.
    fn invalidate(&self);
}

/// A resolver over a fixed name-to-address table.
///
/// Used for deployments whose contract locations are pinned in
/// configuration, and by tests.
#[derive(Debug, Default)]
pub struct StaticResolver {
    entries: HashMap<String, String>,
}

impl StaticResolver {
    /// Build from a name-to-address table.
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl AddressResolver for StaticResolver {
    fn resolve(&self, name: &str) -> Result<ContractLocation, ResolverError> {
        self.entries
            .get(name)
            .map(|address| ContractLocation {
                address: address.clone(),
            })
            .ok_or_else(|| ResolverError::NotFound {
                name: name.to_string(),
            })
    }

    fn invalidate(&self) {}
}

/// Caches successful resolutions from an inner resolver.
pub struct CachingResolver {
    inner: Box<dyn AddressResolver>,
    cache: RwLock<HashMap<String, ContractLocation>>,
}

impl CachingResolver {
    /// Wrap an inner resolver with a cache.
    pub fn new(inner: Box<dyn AddressResolver>) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }
}

impl AddressResolver for CachingResolver {
    fn resolve(&self, name: &str) -> Result<ContractLocation, ResolverError> {
        if let Some(hit) = self.cache.read().get(name) {
            return Ok(hit.clone());
        }
        let location = self.inner.resolve(name)?;
        self.cache
            .write()
            .insert(name.to_string(), location.clone());
        Ok(location)
    }

    fn invalidate(&self) {
        tracing::debug!("invalidating contract location cache");
        self.cache.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct CountingResolver {
        calls: Arc<AtomicU32>,
    }

    impl AddressResolver for CountingResolver {
        fn resolve(&self, name: &str) -> Result<ContractLocation, ResolverError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ContractLocation {
                address: format!("0x{name}"),
            })
        }

        fn invalidate(&self) {}
    }

    #[test]
    fn static_resolver_misses_unknown_names() {
        let r = StaticResolver::default();
        assert!(matches!(
            r.resolve("evidence/1"),
            Err(ResolverError::NotFound { .. })
        ));
    }

    #[test]
    fn cache_hits_skip_inner_resolver() {
        let calls = Arc::new(AtomicU32::new(0));
        let caching = CachingResolver::new(Box::new(CountingResolver {
            calls: calls.clone(),
        }));
        caching.resolve("evidence/1").unwrap();
        caching.resolve("evidence/1").unwrap();
        caching.resolve("evidence/1").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalidate_forces_fresh_lookup() {
        let calls = Arc::new(AtomicU32::new(0));
        let caching = CachingResolver::new(Box::new(CountingResolver {
            calls: calls.clone(),
        }));
        caching.resolve("evidence/2").unwrap();
        caching.invalidate();
        caching.resolve("evidence/2").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
