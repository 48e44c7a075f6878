//! Process-lifetime wiring of stores, retriever and invalidator.
//!
//! Connections are opened once from configuration and passed explicitly to
//! the components that need them; drivers call [`Services::close`] on a
//! clean shutdown.

use std::sync::Arc;

use readthru_core::{AppConfig, CacheAside, CacheDb, Error, Invalidator};

use crate::DocumentDb;
use crate::generate::{Regeneration, SeasonGenerator, replace_collection};

/// Everything a driver needs to query, invalidate and regenerate.
#[derive(Clone)]
pub struct Services {
    pub config: AppConfig,
    pub cache: CacheDb,
    pub store: DocumentDb,
    pub retriever: CacheAside,
    pub invalidator: Invalidator,
    pub generator: SeasonGenerator,
}

impl Services {
    /// Open both databases named by `config`.
    pub async fn open(config: AppConfig) -> Result<Self, Error> {
        let cache = CacheDb::open(&config.cache_db_path).await?;
        let store = DocumentDb::open(&config.store_db_path).await?;
        tracing::debug!(
            cache = %config.cache_db_path.display(),
            store = %config.store_db_path.display(),
            "opened stores"
        );
        Ok(Self::from_parts(config, cache, store))
    }

    /// Build from already opened stores.
    pub fn from_parts(config: AppConfig, cache: CacheDb, store: DocumentDb) -> Self {
        let retriever = CacheAside::new(Arc::new(cache.clone()), Arc::new(store.clone()), config.collection.clone());
        let invalidator = retriever.invalidator();
        let generator = SeasonGenerator::new(config.teams.iter().cloned());
        Self { config, cache, store, retriever, invalidator, generator }
    }

    /// Replace the collection with `seasons` freshly generated seasons and
    /// invalidate the cache.
    pub async fn regenerate(&self, seasons: u32) -> Result<Regeneration, Error> {
        let documents = {
            let mut rng = rand::rng();
            self.generator.generate(seasons, &mut rng)
        };
        replace_collection(&self.store, &self.invalidator, &self.config.collection, documents).await
    }

    /// Close both connections. Both are attempted even if the first fails.
    pub async fn close(&self) -> Result<(), Error> {
        let cache = self.cache.clone().close().await;
        let store = self.store.clone().close().await;
        cache.and(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readthru_core::Filter;

    async fn services() -> Services {
        let config = AppConfig { teams: vec!["A".into(), "B".into(), "C".into()], ..Default::default() };
        let cache = CacheDb::open_in_memory().await.unwrap();
        let store = DocumentDb::open_in_memory().await.unwrap();
        Services::from_parts(config, cache, store)
    }

    #[tokio::test]
    async fn test_regenerate_then_query() {
        let services = services().await;
        let report = services.regenerate(2).await.unwrap();
        assert_eq!(report.inserted, 2);

        let lookup = services.retriever.retrieve(&Filter::eq("Season", 1)).await.unwrap();
        assert!(!lookup.cache_hit);
        assert_eq!(lookup.document.len(), 1);
        assert_eq!(services.cache.len().await.unwrap(), 1);

        services.regenerate(2).await.unwrap();
        assert!(services.cache.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_close() {
        let services = services().await;
        services.close().await.unwrap();
        assert!(services.cache.len().await.is_err());
    }
}
