//! # Catalog State
//!
//! The terminal's [`CatalogSnapshot`] behind a `tokio::sync::RwLock`.
//! Readers (item grid, combo list, stock checks) share the lock; a refresh
//! swaps the whole snapshot in one write.
//!
//! A refresh that fails keeps the previous snapshot serving.

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

use crate::backend::{BackendResult, CatalogBackend};
use orbit_core::CatalogSnapshot;

#[derive(Debug, Default)]
pub struct CatalogState {
    snapshot: RwLock<CatalogSnapshot>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        CatalogState {
            snapshot: RwLock::new(snapshot),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, CatalogSnapshot> {
        self.snapshot.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, CatalogSnapshot> {
        self.snapshot.write().await
    }

    /// Loads a fresh copy of the whole catalog and swaps it in.
    ///
    /// Everything is fetched before the write lock is taken, so a failure
    /// leaves the current snapshot untouched.
    pub async fn refresh(&self, backend: &dyn CatalogBackend) -> BackendResult<()> {
        let products = backend.list_products(None).await?;
        let combos = backend.list_combos(None).await?;
        let branches = backend.list_branches().await?;
        let categories = backend.list_categories().await?;
        let brands = backend.list_brands().await?;

        let mut snapshot = self.snapshot.write().await;
        snapshot.replace_all(products, combos, branches, categories, brands);

        info!(
            products = snapshot.product_count(),
            combos = snapshot.combo_count(),
            "Catalog refreshed"
        );
        Ok(())
    }

    /// Best-effort refresh. Returns whether the snapshot was replaced.
    pub async fn refresh_or_keep(&self, backend: &dyn CatalogBackend) -> bool {
        match self.refresh(backend).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Catalog refresh failed; keeping the current snapshot");
                false
            }
        }
    }
}
