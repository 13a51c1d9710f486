//! # Catalog Commands
//!
//! The POS item grid, the combo list and the combo editor.
//!
//! ## Combo Editor Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pick 2-3 products ──► preview_combo ──► price / offer ──► save_combo   │
//! │                            │                                  │         │
//! │                            ▼                                  ▼         │
//! │                  original total, savings %,         backend.save_combo  │
//! │                  discount %, stock                  snapshot upsert     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Admins manage combos for any branch. Branch managers only for their own
//! branch. POS operators only sell them.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::CatalogBackend;
use crate::error::ApiError;
use crate::state::{CatalogState, SessionState};
use orbit_core::combo::{preview_combo as price_preview, resolve_constituents, ComboPreview};
use orbit_core::validation::{validate_combo, validate_search_query};
use orbit_core::{Combo, Money, PricedCombo, Product, SaleableItem, SessionContext, UserRole};

/// Combo editor form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboDraft {
    /// `None` creates a new combo.
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub product_ids: Vec<String>,
    pub price_cents: i64,
    pub offer_price_cents: Option<i64>,
    /// Ignored for branch managers, whose combos always belong to their branch.
    #[serde(default)]
    pub branch_ids: Vec<String>,
}

async fn context_of(session: &SessionState) -> SessionContext {
    session.with_session(|s| s.context().clone()).await
}

/// Items sellable at the session's branch, products first, then combos.
pub async fn list_items(
    session: &SessionState,
    catalog: &CatalogState,
    search: &str,
) -> Result<Vec<SaleableItem>, ApiError> {
    let search = validate_search_query(search)?;
    let branch = session
        .with_session(|s| s.branch_id().map(str::to_string))
        .await?;
    debug!(branch = %branch, search = %search, "list_items command");

    Ok(catalog.read().await.available_items(&branch, &search))
}

/// Combos the session may see, priced against the current catalog.
pub async fn list_combos(
    session: &SessionState,
    catalog: &CatalogState,
    search: &str,
) -> Result<Vec<PricedCombo>, ApiError> {
    let search = validate_search_query(search)?;
    let ctx = context_of(session).await;
    debug!(search = %search, "list_combos command");

    Ok(catalog.read().await.combos_for(&ctx, &search))
}

/// Products the session may pick when building a combo.
pub async fn list_products(session: &SessionState, catalog: &CatalogState) -> Vec<Product> {
    let ctx = context_of(session).await;
    catalog
        .read()
        .await
        .products_for(&ctx)
        .into_iter()
        .cloned()
        .collect()
}

/// Live pricing for a selection that has not been saved yet.
pub async fn preview_combo(
    session: &SessionState,
    catalog: &CatalogState,
    product_ids: &[String],
    price_cents: i64,
    offer_price_cents: Option<i64>,
) -> Result<ComboPreview, ApiError> {
    let ctx = context_of(session).await;
    let snapshot = catalog.read().await;

    let preview = price_preview(
        product_ids,
        Money::from_cents(price_cents),
        offer_price_cents.map(Money::from_cents),
        |id| snapshot.product(id).filter(|p| ctx.can_see(&p.branch_ids)),
    )?;
    Ok(preview)
}

/// Creates or updates a combo definition.
///
/// ## Steps
/// 1. Role check (admin or branch manager)
/// 2. Field validation, then composition check against the catalog
/// 3. Backend save
/// 4. Snapshot upsert, so the POS sees it without a refresh
pub async fn save_combo(
    session: &SessionState,
    catalog: &CatalogState,
    backend: &dyn CatalogBackend,
    draft: ComboDraft,
) -> Result<PricedCombo, ApiError> {
    let ctx = context_of(session).await;

    let branch_ids = match ctx.role {
        UserRole::Admin => draft.branch_ids,
        UserRole::BranchManager => match &ctx.branch_id {
            Some(branch) => vec![branch.clone()],
            None => return Err(orbit_core::CoreError::NoBranchAssigned.into()),
        },
        UserRole::PosOperator => {
            return Err(ApiError::forbidden("Only admins and managers can edit combos"))
        }
    };

    let now = Utc::now();
    let existing = match &draft.id {
        Some(id) => catalog.read().await.combo(id).cloned(),
        None => None,
    };

    if let Some(existing) = &existing {
        if !ctx.can_see(&existing.branch_ids) {
            return Err(ApiError::not_found("Combo", &existing.id));
        }
    }

    let mut combo = Combo {
        id: draft.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        name: draft.name.trim().to_string(),
        description: draft.description.trim().to_string(),
        product_ids: draft.product_ids,
        price_cents: draft.price_cents,
        offer_price_cents: draft.offer_price_cents,
        branch_ids,
        created_at: existing.as_ref().map_or(now, |c| c.created_at),
        updated_at: now,
    };

    validate_combo(&combo)?;
    // Stored ids are the resolved, deduplicated set.
    combo.product_ids = {
        let snapshot = catalog.read().await;
        let ids: Vec<String> = resolve_constituents(&combo.product_ids, |id| snapshot.product(id))?
            .into_iter()
            .map(|p| p.id.clone())
            .collect();
        ids
    };

    backend.save_combo(&combo).await?;
    info!(id = %combo.id, name = %combo.name, "Combo saved");

    let mut snapshot = catalog.write().await;
    snapshot.upsert_combo(combo.clone());
    Ok(snapshot.priced_combo(&combo.id)?)
}
