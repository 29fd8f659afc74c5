//! Catalog Synchronization
//!
//! Pull/reconcile and push flows between the local product table and the
//! remote catalog, plus the background task running the full sync on the
//! settings cadence. Every call leaves a sync_log row.

use serde::Serialize;
use std::time::Duration;

use shared::models::{Product, ProductCreate, ProductUpdate};

use crate::catalog::client::{
    CatalogError, RemoteAttribute, RemoteCategory, RemoteProduct, RemoteProductPush,
};
use crate::catalog::images;
use crate::core::ServerState;
use crate::db::repository::{product, settings, sync_log};
use crate::orders::money;
use crate::utils::{AppError, AppResult};

/// Outcome counters for a full pull + reconcile
#[derive(Debug, Default, Serialize)]
pub struct SyncReport {
    pub pulled: usize,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub images_mirrored: usize,
    pub failures: usize,
}

/// Full pull + reconcile. Per-product failures are counted and logged, not
/// propagated; only a failed page fetch aborts.
pub async fn run_full_sync(state: &ServerState) -> AppResult<SyncReport> {
    let remote = match state.catalog.list_all_products().await {
        Ok(r) => r,
        Err(e) => {
            sync_log::record(
                &state.pool,
                "catalog",
                "pull_all",
                false,
                e.to_string(),
                None,
            )
            .await;
            return Err(e.into());
        }
    };

    let mut report = SyncReport {
        pulled: remote.len(),
        ..Default::default()
    };

    for rp in &remote {
        match reconcile_one(state, rp).await {
            Ok((created, mirrored)) => {
                if created {
                    report.created += 1;
                } else {
                    report.updated += 1;
                }
                if mirrored {
                    report.images_mirrored += 1;
                }
            }
            Err(e) => {
                report.failures += 1;
                tracing::warn!(remote_id = rp.id, "Reconcile failed: {}", e);
            }
        }
    }

    // Local products that vanished remotely are removed locally
    let remote_ids: std::collections::HashSet<i64> = remote.iter().map(|p| p.id).collect();
    match product::find(&state.pool, None, None, true).await {
        Ok(locals) => {
            for local in locals {
                let Some(ext) = local.external_id else {
                    continue;
                };
                if remote_ids.contains(&ext) {
                    continue;
                }
                match product::deactivate(&state.pool, local.id).await {
                    Ok(_) => report.deleted += 1,
                    Err(e) => {
                        report.failures += 1;
                        tracing::warn!(product_id = local.id, "Stray removal failed: {}", e);
                    }
                }
            }
        }
        Err(e) => {
            report.failures += 1;
            tracing::warn!("Stray scan failed: {}", e);
        }
    }

    sync_log::record(
        &state.pool,
        "catalog",
        "full_sync",
        report.failures == 0,
        format!(
            "pulled {} (created {}, updated {}, deleted {}, failures {})",
            report.pulled, report.created, report.updated, report.deleted, report.failures
        ),
        serde_json::to_value(&report).ok(),
    )
    .await;

    Ok(report)
}

/// Upsert one remote product locally, keyed by external id. Returns
/// (created, image_mirrored).
async fn reconcile_one(
    state: &ServerState,
    rp: &RemoteProduct,
) -> Result<(bool, bool), AppError> {
    let price = rp.regular_price.parse::<f64>().unwrap_or(0.0);
    let category = rp.categories.first().map(|c| c.name.clone());
    let (size, color) = attribute_pair(&rp.attributes);
    let remote_image = rp.images.first().map(|i| i.src.clone());

    let existing = product::find_by_external_id(&state.pool, rp.id).await?;

    match existing {
        Some(local) => {
            // An already-mirrored local image is kept
            let mut mirrored = false;
            let image = match (&local.image, &remote_image) {
                (Some(img), _) if !img.starts_with("http") => None,
                (_, Some(url)) => {
                    let local_path = images::mirror(
                        state.catalog.http_client(),
                        &state.config.images_dir(),
                        local.id,
                        url,
                    )
                    .await;
                    mirrored = local_path.is_some();
                    Some(local_path.unwrap_or_else(|| url.clone()))
                }
                _ => None,
            };

            product::update(
                &state.pool,
                local.id,
                ProductUpdate {
                    name: Some(rp.name.clone()),
                    description: rp.description.clone(),
                    category,
                    price: Some(price),
                    size,
                    color,
                    stock: rp.stock_quantity,
                    image,
                    is_active: Some(rp.status != "trash"),
                    ..Default::default()
                },
            )
            .await?;
            Ok((false, mirrored))
        }
        None => {
            let stock_min = settings::get(&state.pool).await?.stock_min_default;
            let created = product::create(
                &state.pool,
                ProductCreate {
                    name: rp.name.clone(),
                    description: rp.description.clone(),
                    category,
                    price,
                    size,
                    color,
                    stock: rp.stock_quantity,
                    stock_min: None,
                    image: None,
                    external_id: Some(rp.id),
                },
                stock_min,
            )
            .await?;

            let mut mirrored = false;
            if let Some(url) = &remote_image {
                let local_path = images::mirror(
                    state.catalog.http_client(),
                    &state.config.images_dir(),
                    created.id,
                    url,
                )
                .await;
                mirrored = local_path.is_some();
                let image = local_path.unwrap_or_else(|| url.clone());
                product::update(
                    &state.pool,
                    created.id,
                    ProductUpdate {
                        image: Some(image),
                        ..Default::default()
                    },
                )
                .await?;
            }
            Ok((true, mirrored))
        }
    }
}

/// Push one local product to the remote catalog, create-or-update by
/// external id. The external id is captured on first create.
pub async fn push_one(state: &ServerState, product_id: i64) -> AppResult<Product> {
    let local = product::find_by_id(&state.pool, product_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", product_id)))?;

    let payload = to_remote(&local);
    let result: Result<RemoteProduct, CatalogError> = match local.external_id {
        Some(ext) => state.catalog.update_product(ext, &payload).await,
        None => state.catalog.create_product(&payload).await,
    };

    match result {
        Ok(remote) => {
            let updated = if local.external_id.is_none() {
                product::update(
                    &state.pool,
                    local.id,
                    ProductUpdate {
                        external_id: Some(remote.id),
                        ..Default::default()
                    },
                )
                .await?
            } else {
                local
            };
            sync_log::record(
                &state.pool,
                "catalog",
                "push_one",
                true,
                format!("Pushed product {} (remote {})", updated.id, remote.id),
                None,
            )
            .await;
            Ok(updated)
        }
        Err(e) => {
            sync_log::record(
                &state.pool,
                "catalog",
                "push_one",
                false,
                e.to_string(),
                Some(serde_json::json!({ "product_id": product_id })),
            )
            .await;
            Err(e.into())
        }
    }
}

/// Remove the remote counterpart of a local product. Trash fallback inside
/// the client counts as success.
pub async fn push_delete(state: &ServerState, product_id: i64, external_id: i64) -> AppResult<()> {
    match state.catalog.delete_product(external_id).await {
        Ok(()) => {
            sync_log::record(
                &state.pool,
                "catalog",
                "push_delete",
                true,
                format!("Deleted remote product {}", external_id),
                None,
            )
            .await;
            Ok(())
        }
        Err(e) => {
            sync_log::record(
                &state.pool,
                "catalog",
                "push_delete",
                false,
                e.to_string(),
                Some(serde_json::json!({ "product_id": product_id })),
            )
            .await;
            Err(e.into())
        }
    }
}

/// Background full sync on the settings cadence. The interval is re-read
/// every cycle so changes apply without a restart.
pub fn spawn_periodic_sync(state: ServerState) {
    tokio::spawn(async move {
        loop {
            let cfg = settings::get(&state.pool).await.unwrap_or_default();
            if cfg.sync_enabled {
                match run_full_sync(&state).await {
                    Ok(report) => {
                        tracing::info!(
                            pulled = report.pulled,
                            failures = report.failures,
                            "Periodic catalog sync finished"
                        );
                    }
                    Err(e) => tracing::warn!("Periodic catalog sync failed: {}", e),
                }
            }
            let minutes = cfg.sync_interval_minutes.max(1) as u64;
            tokio::time::sleep(Duration::from_secs(minutes * 60)).await;
        }
    });
}

fn to_remote(p: &Product) -> RemoteProductPush {
    let mut attributes = Vec::new();
    if let Some(size) = &p.size {
        attributes.push(RemoteAttribute {
            name: "size".to_string(),
            options: vec![size.clone()],
        });
    }
    if let Some(color) = &p.color {
        attributes.push(RemoteAttribute {
            name: "color".to_string(),
            options: vec![color.clone()],
        });
    }

    RemoteProductPush {
        name: p.name.clone(),
        kind: "simple".to_string(),
        regular_price: format!("{:.2}", money::to_decimal(p.price)),
        description: p.description.clone(),
        manage_stock: true,
        stock_quantity: p.stock,
        status: if p.is_active { "publish" } else { "draft" }.to_string(),
        categories: p
            .category
            .iter()
            .map(|name| RemoteCategory {
                id: None,
                name: name.clone(),
            })
            .collect(),
        attributes,
    }
}

fn attribute_pair(attrs: &[RemoteAttribute]) -> (Option<String>, Option<String>) {
    let pick = |name: &str| {
        attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .and_then(|a| a.options.first().cloned())
    };
    (pick("size"), pick("color"))
}
