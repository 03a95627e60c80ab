//! Offline menu source backed by a JSON export of the three tables.
//!
//! Applies the same scoping and ordering the REST queries ask the backend
//! for, so views built from a snapshot match views built from the live
//! database.

use crate::domain::model::{ItemScope, MenuItem, MenuSnapshot, Promotion, RestaurantSettings};
use crate::domain::ports::{MenuSource, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::cmp::Ordering;

pub struct SnapshotSource<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> SnapshotSource<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    async fn load(&self) -> Result<MenuSnapshot> {
        let bytes = self.storage.read_file(&self.path).await?;
        let snapshot: MenuSnapshot = serde_json::from_slice(&bytes)?;
        tracing::debug!(
            "Loaded snapshot '{}' with {} menu items",
            self.path,
            snapshot.menu_items.len()
        );
        Ok(snapshot)
    }
}

pub fn scope_items(mut items: Vec<MenuItem>, scope: ItemScope) -> Vec<MenuItem> {
    match scope {
        ItemScope::Public => {
            items.retain(|item| item.available);
            items.sort_by(|a, b| a.name.cmp(&b.name));
        }
        ItemScope::Admin => {
            items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        }
    }
    items
}

/// `sort_order` ascending with unset values last, then newest first.
pub fn order_promotions(mut promotions: Vec<Promotion>) -> Vec<Promotion> {
    promotions.sort_by(|a, b| {
        let by_sort_order = match (a.sort_order, b.sort_order) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_sort_order.then_with(|| b.created_at.cmp(&a.created_at))
    });
    promotions
}

#[async_trait]
impl<S: Storage> MenuSource for SnapshotSource<S> {
    async fn fetch_menu_items(&self, scope: ItemScope) -> Result<Vec<MenuItem>> {
        Ok(scope_items(self.load().await?.menu_items, scope))
    }

    async fn fetch_settings(&self) -> Result<Option<RestaurantSettings>> {
        Ok(self.load().await?.restaurant_settings)
    }

    async fn fetch_promotions(&self) -> Result<Vec<Promotion>> {
        Ok(order_promotions(self.load().await?.promotions))
    }

    async fn fetch_snapshot(&self, scope: ItemScope) -> Result<MenuSnapshot> {
        let snapshot = self.load().await?;
        Ok(MenuSnapshot {
            menu_items: scope_items(snapshot.menu_items, scope),
            restaurant_settings: snapshot.restaurant_settings,
            promotions: order_promotions(snapshot.promotions),
        })
    }
}
