use crate::domain::model::{ItemScope, MenuItem, MenuSnapshot, Promotion, RestaurantSettings};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Read side of the hosted menu database.
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn fetch_menu_items(&self, scope: ItemScope) -> Result<Vec<MenuItem>>;
    async fn fetch_settings(&self) -> Result<Option<RestaurantSettings>>;
    async fn fetch_promotions(&self) -> Result<Vec<Promotion>>;

    /// Fetches everything a render needs. A failing promotions query does
    /// not fail the menu.
    async fn fetch_snapshot(&self, scope: ItemScope) -> Result<MenuSnapshot> {
        let menu_items = self.fetch_menu_items(scope).await?;
        let restaurant_settings = self.fetch_settings().await?;
        let promotions = match self.fetch_promotions().await {
            Ok(promotions) => promotions,
            Err(e) => {
                tracing::warn!("Promotions unavailable, rendering without them: {}", e);
                Vec::new()
            }
        };

        Ok(MenuSnapshot {
            menu_items,
            restaurant_settings,
            promotions,
        })
    }
}

#[async_trait]
impl<T: MenuSource + ?Sized> MenuSource for Box<T> {
    async fn fetch_menu_items(&self, scope: ItemScope) -> Result<Vec<MenuItem>> {
        (**self).fetch_menu_items(scope).await
    }

    async fn fetch_settings(&self) -> Result<Option<RestaurantSettings>> {
        (**self).fetch_settings().await
    }

    async fn fetch_promotions(&self) -> Result<Vec<Promotion>> {
        (**self).fetch_promotions().await
    }

    async fn fetch_snapshot(&self, scope: ItemScope) -> Result<MenuSnapshot> {
        (**self).fetch_snapshot(scope).await
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;
    type Transformed: Send;

    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    async fn load(&self, result: Self::Transformed) -> Result<String>;
}
