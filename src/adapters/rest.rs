//! Typed client for the hosted menu database's REST endpoint (`/rest/v1`).

use crate::domain::model::{
    BackendStatus, ItemScope, MenuItem, NewMenuItem, NewPromotion, Promotion, RestaurantSettings,
    SettingsUpdate,
};
use crate::domain::ports::MenuSource;
use crate::utils::error::{MenuError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const MENU_ITEMS: &str = "menu_items";
const SETTINGS: &str = "restaurant_settings";
const PROMOTIONS: &str = "promotions";

/// Both scopes select the tier columns; exports render them from either.
const ITEM_COLUMNS: &str = "id,name,category,price,image_url,description,available,\
price_30ml,price_60ml,price_90ml,price_180ml";

pub struct RestClient {
    base_url: String,
    anon_key: String,
    client: Client,
}

impl RestClient {
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Backend error {}: {}", status, body);
        Err(MenuError::BackendError {
            status: status.as_u16(),
            body,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    /// PATCH/DELETE with `return=representation`; an empty result means no row matched.
    async fn mutate_by_id<B: Serialize + ?Sized>(
        &self,
        method: Method,
        table: &str,
        id: &str,
        body: Option<&B>,
    ) -> Result<()> {
        let mut builder = self
            .request(method, table)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation");
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let rows: Vec<serde_json::Value> = self.send_json(builder).await?;
        if rows.is_empty() {
            return Err(MenuError::NotFoundError {
                what: format!("{} row '{}'", table, id),
            });
        }
        Ok(())
    }

    pub async fn create_menu_item(&self, item: &NewMenuItem) -> Result<MenuItem> {
        tracing::info!("Creating menu item '{}' in '{}'", item.name, item.category);
        let builder = self
            .request(Method::POST, MENU_ITEMS)
            .header("Prefer", "return=representation")
            .json(&[item]);
        let mut rows: Vec<MenuItem> = self.send_json(builder).await?;
        rows.pop().ok_or_else(|| MenuError::BackendError {
            status: 200,
            body: "insert returned no rows".to_string(),
        })
    }

    pub async fn update_menu_item(&self, id: &str, item: &NewMenuItem) -> Result<()> {
        tracing::info!("Updating menu item {}", id);
        self.mutate_by_id(Method::PATCH, MENU_ITEMS, id, Some(item))
            .await
    }

    pub async fn delete_menu_item(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting menu item {}", id);
        self.mutate_by_id::<()>(Method::DELETE, MENU_ITEMS, id, None)
            .await
    }

    pub async fn set_availability(&self, id: &str, available: bool) -> Result<()> {
        tracing::info!("Setting menu item {} available={}", id, available);
        let body = serde_json::json!({ "available": available });
        self.mutate_by_id(Method::PATCH, MENU_ITEMS, id, Some(&body))
            .await
    }

    /// Updates the single settings row. Fails if the row does not exist yet.
    pub async fn update_settings(&self, update: &SettingsUpdate) -> Result<()> {
        let settings = self
            .fetch_settings()
            .await?
            .ok_or_else(|| MenuError::NotFoundError {
                what: "Restaurant settings".to_string(),
            })?;
        tracing::info!("Renaming restaurant to '{}'", update.restaurant_name);
        self.mutate_by_id(Method::PATCH, SETTINGS, &settings.id, Some(update))
            .await
    }

    pub async fn add_promotion(&self, promotion: &NewPromotion) -> Result<Promotion> {
        tracing::info!("Adding promotion '{}'", promotion.title);
        let builder = self
            .request(Method::POST, PROMOTIONS)
            .header("Prefer", "return=representation")
            .json(&[promotion]);
        let mut rows: Vec<Promotion> = self.send_json(builder).await?;
        rows.pop().ok_or_else(|| MenuError::BackendError {
            status: 200,
            body: "insert returned no rows".to_string(),
        })
    }

    pub async fn set_promotion_active(&self, id: &str, active: bool) -> Result<()> {
        let body = serde_json::json!({ "active": active });
        self.mutate_by_id(Method::PATCH, PROMOTIONS, id, Some(&body))
            .await
    }

    pub async fn remove_promotion(&self, id: &str) -> Result<()> {
        tracing::info!("Removing promotion {}", id);
        self.mutate_by_id::<()>(Method::DELETE, PROMOTIONS, id, None)
            .await
    }

    async fn count_rows(&self, table: &str) -> Result<u64> {
        let builder = self
            .request(Method::HEAD, table)
            .query(&[("select", "id")])
            .header("Prefer", "count=exact");
        let response = Self::check(builder.send().await?).await?;

        let range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        Ok(parse_content_range_total(range).unwrap_or(0))
    }

    /// Row counts for the admin status panel. Never fails; a failing count
    /// reports as disconnected.
    pub async fn status(&self) -> BackendStatus {
        let menu = self.count_rows(MENU_ITEMS).await;
        let settings = self.count_rows(SETTINGS).await;

        if let Err(e) = &menu {
            tracing::warn!("Counting menu items failed: {}", e);
        }
        if let Err(e) = &settings {
            tracing::warn!("Counting settings rows failed: {}", e);
        }

        BackendStatus {
            connected: menu.is_ok() && settings.is_ok(),
            menu_items: menu.unwrap_or(0),
            settings_rows: settings.unwrap_or(0),
        }
    }
}

/// `0-9/42` or `*/42` -> 42.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

#[async_trait]
impl MenuSource for RestClient {
    async fn fetch_menu_items(&self, scope: ItemScope) -> Result<Vec<MenuItem>> {
        let builder = match scope {
            ItemScope::Public => self.request(Method::GET, MENU_ITEMS).query(&[
                ("select", ITEM_COLUMNS),
                ("available", "eq.true"),
                ("order", "name.asc"),
            ]),
            ItemScope::Admin => self.request(Method::GET, MENU_ITEMS).query(&[
                ("select", ITEM_COLUMNS),
                ("order", "category.asc,name.asc"),
            ]),
        };

        tracing::debug!("Fetching {:?} menu items from {}", scope, self.base_url);
        let items: Vec<MenuItem> = self.send_json(builder).await?;
        tracing::debug!("Fetched {} menu items", items.len());
        Ok(items)
    }

    async fn fetch_settings(&self) -> Result<Option<RestaurantSettings>> {
        let builder = self
            .request(Method::GET, SETTINGS)
            .query(&[("select", "*"), ("limit", "1")]);
        let rows: Vec<RestaurantSettings> = self.send_json(builder).await?;
        Ok(rows.into_iter().next())
    }

    async fn fetch_promotions(&self) -> Result<Vec<Promotion>> {
        let builder = self
            .request(Method::GET, PROMOTIONS)
            .query(&[("select", "*"), ("order", "sort_order.asc,created_at.desc")]);
        self.send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::Method::{HEAD, PATCH};

    const KEY: &str = "anon-test-key";

    fn client(server: &MockServer) -> RestClient {
        RestClient::new(&server.base_url(), KEY, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("0-9/42"), Some(42));
        assert_eq!(parse_content_range_total("*/7"), Some(7));
        assert_eq!(parse_content_range_total("*/*"), None);
        assert_eq!(parse_content_range_total(""), None);
    }

    #[tokio::test]
    async fn test_public_fetch_filters_available_and_orders_by_name() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/menu_items")
                .query_param("select", ITEM_COLUMNS)
                .query_param("available", "eq.true")
                .query_param("order", "name.asc")
                .header("apikey", KEY)
                .header("authorization", format!("Bearer {}", KEY));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"id": "1", "name": "Mango", "category": "Juice", "price": 120,
                     "image_url": null, "description": null, "available": true},
                    {"id": "2", "name": "Margherita", "category": "Pizza", "price": 299.5,
                     "image_url": null, "description": "Classic", "available": true}
                ]));
        });

        let items = client(&server)
            .fetch_menu_items(ItemScope::Public)
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].price, 299.5);
        assert_eq!(items[1].description.as_deref(), Some("Classic"));
    }

    #[tokio::test]
    async fn test_admin_fetch_orders_by_category_then_name() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/menu_items")
                .query_param("order", "category.asc,name.asc")
                .query_param("select", ITEM_COLUMNS);
            then.status(200).json_body(serde_json::json!([
                {"id": "1", "name": "Jameson", "category": "Whiskey", "price": 400,
                 "available": false, "price_30ml": 150, "price_60ml": null,
                 "price_90ml": null, "price_180ml": 800}
            ]));
        });

        let items = client(&server)
            .fetch_menu_items(ItemScope::Admin)
            .await
            .unwrap();

        api_mock.assert();
        assert!(!items[0].available);
        assert_eq!(items[0].price_180ml, Some(800.0));
    }

    #[tokio::test]
    async fn test_backend_error_is_surfaced() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/menu_items");
            then.status(401).body("Invalid API key");
        });

        let err = client(&server)
            .fetch_menu_items(ItemScope::Public)
            .await
            .unwrap_err();

        match err {
            MenuError::BackendError { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "Invalid API key");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_settings_takes_first_row() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/restaurant_settings")
                .query_param("limit", "1");
            then.status(200).json_body(serde_json::json!([
                {"id": "s1", "restaurant_name": "Blue Door", "logo_url": null}
            ]));
        });

        let settings = client(&server).fetch_settings().await.unwrap().unwrap();
        assert_eq!(settings.restaurant_name, "Blue Door");
    }

    #[tokio::test]
    async fn test_snapshot_survives_promotion_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/menu_items");
            then.status(200).json_body(serde_json::json!([]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/restaurant_settings");
            then.status(200).json_body(serde_json::json!([]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/promotions");
            then.status(404).body("relation \"promotions\" does not exist");
        });

        let snapshot = client(&server)
            .fetch_snapshot(ItemScope::Public)
            .await
            .unwrap();

        assert!(snapshot.menu_items.is_empty());
        assert!(snapshot.restaurant_settings.is_none());
        assert!(snapshot.promotions.is_empty());
    }

    #[tokio::test]
    async fn test_create_menu_item_posts_array_payload() {
        let server = MockServer::start();
        let new_item = NewMenuItem {
            name: "Masala Chai".to_string(),
            category: "Tea".to_string(),
            price: 60.0,
            image_url: None,
            description: None,
            available: true,
            price_30ml: None,
            price_60ml: None,
            price_90ml: None,
            price_180ml: None,
        };

        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/rest/v1/menu_items")
                .header("prefer", "return=representation")
                .json_body(serde_json::json!([{
                    "name": "Masala Chai", "category": "Tea", "price": 60.0,
                    "image_url": null, "description": null, "available": true,
                    "price_30ml": null, "price_60ml": null, "price_90ml": null,
                    "price_180ml": null
                }]));
            then.status(201).json_body(serde_json::json!([{
                "id": "new-1", "name": "Masala Chai", "category": "Tea", "price": 60.0
            }]));
        });

        let created = client(&server).create_menu_item(&new_item).await.unwrap();

        api_mock.assert();
        assert_eq!(created.id, "new-1");
    }

    #[tokio::test]
    async fn test_set_availability_patches_by_id() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/rest/v1/menu_items")
                .query_param("id", "eq.42")
                .json_body(serde_json::json!({"available": false}));
            then.status(200)
                .json_body(serde_json::json!([{"id": "42", "available": false}]));
        });

        client(&server).set_availability("42", false).await.unwrap();
        api_mock.assert();
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE)
                .path("/rest/v1/menu_items")
                .query_param("id", "eq.missing");
            then.status(200).json_body(serde_json::json!([]));
        });

        let err = client(&server).delete_menu_item("missing").await.unwrap_err();
        assert!(matches!(err, MenuError::NotFoundError { .. }));
    }

    #[tokio::test]
    async fn test_update_settings_requires_existing_row() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/restaurant_settings");
            then.status(200).json_body(serde_json::json!([]));
        });

        let update = SettingsUpdate {
            restaurant_name: "New Name".to_string(),
            logo_url: None,
        };
        let err = client(&server).update_settings(&update).await.unwrap_err();
        assert!(matches!(err, MenuError::NotFoundError { .. }));
    }

    #[tokio::test]
    async fn test_update_settings_patches_known_id() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/restaurant_settings");
            then.status(200).json_body(serde_json::json!([
                {"id": "s1", "restaurant_name": "Old Name"}
            ]));
        });
        let patch_mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/rest/v1/restaurant_settings")
                .query_param("id", "eq.s1")
                .json_body(serde_json::json!({"restaurant_name": "New Name"}));
            then.status(200)
                .json_body(serde_json::json!([{"id": "s1", "restaurant_name": "New Name"}]));
        });

        let update = SettingsUpdate {
            restaurant_name: "New Name".to_string(),
            logo_url: None,
        };
        client(&server).update_settings(&update).await.unwrap();
        patch_mock.assert();
    }

    #[tokio::test]
    async fn test_status_counts_rows() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(HEAD)
                .path("/rest/v1/menu_items")
                .header("prefer", "count=exact");
            then.status(200).header("Content-Range", "*/12");
        });
        server.mock(|when, then| {
            when.method(HEAD).path("/rest/v1/restaurant_settings");
            then.status(200).header("Content-Range", "*/1");
        });

        let status = client(&server).status().await;
        assert_eq!(
            status,
            BackendStatus {
                menu_items: 12,
                settings_rows: 1,
                connected: true
            }
        );
    }

    #[tokio::test]
    async fn test_status_reports_disconnected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(HEAD).path("/rest/v1/menu_items");
            then.status(200).header("Content-Range", "*/3");
        });
        server.mock(|when, then| {
            when.method(HEAD).path("/rest/v1/restaurant_settings");
            then.status(500);
        });

        let status = client(&server).status().await;
        assert!(!status.connected);
        assert_eq!(status.menu_items, 3);
        assert_eq!(status.settings_rows, 0);
    }
}
