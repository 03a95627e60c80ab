use anyhow::Result;
use httpmock::prelude::*;
use qr_menu::core::pipeline::{ExportOptions, EXPORT_FILENAME};
use qr_menu::domain::model::ItemScope;
use qr_menu::{
    CategoryFilter, CategoryRules, LocalStorage, MenuEngine, MenuPipeline, RestClient,
    SectionFilter, SnapshotSource,
};
use std::io::Read;
use std::time::Duration;
use tempfile::TempDir;

fn read_entry(archive: &mut zip::ZipArchive<std::fs::File>, name: &str) -> String {
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

fn options(output_path: &str, section: SectionFilter) -> ExportOptions {
    ExportOptions {
        scope: ItemScope::Public,
        section,
        category: CategoryFilter::All,
        rules: CategoryRules::default(),
        output_path: output_path.to_string(),
    }
}

#[tokio::test]
async fn test_end_to_end_export_from_backend() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_string_lossy().to_string();

    let server = MockServer::start();
    let items_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/menu_items")
            .query_param("available", "eq.true")
            .header("apikey", "anon");
        then.status(200).json_body(serde_json::json!([
            {"id": "1", "name": "Black Label", "category": "Whiskey", "price": 650,
             "image_url": null, "description": null, "available": true},
            {"id": "2", "name": "Fresh Lime Soda", "category": "Soda", "price": 90,
             "image_url": null, "description": "Sweet or salted", "available": true},
            {"id": "3", "name": "Paneer Tikka", "category": "Starters", "price": 280,
             "image_url": null, "description": null, "available": true}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/restaurant_settings");
        then.status(200).json_body(serde_json::json!([
            {"id": "s1", "restaurant_name": "Blue Door", "logo_url": null}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/promotions");
        then.status(200).json_body(serde_json::json!([
            {"id": "p1", "title": "Happy Hour", "description": "5-7pm, 1+1 on pints",
             "audience": null, "active": true, "sort_order": 1,
             "created_at": "2025-03-01T10:00:00Z"}
        ]));
    });

    let client = RestClient::new(&server.base_url(), "anon", Duration::from_secs(5))?;
    let pipeline = MenuPipeline::new(
        client,
        LocalStorage::new(output_path.clone()),
        options(&output_path, SectionFilter::Drinks),
    );

    let saved = MenuEngine::new(pipeline).run().await?;
    items_mock.assert();
    assert!(saved.ends_with(EXPORT_FILENAME));

    let file = std::fs::File::open(temp_dir.path().join(EXPORT_FILENAME))?;
    let mut archive = zip::ZipArchive::new(file)?;
    assert_eq!(archive.len(), 3);

    let text = read_entry(&mut archive, "menu.txt");
    assert!(text.starts_with("Blue Door\n"));
    assert!(text.contains("* Happy Hour\n  5-7pm, 1+1 on pints\n"));
    assert!(text.contains("Fresh Lime Soda  ₹90.00\n    Sweet or salted\n"));
    assert!(!text.contains("Paneer Tikka"));
    assert!(!text.contains("Black Label"));

    let csv = read_entry(&mut archive, "menu.csv");
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.contains("Paneer Tikka,Starters,₹280.00,—,—,—,—,yes"));

    let view: serde_json::Value = serde_json::from_str(&read_entry(&mut archive, "menu_view.json"))?;
    assert_eq!(view["categories"], serde_json::json!(["All", "Soda"]));

    Ok(())
}

#[tokio::test]
async fn test_backend_export_keeps_tier_prices_in_csv() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_string_lossy().to_string();

    let server = MockServer::start();
    let items_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/menu_items")
            .query_param(
                "select",
                "id,name,category,price,image_url,description,available,\
price_30ml,price_60ml,price_90ml,price_180ml",
            )
            .query_param("available", "eq.true");
        then.status(200).json_body(serde_json::json!([
            {"id": "1", "name": "Black Label", "category": "Whiskey", "price": 650,
             "image_url": null, "description": null, "available": true,
             "price_30ml": 220, "price_60ml": 420, "price_90ml": null, "price_180ml": 1200},
            {"id": "2", "name": "Paneer Tikka", "category": "Starters", "price": 280,
             "image_url": null, "description": null, "available": true,
             "price_30ml": null, "price_60ml": null, "price_90ml": null, "price_180ml": null}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/restaurant_settings");
        then.status(200).json_body(serde_json::json!([]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/promotions");
        then.status(200).json_body(serde_json::json!([]));
    });

    let client = RestClient::new(&server.base_url(), "anon", Duration::from_secs(5))?;
    let pipeline = MenuPipeline::new(
        client,
        LocalStorage::new(output_path.clone()),
        options(&output_path, SectionFilter::All),
    );
    MenuEngine::new(pipeline).run().await?;
    items_mock.assert();

    let file = std::fs::File::open(temp_dir.path().join(EXPORT_FILENAME))?;
    let mut archive = zip::ZipArchive::new(file)?;
    let csv = read_entry(&mut archive, "menu.csv");
    assert!(csv.contains("Black Label,Whiskey,₹650.00,₹220.00,₹420.00,—,₹1200.00,yes"));
    assert!(csv.contains("Paneer Tikka,Starters,₹280.00,—,—,—,—,yes"));

    Ok(())
}

#[tokio::test]
async fn test_export_fails_on_backend_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_string_lossy().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/menu_items");
        then.status(500).body("database unavailable");
    });

    let client = RestClient::new(&server.base_url(), "anon", Duration::from_secs(5))?;
    let pipeline = MenuPipeline::new(
        client,
        LocalStorage::new(output_path.clone()),
        options(&output_path, SectionFilter::All),
    );

    let err = MenuEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(
        err,
        qr_menu::MenuError::BackendError { status: 500, .. }
    ));
    assert!(!temp_dir.path().join(EXPORT_FILENAME).exists());

    Ok(())
}

#[tokio::test]
async fn test_export_from_snapshot_shows_empty_state() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let output_path = output_dir.path().to_string_lossy().to_string();

    let snapshot = serde_json::json!({
        "menu_items": [
            {"id": "1", "name": "Mango", "category": "Juice", "price": 120}
        ]
    });
    tokio::fs::write(input_dir.path().join("menu.json"), snapshot.to_string()).await?;

    let source = SnapshotSource::new(
        LocalStorage::new(input_dir.path().to_string_lossy().to_string()),
        "menu.json",
    );
    let pipeline = MenuPipeline::new(
        source,
        LocalStorage::new(output_path.clone()),
        options(&output_path, SectionFilter::Food),
    );

    MenuEngine::new(pipeline).run().await?;

    let file = std::fs::File::open(output_dir.path().join(EXPORT_FILENAME))?;
    let mut archive = zip::ZipArchive::new(file)?;
    let text = read_entry(&mut archive, "menu.txt");
    assert!(text.starts_with("Menu\n"));
    assert!(text.contains("No items found in this category."));

    Ok(())
}
