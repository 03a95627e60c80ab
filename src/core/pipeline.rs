use crate::core::classifier::CategoryRules;
use crate::core::render::{render_admin_csv, render_public_menu};
use crate::core::view::build_view;
use crate::core::{MenuSource, Pipeline, Storage};
use crate::domain::model::{CategoryFilter, ItemScope, MenuSnapshot, MenuView, SectionFilter};
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const EXPORT_FILENAME: &str = "menu_export.zip";

/// What a single export run renders.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub scope: ItemScope,
    pub section: SectionFilter,
    pub category: CategoryFilter,
    pub rules: CategoryRules,
    pub output_path: String,
}

#[derive(Debug, Clone)]
pub struct MenuExport {
    pub view: MenuView,
    pub text: String,
    pub csv: String,
}

/// Fetches a snapshot, derives the view and writes a zip with the text
/// menu, the admin CSV and the view as JSON.
pub struct MenuPipeline<M: MenuSource, S: Storage> {
    source: M,
    storage: S,
    options: ExportOptions,
}

impl<M: MenuSource, S: Storage> MenuPipeline<M, S> {
    pub fn new(source: M, storage: S, options: ExportOptions) -> Self {
        Self {
            source,
            storage,
            options,
        }
    }
}

#[async_trait::async_trait]
impl<M: MenuSource, S: Storage> Pipeline for MenuPipeline<M, S> {
    type Extracted = MenuSnapshot;
    type Transformed = MenuExport;

    async fn extract(&self) -> Result<MenuSnapshot> {
        tracing::debug!("Fetching {:?} snapshot", self.options.scope);
        self.source.fetch_snapshot(self.options.scope).await
    }

    async fn transform(&self, snapshot: MenuSnapshot) -> Result<MenuExport> {
        let view = build_view(
            &snapshot.menu_items,
            self.options.section,
            &self.options.category,
            &self.options.rules,
        );
        if view.is_empty() {
            tracing::warn!(
                "No items in section {} / category {:?}",
                self.options.section,
                self.options.category
            );
        }

        let text = render_public_menu(
            snapshot.restaurant_settings.as_ref(),
            &view,
            &snapshot.promotions,
        );
        let csv = render_admin_csv(&snapshot.menu_items, &self.options.rules)?;

        Ok(MenuExport { view, text, csv })
    }

    async fn load(&self, export: MenuExport) -> Result<String> {
        let output_path = format!("{}/{}", self.options.output_path, EXPORT_FILENAME);

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>("menu.txt", FileOptions::default())?;
            zip.write_all(export.text.as_bytes())?;

            zip.start_file::<_, ()>("menu.csv", FileOptions::default())?;
            zip.write_all(export.csv.as_bytes())?;

            zip.start_file::<_, ()>("menu_view.json", FileOptions::default())?;
            let json_data = serde_json::to_string_pretty(&export.view)?;
            zip.write_all(json_data.as_bytes())?;

            zip.finish()?.into_inner()
        };

        tracing::debug!("Writing export ({} bytes) to storage", zip_data.len());
        self.storage.write_file(EXPORT_FILENAME, &zip_data).await?;
        Ok(output_path)
    }
}
