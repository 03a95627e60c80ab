use crate::adapters::rest::RestClient;
use crate::adapters::snapshot::SnapshotSource;
use crate::adapters::storage::LocalStorage;
use crate::config::cli::{Cli, Command, ItemCommand, PromoCommand, ViewArgs};
use crate::config::MenuConfig;
use crate::core::classifier::CategoryRules;
use crate::core::engine::MenuEngine;
use crate::core::pipeline::{ExportOptions, MenuPipeline};
use crate::core::pricing::{MenuItemDraft, PromotionDraft};
use crate::core::render::{
    menu_url, render_admin_csv, render_promotion_list, render_public_menu,
};
use crate::core::view::{build_view, filter_by_section, section_counts};
use crate::core::MenuSource;
use crate::domain::model::{CategoryFilter, ItemScope, MenuItem, SectionFilter, SettingsUpdate};
use crate::utils::error::{MenuError, Result};
use crate::utils::validation::non_empty;
use std::path::Path;

fn rest_client(config: &MenuConfig) -> Result<RestClient> {
    let backend = config.backend()?;
    RestClient::new(&backend.url, &backend.anon_key, config.timeout())
}

fn open_source(cli: &Cli, config: &MenuConfig) -> Result<Box<dyn MenuSource>> {
    match &cli.snapshot {
        Some(path) => {
            let dir = path
                .parent()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default();
            let file = path
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .ok_or_else(|| MenuError::ConfigError {
                    message: format!("Snapshot path '{}' has no file name", path.display()),
                })?;
            tracing::debug!("Using snapshot {}", path.display());
            Ok(Box::new(SnapshotSource::new(LocalStorage::new(dir), file)))
        }
        None => Ok(Box::new(rest_client(config)?)),
    }
}

/// Mutations always go to the live backend.
fn admin_client(cli: &Cli, config: &MenuConfig) -> Result<RestClient> {
    if cli.snapshot.is_some() {
        return Err(MenuError::ConfigError {
            message: "Changes cannot be written to a snapshot; drop --snapshot".to_string(),
        });
    }
    rest_client(config)
}

fn selectors(args: &ViewArgs, config: &MenuConfig) -> Result<(SectionFilter, CategoryFilter)> {
    let section = match &args.section {
        Some(s) => s.parse()?,
        None => config.section()?,
    };
    let category = match &args.category {
        Some(c) => CategoryFilter::from(c.as_str()),
        None => config.category(),
    };
    Ok((section, category))
}

pub fn describe_category(category: &str, rules: &CategoryRules) -> String {
    let pricing = if rules.is_measured_pour(category) {
        "measured pour (30/60/90/180 ml)"
    } else {
        "single price"
    };
    format!("{}\t{}\t{}", category, rules.classify_section(category), pricing)
}

pub fn admin_table(
    items: &[MenuItem],
    section: SectionFilter,
    rules: &CategoryRules,
) -> Result<String> {
    let counts = section_counts(items, rules);
    let visible: Vec<MenuItem> = filter_by_section(items, section, rules)
        .into_iter()
        .cloned()
        .collect();

    let mut out = format!(
        "All Items ({})  Drinks ({})  Food ({})\n\n",
        counts.all, counts.drinks, counts.food
    );
    out.push_str(&render_admin_csv(&visible, rules)?);
    Ok(out)
}

pub async fn run(cli: Cli, config: MenuConfig) -> Result<()> {
    let rules = config.rules();

    match &cli.command {
        Command::Menu(args) => {
            let (section, category) = selectors(args, &config)?;
            let snapshot = open_source(&cli, &config)?
                .fetch_snapshot(ItemScope::Public)
                .await?;
            let view = build_view(&snapshot.menu_items, section, &category, &rules);
            tracing::info!(
                "Showing {} of {} items",
                view.filtered_count(),
                snapshot.menu_items.len()
            );
            print!(
                "{}",
                render_public_menu(
                    snapshot.restaurant_settings.as_ref(),
                    &view,
                    &snapshot.promotions
                )
            );
        }
        Command::Admin { section } => {
            let section = match section {
                Some(s) => s.parse()?,
                None => SectionFilter::All,
            };
            let items = open_source(&cli, &config)?
                .fetch_menu_items(ItemScope::Admin)
                .await?;
            print!("{}", admin_table(&items, section, &rules)?);
        }
        Command::Export {
            view,
            output,
            all_items,
        } => {
            let (section, category) = selectors(view, &config)?;
            let output_path = output.clone().unwrap_or_else(|| config.output.path.clone());
            let options = ExportOptions {
                scope: if *all_items {
                    ItemScope::Admin
                } else {
                    ItemScope::Public
                },
                section,
                category,
                rules,
                output_path: output_path.clone(),
            };

            let pipeline = MenuPipeline::new(
                open_source(&cli, &config)?,
                LocalStorage::new(output_path),
                options,
            );
            let saved = MenuEngine::new(pipeline).run().await?;
            println!("Export saved to: {}", saved);
        }
        Command::Classify { categories } => {
            for category in categories {
                println!("{}", describe_category(category, &rules));
            }
        }
        Command::Status => {
            let status = rest_client(&config)?.status().await;
            println!(
                "Connection: {}",
                if status.connected { "Connected" } else { "Error" }
            );
            println!("Menu items: {}", status.menu_items);
            println!("Settings rows: {}", status.settings_rows);
        }
        Command::QrUrl { origin } => {
            let origin = origin
                .clone()
                .or_else(|| config.menu.origin.clone())
                .ok_or_else(|| MenuError::MissingConfigError {
                    field: "menu.origin".to_string(),
                })?;
            println!("{}", menu_url(&origin)?);
        }
        Command::Item(command) => {
            run_item(command, &admin_client(&cli, &config)?, &rules).await?
        }
        Command::Promo(command) => run_promo(command, &cli, &config).await?,
        Command::Settings { name, logo_url } => {
            let restaurant_name = non_empty(name)
                .ok_or_else(|| MenuError::validation("Restaurant name is required"))?;
            let update = SettingsUpdate {
                restaurant_name,
                logo_url: logo_url.as_deref().and_then(non_empty),
            };
            admin_client(&cli, &config)?.update_settings(&update).await?;
            println!("Restaurant settings updated");
        }
    }

    Ok(())
}

async fn run_item(
    command: &ItemCommand,
    client: &RestClient,
    rules: &CategoryRules,
) -> Result<()> {
    match command {
        ItemCommand::Add(fields) => {
            let item = MenuItemDraft::from(fields.clone()).into_new_item(rules)?;
            let created = client.create_menu_item(&item).await?;
            println!("Created menu item {}", created.id);
        }
        ItemCommand::Update { id, fields } => {
            let item = MenuItemDraft::from(fields.clone()).into_new_item(rules)?;
            client.update_menu_item(id, &item).await?;
            println!("Updated menu item {}", id);
        }
        ItemCommand::Delete { id } => {
            client.delete_menu_item(id).await?;
            println!("Deleted menu item {}", id);
        }
        ItemCommand::Available { id, available } => {
            client.set_availability(id, *available).await?;
            println!(
                "Menu item {} is now {}",
                id,
                if *available { "available" } else { "hidden" }
            );
        }
    }
    Ok(())
}

/// Listing reads through the menu source, so it also works on a snapshot.
async fn run_promo(command: &PromoCommand, cli: &Cli, config: &MenuConfig) -> Result<()> {
    match command {
        PromoCommand::List => {
            let promotions = open_source(cli, config)?.fetch_promotions().await?;
            print!("{}", render_promotion_list(&promotions));
        }
        PromoCommand::Add(fields) => {
            let draft = PromotionDraft::from(fields.clone());
            let promotion = admin_client(cli, config)?
                .add_promotion(&draft.into_new_promotion()?)
                .await?;
            println!("Added promotion {}", promotion.id);
        }
        PromoCommand::Activate { id, active } => {
            admin_client(cli, config)?
                .set_promotion_active(id, *active)
                .await?;
            println!(
                "Promotion {} is now {}",
                id,
                if *active { "active" } else { "inactive" }
            );
        }
        PromoCommand::Remove { id } => {
            admin_client(cli, config)?.remove_promotion(id).await?;
            println!("Removed promotion {}", id);
        }
    }
    Ok(())
}

/// Loads the config file if it exists; a missing default file is not an error.
pub fn load_config(path: &Path, explicit: bool) -> Result<MenuConfig> {
    if path.exists() {
        MenuConfig::from_file(path)
    } else if explicit {
        Err(MenuError::ConfigError {
            message: format!("Config file '{}' not found", path.display()),
        })
    } else {
        tracing::debug!("No config file at {}, using defaults", path.display());
        Ok(MenuConfig::default())
    }
}
