use crate::core::pricing::{MenuItemDraft, PromotionDraft};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "qr-menu.toml";

#[derive(Debug, Clone, Parser)]
#[command(name = "qr-menu")]
#[command(about = "Restaurant QR menu: public view, admin table and export")]
pub struct Cli {
    /// Path to TOML configuration file [default: qr-menu.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Read menu data from a JSON snapshot instead of the backend
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the public menu
    Menu(ViewArgs),
    /// Print the admin table as CSV with section counts
    Admin {
        /// All Items, Drinks or Food
        #[arg(long)]
        section: Option<String>,
    },
    /// Write a zip bundle with the text menu, admin CSV and view JSON
    Export {
        #[command(flatten)]
        view: ViewArgs,
        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<String>,
        /// Export every item, not just available ones
        #[arg(long)]
        all_items: bool,
    },
    /// Show the section and measured-pour status of categories
    Classify {
        #[arg(required = true)]
        categories: Vec<String>,
    },
    /// Check the backend connection and row counts
    Status,
    /// Print the URL the table QR code should encode
    QrUrl {
        /// Public site origin (overrides config)
        #[arg(long)]
        origin: Option<String>,
    },
    /// Manage menu items
    #[command(subcommand)]
    Item(ItemCommand),
    /// Manage promotions
    #[command(subcommand)]
    Promo(PromoCommand),
    /// Update restaurant branding
    Settings {
        #[arg(long)]
        name: String,
        #[arg(long)]
        logo_url: Option<String>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ViewArgs {
    /// All, DRINKS or FOOD (overrides config)
    #[arg(long)]
    pub section: Option<String>,
    /// Exact category name, or All (overrides config)
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ItemCommand {
    Add(ItemFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: ItemFields,
    },
    Delete {
        id: String,
    },
    /// Toggle whether an item appears on the public menu
    Available {
        id: String,
        #[arg(action = clap::ArgAction::Set, required = true)]
        available: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ItemFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub price: String,
    #[arg(long, default_value = "")]
    pub image_url: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Hide the item from the public menu
    #[arg(long)]
    pub unavailable: bool,
    #[arg(long = "price-30ml", default_value = "")]
    pub price_30ml: String,
    #[arg(long = "price-60ml", default_value = "")]
    pub price_60ml: String,
    #[arg(long = "price-90ml", default_value = "")]
    pub price_90ml: String,
    #[arg(long = "price-180ml", default_value = "")]
    pub price_180ml: String,
}

impl From<ItemFields> for MenuItemDraft {
    fn from(fields: ItemFields) -> Self {
        MenuItemDraft {
            name: fields.name,
            category: fields.category,
            price: fields.price,
            image_url: fields.image_url,
            description: fields.description,
            available: !fields.unavailable,
            price_30ml: fields.price_30ml,
            price_60ml: fields.price_60ml,
            price_90ml: fields.price_90ml,
            price_180ml: fields.price_180ml,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum PromoCommand {
    /// List every promotion, inactive ones included
    List,
    Add(PromoFields),
    Activate {
        id: String,
        #[arg(action = clap::ArgAction::Set, required = true)]
        active: bool,
    },
    Remove {
        id: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct PromoFields {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub audience: String,
    #[arg(long)]
    pub inactive: bool,
}

impl From<PromoFields> for PromotionDraft {
    fn from(fields: PromoFields) -> Self {
        PromotionDraft {
            title: fields.title,
            description: fields.description,
            audience: fields.audience,
            active: !fields.inactive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_menu_command() {
        let cli = Cli::try_parse_from([
            "qr-menu", "--snapshot", "menu.json", "menu", "--section", "DRINKS",
        ])
        .unwrap();

        assert_eq!(cli.snapshot, Some(PathBuf::from("menu.json")));
        match cli.command {
            Command::Menu(view) => {
                assert_eq!(view.section.as_deref(), Some("DRINKS"));
                assert_eq!(view.category, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_item_add_maps_to_draft() {
        let cli = Cli::try_parse_from([
            "qr-menu", "item", "add", "--name", "Old Monk", "--category", "Rum", "--price",
            "250", "--price-60ml", "180", "--unavailable",
        ])
        .unwrap();

        let Command::Item(ItemCommand::Add(fields)) = cli.command else {
            panic!("expected item add");
        };
        let draft = MenuItemDraft::from(fields);
        assert_eq!(draft.price_60ml, "180");
        assert_eq!(draft.price_30ml, "");
        assert!(!draft.available);
    }

    #[test]
    fn test_availability_takes_explicit_bool() {
        let cli = Cli::try_parse_from(["qr-menu", "item", "available", "42", "false"]).unwrap();
        match cli.command {
            Command::Item(ItemCommand::Available { id, available }) => {
                assert_eq!(id, "42");
                assert!(!available);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_classify_requires_a_category() {
        assert!(Cli::try_parse_from(["qr-menu", "classify"]).is_err());
    }

    #[test]
    fn test_promo_add_draft() {
        let cli = Cli::try_parse_from(["qr-menu", "promo", "add", "--title", "Happy Hour"]).unwrap();
        let Command::Promo(PromoCommand::Add(fields)) = cli.command else {
            panic!("expected promo add");
        };
        let draft = PromotionDraft::from(fields);
        assert!(draft.active);
        assert_eq!(draft.description, "");
    }

    #[test]
    fn test_promo_list_takes_no_arguments() {
        let cli = Cli::try_parse_from(["qr-menu", "promo", "list"]).unwrap();
        assert!(matches!(cli.command, Command::Promo(PromoCommand::List)));
        assert!(Cli::try_parse_from(["qr-menu", "promo", "list", "p1"]).is_err());
    }
}
