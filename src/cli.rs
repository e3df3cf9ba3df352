use std::fmt::Write as _;

use clap::{Parser, Subcommand};

use crate::storage::Catalog;

#[derive(Parser, Debug)]
#[command(name = "catalogbot")]
#[command(author, version, about = "Telegram bot for browsing and filing images by category", long_about = None)]
pub struct Cli {
    /// Catalog document path (overrides CATALOG_PATH)
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot with long polling
    Run,

    /// Print the catalog as a tree
    Tree {
        /// Also list every image reference
        #[arg(short, long)]
        images: bool,
    },

    /// Validate the catalog document and print totals
    Check,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Renders the catalog as an indented tree, one entry per line.
pub fn render_tree(catalog: &Catalog, with_images: bool) -> String {
    let mut out = String::new();
    if catalog.is_empty() {
        out.push_str("(empty catalog)\n");
        return out;
    }
    for (name, category) in catalog.categories() {
        let _ = writeln!(out, "{name}");
        for sub in category.subcategory_names() {
            let images = category.images(sub);
            let _ = writeln!(out, "  {sub} ({})", images.len());
            if with_images {
                for image in images {
                    let _ = writeln!(out, "    {image}");
                }
            }
        }
    }
    out
}

/// One-line totals for `check`
pub fn summary(catalog: &Catalog) -> String {
    let subcategories: usize = catalog
        .categories()
        .map(|(_, category)| category.subcategory_names().count())
        .sum();
    format!(
        "{} categories, {} subcategories, {} images",
        catalog.len(),
        subcategories,
        catalog.image_count()
    )
}
