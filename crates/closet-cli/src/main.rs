use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use closet_core::{Closet, Config, UploadMetadata};

#[derive(Parser)]
#[command(name = "closet")]
#[command(about = "Catalog clothing photos and compose outfits")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and catalog clothing items from the input folder
    Process {
        /// The article of clothing to isolate (e.g. "sweater")
        #[arg(short, long)]
        article: String,

        /// Process a single file instead of the whole input folder
        #[arg(long)]
        input_file: Option<PathBuf>,

        /// Move originals to the archive folder after processing
        #[arg(long)]
        archive: bool,

        /// Free-text description for the catalogued item(s)
        #[arg(short, long)]
        description: Option<String>,

        /// Category to attach (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Compose catalogued items into a single outfit image
    Compose {
        /// Item ids to combine, in composition order
        #[arg(required = true)]
        ids: Vec<i64>,

        /// Free-text description for the outfit
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Add or remove items of an existing outfit and refresh its image
    EditOutfit {
        /// Outfit id to edit
        id: i64,

        /// Item id to add (repeatable)
        #[arg(long = "add")]
        add: Vec<i64>,

        /// Item id to remove (repeatable)
        #[arg(long = "remove")]
        remove: Vec<i64>,
    },

    /// Update the description of a catalogued item
    DescribeItem {
        /// Item id
        id: i64,

        /// New description
        description: String,
    },

    /// Update the description of a catalogued outfit
    DescribeOutfit {
        /// Outfit id
        id: i64,

        /// New description
        description: String,
    },

    /// List catalogued items
    ListItems {
        /// Only items carrying this category
        #[arg(long)]
        category: Option<String>,
    },

    /// List catalogued outfits with their members
    ListOutfits,

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "closet.json")]
        path: PathBuf,
    },
}

fn main() -> Result<(), anyhow::Error> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Set up configuration
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // The -v flag overrides the configured log level
    match cli.verbose {
        0 => {}
        1 => config.log_level = closet_core::config::LogLevel::Debug,
        _ => config.log_level = closet_core::config::LogLevel::Trace,
    }

    // Log to file so progress bars stay readable; fall back to stderr
    if closet_core::logging::init_logger("logs", config.log_level.to_level_filter()).is_err() {
        env_logger::init();
    }

    match cli.command {
        Commands::Process {
            article,
            input_file,
            archive,
            description,
            categories,
            tags,
        } => {
            config.validate()?;

            let mut closet = Closet::with_gemini(config)?;
            let metadata = UploadMetadata {
                description,
                categories,
                tags,
            };

            if let Some(path) = input_file {
                info!("Processing {}", path.display());
                let item = closet.process_path(&path, &article, archive, &metadata)?;
                println!("Saved {}", item.filename);
            } else {
                let summary = closet.process_folder(&article, archive, &metadata)?;
                for item in &summary.items {
                    println!("Saved {}", item.filename);
                }
                for (path, cause) in &summary.failures {
                    eprintln!("Failed {}: {}", path.display(), cause);
                }
            }
            Ok(())
        }

        Commands::Compose { ids, description } => {
            config.validate()?;
            let mut closet = Closet::with_gemini(config)?;

            let outfit = closet.compose_outfit(&ids, description)?;
            println!(
                "Composed {} from {} items",
                outfit.filename,
                outfit.items.len()
            );
            Ok(())
        }

        Commands::EditOutfit { id, add, remove } => {
            config.validate()?;
            let mut closet = Closet::with_gemini(config)?;

            let outfit = closet.edit_outfit(id, &add, &remove)?;
            println!("Outfit {} now has {} items", outfit.id, outfit.items.len());
            Ok(())
        }

        Commands::DescribeItem { id, description } => {
            let mut closet = Closet::with_gemini(config)?;
            let item = closet.set_item_description(id, Some(description))?;
            println!("Updated {}", item.filename);
            Ok(())
        }

        Commands::DescribeOutfit { id, description } => {
            let mut closet = Closet::with_gemini(config)?;
            let outfit = closet.set_outfit_description(id, Some(description))?;
            println!("Updated {}", outfit.filename);
            Ok(())
        }

        Commands::ListItems { category } => {
            let closet = Closet::with_gemini(config)?;
            let items = match category {
                Some(name) => closet.list_items_by_category(&name)?,
                None => closet.list_items()?,
            };
            for item in items {
                println!("{:>4}  {}", item.id, item.filename);
            }
            Ok(())
        }

        Commands::ListOutfits => {
            let closet = Closet::with_gemini(config)?;
            for outfit in closet.list_outfits()? {
                println!("{:>4}  {}", outfit.id, outfit.filename);
                for member in &outfit.items {
                    println!("      - {} ({})", member.filename, member.item_id);
                }
            }
            Ok(())
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}
