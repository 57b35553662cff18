//! Wardrobe CLI
//!
//! Command-line interface for bulk-editing outfit and item assets.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use wardrobe_core::{
    assign_items, replace_outfit_clothing, AssignOutcome, BindingTable, ProjectConfig, RecordKind,
    Selection, ThunkScanner, CONFIG_FILE_NAME,
};

#[derive(Parser)]
#[command(name = "wardrobe")]
#[command(about = "Asset import utilities for outfit and item data")]
#[command(version)]
struct Cli {
    /// Project directory containing wardrobe.json (default: current directory)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default wardrobe.json
    Init {
        /// Project name
        #[arg(short, long)]
        name: Option<String>,

        /// Directory to initialize (default: project directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Replace an item asset's items with comma-separated descriptor ids
    AssignItems {
        /// Item asset to edit
        asset: Option<PathBuf>,

        /// Comma-separated descriptor ids
        #[arg(long, conflicts_with = "ids_file")]
        ids: Option<String>,

        /// Read the comma-separated ids from a file
        #[arg(long)]
        ids_file: Option<PathBuf>,
    },

    /// Replace an outfit's clothing with the entries of a catalog export
    ReplaceOutfit {
        /// Outfit record to edit
        outfit: Option<PathBuf>,

        /// Catalog export (JSON list)
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// Inspect script binding tables
    Bindings {
        #[command(subcommand)]
        command: BindingCommands,
    },
}

#[derive(Subcommand)]
enum BindingCommands {
    /// Build a binding table from a directory of generated thunk sources
    Scan {
        /// Directory of generated sources
        dir: PathBuf,

        /// Where to write the table (default: the project's bindings path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a binding table, or one script's bindings
    Show {
        /// Binding table (default: the project's bindings path)
        table: Option<PathBuf>,

        /// Only show this script
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wardrobe=info".parse()?)
                .add_directive("wardrobe_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let project_dir = match cli.project {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    match cli.command {
        Commands::Init { name, path } => {
            cmd_init(name, path.unwrap_or(project_dir))?;
        }
        Commands::AssignItems {
            asset,
            ids,
            ids_file,
        } => {
            let config = load_config(&project_dir)?;
            cmd_assign_items(&config, asset, ids, ids_file)?;
        }
        Commands::ReplaceOutfit { outfit, catalog } => {
            let config = load_config(&project_dir)?;
            cmd_replace_outfit(&config, outfit, catalog)?;
        }
        Commands::Bindings { command } => {
            let config = load_config(&project_dir)?;
            let default_table = config.bindings_path(&project_dir);
            match command {
                BindingCommands::Scan { dir, output } => {
                    cmd_bindings_scan(&dir, &output.unwrap_or(default_table))?;
                }
                BindingCommands::Show { table, name } => {
                    cmd_bindings_show(&table.unwrap_or(default_table), name.as_deref())?;
                }
            }
        }
    }

    Ok(())
}

fn load_config(project_dir: &Path) -> Result<ProjectConfig> {
    ProjectConfig::load(project_dir).context("Failed to load project configuration")
}

/// Initialize a new project
fn cmd_init(name: Option<String>, project_dir: PathBuf) -> Result<()> {
    let project_name = name.unwrap_or_else(|| {
        project_dir
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Wardrobe".to_string())
    });

    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    tracing::info!("Initializing Wardrobe project: {}", project_name);
    std::fs::create_dir_all(&project_dir).context("Failed to create project directory")?;

    let config = ProjectConfig {
        name: project_name.clone(),
        ..Default::default()
    };
    let config_json = serde_json::to_string_pretty(&config)?;
    std::fs::write(&config_path, config_json).context("Failed to write wardrobe.json")?;

    println!("Initialized Wardrobe project '{}' at {:?}", project_name, project_dir);
    println!("\nNext steps:");
    println!("  wardrobe assign-items Assets/Outfits/Starter.asset --ids \"id_a, id_b\"");
    println!("  wardrobe replace-outfit Assets/Outfits/casual.json --catalog export.json");

    Ok(())
}

/// Replace an item asset's collection
fn cmd_assign_items(
    config: &ProjectConfig,
    asset: Option<PathBuf>,
    ids: Option<String>,
    ids_file: Option<PathBuf>,
) -> Result<()> {
    let selection = Selection::resolve(asset.as_deref(), RecordKind::ItemAsset, &config.record_kinds)?;

    let input = match (ids, ids_file) {
        (Some(ids), _) => ids,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read ids from {}", path.display()))?,
        (None, None) => String::new(),
    };

    match assign_items(&selection, &input, &config.items)? {
        AssignOutcome::NoInput => {
            println!("No IDs entered; {} was not changed.", selection.display());
        }
        AssignOutcome::Replaced { previous, assigned } => {
            println!(
                "Items replaced successfully in {} ({} -> {} entries).",
                selection.display(),
                previous,
                assigned
            );
        }
    }

    Ok(())
}

/// Replace an outfit's clothing from a catalog
fn cmd_replace_outfit(config: &ProjectConfig, outfit: Option<PathBuf>, catalog: Option<PathBuf>) -> Result<()> {
    let selection = Selection::resolve(outfit.as_deref(), RecordKind::Outfit, &config.record_kinds)?;
    let outcome = replace_outfit_clothing(&selection, catalog.as_deref(), &config.outfit)?;

    println!(
        "Outfit data replaced successfully in {} ({} -> {} clothing items).",
        selection.display(),
        outcome.previous,
        outcome.replaced
    );
    Ok(())
}

/// Scan generated thunks into a binding table
fn cmd_bindings_scan(dir: &Path, output: &Path) -> Result<()> {
    let table = ThunkScanner::new().scan_dir(dir)?;

    for problem in table.validate() {
        tracing::warn!("{}", problem);
    }

    table.write(output)?;
    println!(
        "Wrote {} script binding(s) to {}",
        table.scripts.len(),
        output.display()
    );
    Ok(())
}

/// Print bindings
fn cmd_bindings_show(path: &Path, name: Option<&str>) -> Result<()> {
    let table = BindingTable::from_file(path)?;

    let scripts: Vec<_> = match name {
        Some(name) => vec![table
            .find_by_name(name)
            .with_context(|| format!("No binding named {} in {}", name, path.display()))?],
        None => table.scripts.iter().collect(),
    };

    for script in scripts {
        println!(
            "{} ({:#x}, {}) script {}",
            script.name, script.register_type_id, script.base_type, script.script_guid
        );
        for property in &script.properties {
            let default = property.default_literal.as_deref().unwrap_or("-");
            println!(
                "  [{}] {}: {} = {}",
                property.slot, property.field, property.type_name, default
            );
        }
    }

    Ok(())
}
