use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use folderdeck_lib::config::AppConfig;
use folderdeck_lib::locations::{DirectoryEntry, LocationAction, LocationDraft, LocationPatch};
use folderdeck_lib::path_validation::validate_location_path;
use folderdeck_lib::AppState;

#[derive(Parser)]
#[command(name = "deck-cli")]
#[command(about = "Manage FolderDeck locations", long_about = None)]
struct Cli {
    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Location store, overrides the config
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show all locations in order
    List,
    /// Register a new location
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        path: String,
        #[command(flatten)]
        flags: LocationFlags,
    },
    /// Change fields of a location
    Edit {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        path: Option<String>,
        #[arg(long)]
        perspective: Option<String>,
        #[arg(long)]
        read_only: Option<bool>,
        #[arg(long)]
        watch: Option<bool>,
        #[arg(long)]
        persist_index: Option<bool>,
    },
    Remove {
        id: String,
    },
    Up {
        id: String,
    },
    Down {
        id: String,
    },
    /// Make a location the default one
    #[command(name = "default")]
    SetDefault {
        id: String,
    },
    /// Print the sub-directory tree of a location
    Tree {
        id: String,
        #[arg(short, long, default_value_t = 1)]
        depth: usize,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct LocationFlags {
    #[arg(long)]
    default: bool,
    #[arg(long)]
    read_only: bool,
    #[arg(long)]
    watch: bool,
    #[arg(long)]
    persist_index: bool,
    #[arg(long)]
    perspective: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if cli.store.is_some() {
        config.store_path = cli.store.clone();
    }

    let state = AppState::bootstrap(&config).await?;

    match cli.command {
        Command::List => {
            // Persisted below so seeded identifiers stay stable across runs.
            print_locations(&state).await;
        }
        Command::Add { name, path, flags } => {
            if let Err(e) = validate_location_path(&path) {
                anyhow::bail!("Invalid location path: {e}");
            }
            let registry = state
                .add_location(LocationDraft {
                    uuid: None,
                    name,
                    paths: vec![path],
                    perspective: flags.perspective,
                    is_default: flags.default,
                    is_read_only: flags.read_only,
                    watch_for_changes: flags.watch,
                    persist_index: flags.persist_index,
                })
                .await;
            if let Some(added) = registry.locations().last() {
                println!("➕ Added {} ({})", added.name, added.uuid);
            }
        }
        Command::Edit {
            id,
            name,
            path,
            perspective,
            read_only,
            watch,
            persist_index,
        } => {
            require_location(&state, &id).await?;
            if let Some(path) = &path {
                if let Err(e) = validate_location_path(path) {
                    anyhow::bail!("Invalid location path: {e}");
                }
            }
            state
                .edit_location(LocationPatch {
                    uuid: id.clone(),
                    name,
                    paths: path.map(|p| vec![p]),
                    perspective,
                    is_default: None,
                    is_read_only: read_only,
                    watch_for_changes: watch,
                    persist_index,
                    children: None,
                })
                .await;
            println!("🔄 Updated {id}");
        }
        Command::Remove { id } => {
            require_location(&state, &id).await?;
            state.remove_location(&id).await;
            println!("❌ Removed {id}");
        }
        Command::Up { id } => {
            require_location(&state, &id).await?;
            state.dispatch(LocationAction::MoveUp(id)).await;
            print_locations(&state).await;
        }
        Command::Down { id } => {
            require_location(&state, &id).await?;
            state.dispatch(LocationAction::MoveDown(id)).await;
            print_locations(&state).await;
        }
        Command::SetDefault { id } => {
            require_location(&state, &id).await?;
            state
                .dispatch(LocationAction::Edit(LocationPatch::new(id.clone()).with_default(true)))
                .await;
            println!("⭐ {id} is now the default location");
        }
        Command::Tree { id, depth, json } => {
            require_location(&state, &id).await?;

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?,
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner.set_message(format!("Loading sub-directories (depth {depth})..."));

            let loaded = state.load_sub_directories(&id, depth).await;
            spinner.finish_and_clear();

            let Some(location) = loaded else {
                anyhow::bail!("Location disappeared while loading: {id}");
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&location)?);
            } else {
                println!("📁 {} ({})", location.name, location.primary_path().unwrap_or("-"));
                match &location.children {
                    Some(children) => print_tree(children, 1),
                    None => println!("   (no sub-directories loaded)"),
                }
                for entry in state.log_manager.get_logs(Some(&id)) {
                    if entry.level == "error" {
                        eprintln!("⚠️  {}", entry.message);
                    }
                }
            }
            return Ok(());
        }
    }

    state.persist().await?;
    Ok(())
}

async fn require_location(state: &AppState, id: &str) -> anyhow::Result<()> {
    if state.location(id).await.is_none() {
        anyhow::bail!("No location with id {id}");
    }
    Ok(())
}

async fn print_locations(state: &AppState) {
    let locations = state.locations().await;
    if locations.is_empty() {
        println!("No locations registered.");
        return;
    }

    println!("{:<3} {:<38} {:<20} {}", "", "ID", "NAME", "PATH");
    println!("{}", "-".repeat(80));
    for location in &locations {
        let mut marks = String::new();
        if location.is_default {
            marks.push('*');
        }
        if location.is_read_only {
            marks.push('R');
        }
        println!(
            "{:<3} {:<38} {:<20} {}",
            marks,
            location.uuid,
            location.name,
            location.primary_path().unwrap_or("-")
        );
    }
}

fn print_tree(entries: &[DirectoryEntry], level: usize) {
    for entry in entries {
        println!("{}└─ {}", "   ".repeat(level), entry.name);
        if let Some(children) = &entry.children {
            print_tree(children, level + 1);
        }
    }
}
