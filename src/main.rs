//! cubeweave CLI: edit data-cube project documents in a graph store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Deserialize;

use cubeweave::backend::{GraphStore, WriteBatch};
use cubeweave::cascade::{self, CreateProject, UpdateDictionary};
use cubeweave::config::{BackendConfig, CubeConfig, open_backend};
use cubeweave::graph::{Iri, Term, Triple};
use cubeweave::model::Payload;
use cubeweave::store::{ResourceStore, SaveSummary};
use cubeweave::vocab::shape;

#[derive(Parser)]
#[command(name = "cubeweave", version, about = "Data-cube project document store")]
struct Cli {
    /// Configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep documents in an embedded store in this directory, overriding
    /// the configured store.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write documents from a JSON seed file, replacing existing ones.
    Load {
        /// JSON array of `{"iri": …, "triples": […]}` documents.
        #[arg(long)]
        file: PathBuf,
    },

    /// Print a document as N-Triples.
    Show {
        #[arg(long, value_parser = parse_iri)]
        iri: Iri,
    },

    /// Create a project in a projects collection.
    CreateProject {
        #[arg(long, value_parser = parse_iri)]
        collection: Iri,
        #[arg(long)]
        label: String,
        #[arg(long, value_parser = parse_iri)]
        creator: Iri,
        /// Scaffold CSV mapping documents.
        #[arg(long)]
        csv: bool,
    },

    /// Create a column mapping on a table from a JSON payload.
    CreateColumnMapping {
        #[arg(long, value_parser = parse_iri)]
        table: Iri,
        #[arg(long)]
        payload: PathBuf,
    },

    /// Delete a table and its column mappings.
    DeleteTable {
        #[arg(long, value_parser = parse_iri)]
        iri: Iri,
    },

    /// Delete a column mapping.
    DeleteColumnMapping {
        #[arg(long, value_parser = parse_iri)]
        iri: Iri,
    },

    /// Replace a dataset's metadata with a JSON payload.
    UpdateDataset {
        #[arg(long, value_parser = parse_iri)]
        iri: Iri,
        #[arg(long)]
        payload: PathBuf,
    },

    /// Replace a dictionary's entries with a JSON payload.
    UpdateDictionary {
        #[arg(long, value_parser = parse_iri)]
        iri: Iri,
        #[arg(long)]
        payload: PathBuf,
        /// Rewrite observations with new entries.
        #[arg(long, conflicts_with = "no_apply")]
        apply: bool,
        /// Leave observations untouched.
        #[arg(long)]
        no_apply: bool,
    },

    /// Queue a transformation job in a job collection.
    StartTransformation {
        #[arg(long, value_parser = parse_iri)]
        jobs: Iri,
    },

    /// Apply a JSON status report to a job.
    UpdateJob {
        #[arg(long, value_parser = parse_iri)]
        iri: Iri,
        #[arg(long)]
        payload: PathBuf,
    },

    /// List the members of a collection.
    Members {
        #[arg(long, value_parser = parse_iri)]
        collection: Iri,
    },
}

#[derive(Deserialize)]
struct SeedDocument {
    iri: Iri,
    #[serde(default)]
    triples: Vec<Triple>,
}

fn parse_iri(value: &str) -> std::result::Result<Iri, String> {
    Iri::new(value).map_err(|e| e.to_string())
}

fn read_payload(path: &Path) -> Result<Payload> {
    let content = std::fs::read_to_string(path).into_diagnostic()?;
    serde_json::from_str(&content).into_diagnostic()
}

fn print_saved(summary: SaveSummary) {
    println!(
        "Saved: {} created, {} updated, {} deleted",
        summary.created, summary.updated, summary.deleted
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CubeConfig::load(path)?,
        None => CubeConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.store = BackendConfig::Local {
            path: data_dir.clone(),
        };
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .init();

    let backend: Arc<dyn GraphStore> = open_backend(&config.store)?;
    let mut store = ResourceStore::new(Arc::clone(&backend));

    match cli.command {
        Commands::Load { file } => {
            let content = std::fs::read_to_string(&file).into_diagnostic()?;
            let documents: Vec<SeedDocument> = serde_json::from_str(&content).into_diagnostic()?;
            let mut batch = WriteBatch::new();
            for document in &documents {
                batch.replace(document.iri.clone(), document.triples.clone());
            }
            backend.write(&batch).await?;
            println!("Loaded {} documents from {}", documents.len(), file.display());
        }

        Commands::Show { iri } => {
            let resource = store.get(&iri).await?;
            println!("# <{iri}> ({} triples)", resource.len());
            for triple in resource.triples() {
                println!("{triple}");
            }
        }

        Commands::CreateProject {
            collection,
            label,
            creator,
            csv,
        } => {
            let project = cascade::create_project(
                &mut store,
                CreateProject {
                    projects_collection: collection,
                    label,
                    creator,
                    source_kind: csv.then_some(shape::project_create_csv),
                },
            )
            .await?;
            println!("Created project <{project}>");
        }

        Commands::CreateColumnMapping { table, payload } => {
            let payload = read_payload(&payload)?;
            let mapping = cascade::create_column_mapping(&mut store, &table, &payload).await?;
            print_saved(store.save().await?);
            println!("Created column mapping <{mapping}>");
        }

        Commands::DeleteTable { iri } => {
            cascade::delete_table(&mut store, &Term::Iri(iri)).await?;
            print_saved(store.save().await?);
        }

        Commands::DeleteColumnMapping { iri } => {
            cascade::delete_column_mapping(&mut store, &iri).await?;
            print_saved(store.save().await?);
        }

        Commands::UpdateDataset { iri, payload } => {
            let payload = read_payload(&payload)?;
            cascade::update_dataset(&mut store, &iri, &payload).await?;
            print_saved(store.save().await?);
        }

        Commands::UpdateDictionary {
            iri,
            payload,
            apply,
            no_apply,
        } => {
            let propagate = if apply {
                Some(true)
            } else if no_apply {
                Some(false)
            } else {
                config.propagate_mappings.then_some(true)
            };
            let propagator = config.propagator(&backend)?;
            let update = cascade::update_dictionary(
                &mut store,
                UpdateDictionary {
                    dictionary: iri,
                    payload: read_payload(&payload)?,
                    propagate,
                },
                &propagator,
            )
            .await?;
            print_saved(store.save().await?);
            println!(
                "Dictionary has {} entries, {} new",
                update.dictionary.entries.len(),
                update.new_entries.len()
            );
            if let Some(handle) = update.propagation {
                // The process would exit before a detached rewrite finishes.
                handle.await.into_diagnostic()?;
                println!("Propagated new entries to observations");
            }
        }

        Commands::StartTransformation { jobs } => {
            let job = cascade::start_transformation(&mut store, &jobs).await?;
            print_saved(store.save().await?);
            println!("Queued job <{job}>");
        }

        Commands::UpdateJob { iri, payload } => {
            let payload = read_payload(&payload)?;
            let job = cascade::update_job(&mut store, &iri, &payload).await?;
            print_saved(store.save().await?);
            match job.status {
                Some(status) => println!("Job <{iri}> is {status:?}"),
                None => println!("Job <{iri}> has no status"),
            }
        }

        Commands::Members { collection } => {
            let members = store.members(&collection).await?;
            if members.is_empty() {
                println!("No members.");
            } else {
                println!("Members ({}):", members.len());
                for member in members {
                    println!("  {member}");
                }
            }
        }
    }

    Ok(())
}
