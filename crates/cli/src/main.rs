use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strata_core::{
    compute_digest, resolve_relative_path, AdoptMode, Binary, BinaryManager,
    BinaryManagerRegistry, CoreConfig, Digest, DocumentService, NewDocument, NonEmptyText,
    ShardableUuid,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Content-addressed binary store CLI")]
struct Cli {
    /// Configuration file
    #[arg(long, env = "STRATA_CONFIG", default_value = "strata.yaml")]
    config: PathBuf,

    /// Repository to operate on (defaults to the configured default repository)
    #[arg(long)]
    repository: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a file through the binary manager
    Put {
        file: PathBuf,
    },
    /// Adopt a file into the store layout
    Inject {
        file: PathBuf,
        /// Expected digest (computed from the file when omitted)
        #[arg(long)]
        digest: Option<String>,
        /// Copy without re-hashing the file
        #[arg(long)]
        trust: bool,
    },
    /// Write a stored binary to stdout or a file
    Get {
        digest: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print where a digest lives in the store layout
    Path {
        digest: String,
    },
    /// Store a file and attach it to a new File document
    Attach {
        file: PathBuf,
        /// Document name
        #[arg(long)]
        name: String,
        /// Parent folder path
        #[arg(long, default_value = "/")]
        parent: String,
        #[arg(long)]
        title: Option<String>,
        /// Media type (detected from content when omitted)
        #[arg(long)]
        mime_type: Option<String>,
        #[arg(long)]
        encoding: Option<String>,
        /// Place the file with a verified adoption instead of a managed upload
        #[arg(long)]
        via_inject: bool,
    },
    /// Show a document record
    Show {
        id: String,
    },
    /// List all documents
    List,
    /// Summarise the binaries held by the store
    Stats,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("strata=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'strata --help' for commands");
        return Ok(());
    };

    let cfg = Arc::new(CoreConfig::load(&cli.config)?);
    tracing::debug!(config = %cli.config.display(), "loaded configuration");
    let registry = Arc::new(BinaryManagerRegistry::from_config(&cfg)?);
    let service = match &cli.repository {
        Some(name) => DocumentService::for_repository(Arc::clone(&cfg), registry, name)?,
        None => DocumentService::new(Arc::clone(&cfg), registry),
    };
    let manager = service.binary_manager()?;

    match command {
        Commands::Put { file } => {
            let binary = put(manager.as_ref(), &file)?;
            println!("{} {}", binary.digest, binary.length);
        }
        Commands::Inject {
            file,
            digest,
            trust,
        } => {
            let binary = inject(manager.as_ref(), &file, digest.as_deref(), trust)?;
            println!("{} {}", binary.digest, binary.length);
        }
        Commands::Get { digest, output } => {
            let digest = Digest::parse(&digest)?;
            let mut reader = manager.open(&digest)?;
            match output {
                Some(path) => {
                    let mut file = fs::File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    io::copy(&mut reader, &mut file)?;
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    io::copy(&mut reader, &mut stdout)?;
                    stdout.flush()?;
                }
            }
        }
        Commands::Path { digest } => {
            let digest = Digest::parse(&digest)?;
            let config = manager.config();
            config.algorithm().validate_digest(&digest)?;
            let relative = resolve_relative_path(&digest, config.depth())?;
            println!("{}", config.data_dir().join(relative).display());
        }
        Commands::Attach {
            file,
            name,
            parent,
            title,
            mime_type,
            encoding,
            via_inject,
        } => {
            let binary = if via_inject {
                inject(manager.as_ref(), &file, None, false)?
            } else {
                put(manager.as_ref(), &file)?
            };

            let mut handle = binary.into_handle();
            if let Some(filename) = file.file_name().and_then(|n| n.to_str()) {
                handle = handle.with_filename(NonEmptyText::new(filename)?);
            }
            let mime_type = match mime_type {
                Some(m) => Some(m),
                None => infer::get_from_path(&file)?.map(|kind| kind.mime_type().to_string()),
            };
            if let Some(m) = mime_type {
                handle = handle.with_mime_type(NonEmptyText::new(m)?);
            }
            if let Some(e) = encoding {
                handle = handle.with_encoding(NonEmptyText::new(e)?);
            }

            let mut new = NewDocument::file(parent, NonEmptyText::new(name)?).with_content(handle);
            if let Some(t) = title {
                new = new.with_title(NonEmptyText::new(t)?);
            }

            let id = service.create_document(new)?;
            println!("Created document with ID: {}", id);
        }
        Commands::Show { id } => {
            let id = ShardableUuid::parse(&id)?;
            let document = service.get_document(&id)?;
            print!("{}", serde_yaml::to_string(&document)?);
        }
        Commands::List => {
            let documents = service.list_documents()?;
            if documents.is_empty() {
                println!("No documents found.");
            } else {
                for document in documents {
                    println!(
                        "ID: {}, Path: {}/{}, Digest: {}, Created: {}",
                        document.id,
                        document.parent_path.trim_end_matches('/'),
                        document.name,
                        document
                            .content
                            .as_ref()
                            .map(|c| c.digest.as_str())
                            .unwrap_or("-"),
                        document.created_at
                    );
                }
            }
        }
        Commands::Stats => {
            let config = manager.config();
            let stats = manager.stats()?;
            println!(
                "{} binaries, {} bytes ({} depth {})",
                stats.binary_count,
                stats.total_bytes,
                config.algorithm(),
                config.depth()
            );
        }
    }

    Ok(())
}

fn put(manager: &dyn BinaryManager, path: &Path) -> anyhow::Result<Binary> {
    let mut file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(manager.get_binary(&mut file)?)
}

fn inject(
    manager: &dyn BinaryManager,
    path: &Path,
    digest: Option<&str>,
    trust: bool,
) -> anyhow::Result<Binary> {
    let expected = match digest {
        Some(d) => Digest::parse(d)?,
        None => {
            let file =
                fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
            compute_digest(file, manager.config().algorithm())?
        }
    };
    let mode = if trust {
        AdoptMode::Trust
    } else {
        AdoptMode::Verify
    };
    Ok(manager.adopt_external_file(path, &expected, mode)?)
}
