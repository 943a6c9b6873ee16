//! Docshelf command-line client.
//!
//! Thin application boundary over the library crates: loads configuration,
//! initializes tracing, constructs the API client and tree model explicitly,
//! and dispatches one subcommand. Every failure is rendered as a user
//! message, with the non-empty-folder conflict kept distinct.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use comfy_table::Table;
use docshelf_api::{Document, DocumentId, FileUpload, HttpDocumentsClient, Parent};
use docshelf_common::{AppResult, Config};
use docshelf_graph::{layout, relation_nodes};
use docshelf_tree::DocumentTree;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docshelf", version, about = "Client for the docshelf document API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the children of a folder (or the root).
    Ls {
        /// Parent folder id; omit for the root listing.
        parent: Option<DocumentId>,
    },
    /// Print the hierarchy as an indented tree.
    Tree {
        /// Folder id to start from; omit for the root.
        parent: Option<DocumentId>,
        /// Maximum folder depth to expand.
        #[arg(long, default_value_t = 3)]
        depth: usize,
    },
    /// Create a folder.
    Mkdir {
        /// Folder name.
        name: String,
        /// Parent folder id; omit for the root.
        #[arg(long)]
        parent: Option<DocumentId>,
    },
    /// Upload one or more files. Batches are sent concurrently.
    Upload {
        /// Files to upload.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Target folder id; omit for the root.
        #[arg(long)]
        parent: Option<DocumentId>,
    },
    /// Move a document to another folder.
    Mv {
        /// Document to move.
        id: DocumentId,
        /// New parent folder id; omit to move to the root.
        #[arg(long)]
        to: Option<DocumentId>,
    },
    /// Delete a document.
    Rm {
        /// Document to delete.
        id: DocumentId,
    },
    /// Print a document's text content.
    Cat {
        /// Document to read.
        id: DocumentId,
    },
    /// Replace a document's content with a local file's text.
    Put {
        /// Document to update.
        id: DocumentId,
        /// File holding the new content.
        path: PathBuf,
    },
    /// Download a file's raw bytes.
    Download {
        /// Document to download.
        id: DocumentId,
        /// Output path; defaults to `document-{id}`.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the laid-out knowledge graph.
    Graph,
    /// Search the corpus.
    Search {
        /// Search query.
        query: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.clone().into()),
        )
        .init();

    let client = HttpDocumentsClient::new(&config.api)?;
    let tree = DocumentTree::new(Arc::new(client));

    match cli.command {
        Command::Ls { parent } => ls(&tree, Parent::from(parent)).await,
        Command::Tree { parent, depth } => print_tree(&tree, Parent::from(parent), depth).await,
        Command::Mkdir { name, parent } => {
            let folder = tree.create_folder(&name, Parent::from(parent)).await?;
            println!("created folder {} (id {})", folder.content, folder.id);
            Ok(())
        }
        Command::Upload { paths, parent } => upload(&tree, &paths, Parent::from(parent)).await,
        Command::Mv { id, to } => {
            let moved = tree.move_document(id, Parent::from(to)).await?;
            println!("moved {} (id {}) to {}", moved.content, moved.id, moved.parent());
            Ok(())
        }
        Command::Rm { id } => {
            tree.delete_document(id).await?;
            println!("deleted document {id}");
            Ok(())
        }
        Command::Cat { id } => {
            let content = tree.content(id).await?;
            println!("{content}");
            Ok(())
        }
        Command::Put { id, path } => {
            let content = tokio::fs::read_to_string(&path).await?;
            let updated = tree.update_content(id, &content).await?;
            println!("updated {} (id {})", updated.content, updated.id);
            Ok(())
        }
        Command::Download { id, out } => download(&tree, id, out).await,
        Command::Graph => print_graph(&tree).await,
        Command::Search { query } => search(&tree, &query).await,
    }
}

async fn ls(tree: &DocumentTree, parent: Parent) -> AppResult<()> {
    let documents = tree.children(parent).await?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "NAME", "KIND", "MIME", "VIEWER"]);
    for document in &documents {
        let strategy = docshelf_viewer::select_for(document);
        table.add_row(vec![
            document.id.to_string(),
            document.content.clone(),
            if document.is_folder() { "folder" } else { "file" }.to_string(),
            document
                .doc_metadata
                .mime_type
                .clone()
                .unwrap_or_else(|| "-".to_string()),
            format!("{strategy:?}"),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn print_tree(tree: &DocumentTree, parent: Parent, max_depth: usize) -> AppResult<()> {
    let mut stack: Vec<(Document, usize)> = Vec::new();
    for document in tree.children(parent).await?.into_iter().rev() {
        stack.push((document, 0));
    }

    while let Some((document, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        let marker = if document.is_folder() { "+" } else { "-" };
        println!("{indent}{marker} {} (id {})", document.content, document.id);

        if document.is_folder() && depth + 1 < max_depth {
            for child in tree.expand(document.id).await?.into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
    Ok(())
}

async fn upload(tree: &DocumentTree, paths: &[PathBuf], parent: Parent) -> AppResult<()> {
    let mut uploads = Vec::with_capacity(paths.len());
    for path in paths {
        uploads.push(read_upload(path).await?);
    }

    let outcomes = tree.upload_many(uploads, parent).await;

    let mut failures = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(document) => println!("uploaded {} (id {})", outcome.name, document.id),
            Err(e) => {
                failures += 1;
                eprintln!("failed {}: {}", outcome.name, e.user_message());
            }
        }
    }

    if failures > 0 {
        return Err(docshelf_common::AppError::Internal(format!(
            "{failures} of {} uploads failed",
            outcomes.len()
        )));
    }
    Ok(())
}

async fn read_upload(path: &Path) -> AppResult<FileUpload> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            docshelf_common::AppError::Validation(format!("not a file path: {}", path.display()))
        })?;
    let data = tokio::fs::read(path).await?;
    let content_type = guess_mime(&name).map(ToString::to_string);

    Ok(FileUpload {
        name,
        content_type,
        data,
    })
}

/// Guess a MIME type from the file extension; `None` lets the server decide.
fn guess_mime(name: &str) -> Option<&'static str> {
    let extension = name.rsplit('.').next()?.to_ascii_lowercase();
    match extension.as_str() {
        "txt" | "log" => Some("text/plain"),
        "md" => Some("text/markdown"),
        "csv" => Some("text/csv"),
        "html" | "htm" => Some("text/html"),
        "json" => Some("application/json"),
        "xml" => Some("application/xml"),
        "yaml" | "yml" => Some("application/x-yaml"),
        "toml" => Some("application/toml"),
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

async fn download(tree: &DocumentTree, id: DocumentId, out: Option<PathBuf>) -> AppResult<()> {
    let bytes = tree.download(id).await?;
    let out = out.unwrap_or_else(|| PathBuf::from(format!("document-{id}")));

    tokio::fs::write(&out, &bytes).await?;
    info!(document_id = id, bytes = bytes.len(), "Download written");
    println!("wrote {} bytes to {}", bytes.len(), out.display());
    Ok(())
}

async fn print_graph(tree: &DocumentTree) -> AppResult<()> {
    let snapshot = tree.graph().await?;
    let result = layout(&relation_nodes(&snapshot));

    if result.nodes.is_empty() {
        println!("no analyzed documents in the graph");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "LABEL", "DEPTH", "X", "Y"]);
    for node in &result.nodes {
        table.add_row(vec![
            node.id.clone(),
            node.label.clone(),
            node.depth.to_string(),
            format!("{:.0}", node.x),
            format!("{:.0}", node.y),
        ]);
    }
    println!("{table}");

    println!("edges:");
    for (from, to) in &result.edges {
        println!("  {from} -> {to}");
    }
    Ok(())
}

async fn search(tree: &DocumentTree, query: &str) -> AppResult<()> {
    let result = tree.search(query).await?;

    println!("{}", result.answer);
    if !result.documents.is_empty() {
        println!();
        println!("sources:");
        for hit in &result.documents {
            println!("  [{}] {}", hit.id, hit.subcontent);
        }
    }
    Ok(())
}
