use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lode", about = concat!("lodestone v", env!("CARGO_PKG_VERSION"), " - folders, tags and a magnetic sidebar"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List folders
    Folders,
    /// Add, remove or rename a folder
    Folder(FolderCmd),
    /// List todos
    List(ListArgs),
    /// Add a todo
    Add(AddArgs),
    /// Toggle a todo's completion
    Toggle(IdArgs),
    /// Change a todo's text
    Edit(EditArgs),
    /// Add or remove a tag
    Tag(TagArgs),
    /// Move a todo to another folder
    Mv(MvArgs),
    /// Delete a todo
    Rm(IdArgs),
    /// Quick find across folders, todos and tags
    Find(FindArgs),
    /// Read or change config.toml
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Folder args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct FolderCmd {
    #[command(subcommand)]
    pub action: FolderAction,
}

#[derive(Subcommand)]
pub enum FolderAction {
    /// Create a folder
    Add {
        /// Display name
        name: String,
        /// Icon name (e.g. HomeIcon)
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a folder and every todo in it
    Rm {
        /// Folder id or name
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Rename a folder
    Rename {
        /// Folder id or name
        id: String,
        /// New display name
        name: String,
    },
}

// ---------------------------------------------------------------------------
// Todo args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Folder id or name (default: every folder)
    #[arg(long)]
    pub folder: Option<String>,
    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,
    /// Only completed todos
    #[arg(long, conflicts_with = "open")]
    pub done: bool,
    /// Only open todos
    #[arg(long)]
    pub open: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Todo text
    pub text: String,
    /// Folder id or name (default: inbox)
    #[arg(long)]
    pub folder: Option<String>,
    /// Tag(s) for the new todo
    #[arg(long)]
    pub tag: Vec<String>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Todo id
    pub id: u64,
}

#[derive(Args)]
pub struct EditArgs {
    /// Todo id
    pub id: u64,
    /// New text
    pub text: String,
}

#[derive(Args)]
pub struct TagArgs {
    /// Todo id
    pub id: u64,
    /// Action: "add" or "rm"
    pub action: String,
    /// Tag name
    pub tag: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Todo id
    pub id: u64,
    /// Destination folder id or name
    pub folder: String,
}

#[derive(Args)]
pub struct FindArgs {
    /// Search term (case-insensitive)
    pub term: String,
}

// ---------------------------------------------------------------------------
// Config args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a value, e.g. `magnet.folder.radius`
    Get { key: String },
    /// Set a value, preserving the rest of the file
    Set { key: String, value: String },
}
