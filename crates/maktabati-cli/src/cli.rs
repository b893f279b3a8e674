use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "maktabati",
    about = "Maktabati: an offline library of categorized documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Library directory
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Admin password for editor and inbox commands
    #[arg(long, global = true)]
    pub password: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new library in --root
    Init(InitArgs),
    /// Print the category tree
    Tree,
    /// Show one category or item
    Show(ShowArgs),
    /// Search item names and contents
    Search(SearchArgs),
    /// Add a category
    AddCategory(AddCategoryArgs),
    /// Add an item under a category or item
    AddItem(AddItemArgs),
    /// Change a node's name, icon or content
    Edit(EditArgs),
    /// Delete a node, its descendants and their files
    Delete(DeleteArgs),
    /// Attach a file to an item
    Attach(AttachArgs),
    /// Remove an attachment from an item
    Detach(DetachArgs),
    /// Write a stored file to disk
    GetFile(GetFileArgs),
    /// Leave a message (and files) in the inbox
    Submit(SubmitArgs),
    /// Read and manage visitor messages
    Inbox(InboxArgs),
    /// Set, clear or check the admin password
    Password(PasswordArgs),
    /// Write a full backup
    Export(ExportArgs),
    /// Replace the library with a full backup
    Import(ImportArgs),
    /// Write the metadata document only
    ExportMeta(ExportArgs),
    /// Replace the metadata document only
    ImportMeta(ImportArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Storage key prefix
    #[arg(long)]
    pub app_name: Option<String>,
    /// Data directory, relative to --root
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Args)]
pub struct SearchArgs {
    pub term: String,
}

#[derive(Args)]
pub struct AddCategoryArgs {
    pub name: String,
    #[arg(long, default_value = "")]
    pub icon: String,
}

#[derive(Args)]
pub struct AddItemArgs {
    pub parent: String,
    pub name: String,
    #[command(flatten)]
    pub content: ContentArgs,
}

#[derive(Args)]
pub struct ContentArgs {
    /// HTML content
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,
    /// Read HTML content from a file
    #[arg(long)]
    pub content_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub icon: Option<String>,
    #[command(flatten)]
    pub content: ContentArgs,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: String,
}

#[derive(Args)]
pub struct AttachArgs {
    pub item: String,
    pub paths: Vec<PathBuf>,
    /// MIME type; guessed from the extension if omitted
    #[arg(long = "type")]
    pub mime: Option<String>,
}

#[derive(Args)]
pub struct DetachArgs {
    pub item: String,
    pub file: String,
}

#[derive(Args)]
pub struct GetFileArgs {
    pub id: String,
    /// Output path; defaults to the stored file name
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct SubmitArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(short, long, default_value = "")]
    pub message: String,
    #[arg(long = "file")]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct InboxArgs {
    #[command(subcommand)]
    pub action: InboxAction,
}

#[derive(Subcommand)]
pub enum InboxAction {
    /// List messages, newest first
    List,
    /// Delete one message and its files
    Delete { key: String },
    /// Delete every message and its files
    Clear,
}

#[derive(Args)]
pub struct PasswordArgs {
    #[command(subcommand)]
    pub action: PasswordAction,
}

#[derive(Subcommand)]
pub enum PasswordAction {
    /// Set a new admin password
    Set { new_password: String },
    /// Remove the password (open access)
    Clear,
    /// Check a password without changing anything
    Check { candidate: String },
}

#[derive(Args)]
pub struct ExportArgs {
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    pub input: PathBuf,
}
