use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "td", about = concat!("tudu v", env!("CARGO_PKG_VERSION"), " - today, tomorrow, upcoming"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new list in the current directory
    Init(InitArgs),
    /// Add a task
    Add(AddArgs),
    /// List tasks grouped into today, tomorrow and upcoming
    List(ListArgs),
    /// Show one task
    Show(IdArg),
    /// Search task text by regex
    Search(SearchArgs),
    /// Change a task's text or due date
    Edit(EditArgs),
    /// Flip a task between done and not done
    Toggle(IdArg),
    /// Mark a task done
    Done(IdArg),
    /// Mark a task not done
    Undone(IdArg),
    /// Delete a task
    Rm(IdArg),
    /// Delete all completed tasks
    Clear,
    /// Move a task by group position (reorder or move to another group)
    Mv(MvArgs),
    /// Write all tasks as JSON
    Export(ExportArgs),
    /// Load tasks from a JSON file
    Import(ImportArgs),
    /// Show or change configuration
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// List name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Rewrite the config even if .tudu/ already exists (tasks are kept)
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// Due date: today, tomorrow, upcoming, +N, or YYYY-MM-DD (default: today)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Show all, active, or completed tasks (remembered for next time)
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern (case-insensitive)
    pub pattern: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New text
    #[arg(long)]
    pub text: Option<String>,
    /// New due date: today, tomorrow, upcoming, +N, or YYYY-MM-DD
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct MvArgs {
    /// Group the task is in (today, tomorrow, upcoming)
    pub from_group: String,
    /// Position of the task within that group, as shown by `td list`
    pub from_index: usize,
    /// Group to move the task into
    pub to_group: String,
    /// Position within the destination group (past the end appends)
    pub to_index: usize,
}

#[derive(Args)]
pub struct ExportArgs {
    /// File to write (default: stdout)
    pub path: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// JSON file to read
    pub path: String,
    /// Add new tasks to the existing list instead of replacing it
    #[arg(long)]
    pub merge: bool,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Set how many days ahead a task moved into "upcoming" becomes due
    UpcomingDays(UpcomingDaysArgs),
    /// Set the default listing filter (all, active, completed)
    DefaultFilter(DefaultFilterArgs),
}

#[derive(Args)]
pub struct UpcomingDaysArgs {
    /// Number of days (2 or more)
    pub days: u32,
}

#[derive(Args)]
pub struct DefaultFilterArgs {
    /// all, active, or completed
    pub filter: String,
}
