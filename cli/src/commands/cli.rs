use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use taskboard_core::api::{Column, SortDirection, SortField, Tag, Theme};

#[derive(Parser, Debug)]
#[command(name = "taskboard", version, about = "Kanban task board server and client")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file. Defaults to ~/.taskboard/config.toml, then ./config.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Work on the database file directly instead of going through the server.
    #[arg(long, global = true)]
    pub local: bool,

    /// Board server URL (overrides client.base_url).
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the board HTTP server.
    Serve(ServeArgs),
    /// Every task in column and position order, unfiltered.
    List,
    /// Show the board using the saved filters and sorting.
    Board(BoardArgs),
    /// Totals per column and completion percentage.
    Stats,
    /// Show one task with its comments.
    Show(TaskIdArgs),
    Create(CreateArgs),
    /// Edit title, description, tags or assignees.
    Update(UpdateArgs),
    /// Move a task to a column and index on the server.
    Move(MoveArgs),
    /// Drag-and-drop a task: optimistic reorder with rollback.
    Drop(DropArgs),
    Delete(TaskIdArgs),
    Comment(CommentArgs),
    Users,
    Settings(SettingsArgs),
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Do not seed the demo board into an empty store.
    #[arg(long)]
    pub no_seed: bool,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct BoardArgs {
    /// Ignore saved tag filters and hidden columns.
    #[arg(long)]
    pub all: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TaskIdArgs {
    pub id: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CreateArgs {
    pub title: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Target column (appended at the end). Defaults to Backlog.
    #[arg(long)]
    pub column: Option<Column>,

    /// Repeatable: --tag api --tag db
    #[arg(long = "tag", action = clap::ArgAction::Append)]
    pub tags: Vec<Tag>,

    /// Repeatable user id.
    #[arg(long = "assignee", action = clap::ArgAction::Append)]
    pub assignees: Vec<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct UpdateArgs {
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Replaces the tag set when given.
    #[arg(long = "tag", action = clap::ArgAction::Append)]
    pub tags: Option<Vec<Tag>>,

    /// Replaces the assignee set when given.
    #[arg(long = "assignee", action = clap::ArgAction::Append)]
    pub assignees: Option<Vec<String>>,

    /// Remove every assignee.
    #[arg(long, conflicts_with = "assignees")]
    pub clear_assignees: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct MoveArgs {
    pub id: String,
    pub column: Column,
    /// Zero-based index in the target column; clamped to the column size.
    pub position: u32,
}

#[derive(ClapArgs, Debug, Clone)]
#[command(group(clap::ArgGroup::new("target").required(true).args(["onto", "column"])))]
pub struct DropArgs {
    pub id: String,

    /// Drop on top of this task (takes its column and index).
    #[arg(long)]
    pub onto: Option<String>,

    /// Drop on an empty area of this column (append).
    #[arg(long)]
    pub column: Option<Column>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CommentArgs {
    #[command(subcommand)]
    pub command: CommentCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CommentCommand {
    List {
        task_id: String,
    },
    Add {
        task_id: String,
        /// Author user id.
        #[arg(long)]
        author: String,
        text: String,
    },
    Delete {
        task_id: String,
        comment_id: String,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: Option<SettingsCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// Print the current settings (default).
    Show,
    ToggleTag { tag: Tag },
    Collapse { column: Column },
    Expand { column: Column },
    ToggleColumn { column: Column },
    Hide { column: Column },
    Unhide { column: Column },
    /// Drop tag filters and show every column.
    ClearFilters,
    Sort {
        #[arg(value_enum)]
        field: SortFieldArg,
        #[arg(value_enum)]
        direction: Option<SortDirectionArg>,
    },
    ToggleDirection,
    Theme {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortFieldArg {
    Manual,
    Title,
    CreatedAt,
    Assignees,
}

impl From<SortFieldArg> for SortField {
    fn from(arg: SortFieldArg) -> Self {
        match arg {
            SortFieldArg::Manual => Self::Manual,
            SortFieldArg::Title => Self::Title,
            SortFieldArg::CreatedAt => Self::CreatedAt,
            SortFieldArg::Assignees => Self::AssigneeCount,
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirectionArg {
    Asc,
    Desc,
}

impl From<SortDirectionArg> for SortDirection {
    fn from(arg: SortDirectionArg) -> Self {
        match arg {
            SortDirectionArg::Asc => Self::Asc,
            SortDirectionArg::Desc => Self::Desc,
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Light,
    Dark,
    System,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Self::Light,
            ThemeArg::Dark => Self::Dark,
            ThemeArg::System => Self::System,
        }
    }
}
