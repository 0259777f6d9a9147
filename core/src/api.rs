//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `taskboard_core::api` instead of reaching into internal modules.

pub use crate::board::{project, task_stats, visible_columns, ColumnProjection, TaskStats};
pub use crate::config::{
    get_taskboard_data_dir, load_default, AppConfig, ClientConfig, LoggingConfig, ServerConfig,
    StoreConfig,
};
pub use crate::error::{BoardError, CliError, EntityKind, ErrorCode};
pub use crate::model::{
    AddCommentInput, Column, Comment, CreateTaskInput, MoveTaskInput, Placement, ReorderEntry,
    Tag, Task, UpdateTaskInput, User,
};
pub use crate::reorder::{
    column_order, plan_drop, BoardApi, DropOutcome, DropTarget, PatchId, PendingDrop,
    ReorderController, ReorderPlan, TaskCache,
};
pub use crate::settings::{
    BoardSettings, FilterSettings, SettingsStore, SortDirection, SortField, SortSettings, Theme,
};
