pub mod projection;
pub mod stats;

pub use projection::{project, visible_columns, ColumnProjection};
pub use stats::{task_stats, TaskStats};
