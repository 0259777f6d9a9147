//! Drop planning, the client task cache and the optimistic reorder controller.

pub mod cache;
pub mod controller;
pub mod plan;
pub mod traits;

pub use cache::{PatchId, TaskCache};
pub use controller::{DropOutcome, PendingDrop, ReorderController};
pub use plan::{column_order, plan_drop, DropTarget, ReorderPlan};
pub use traits::BoardApi;
