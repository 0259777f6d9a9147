pub mod column;
pub mod task;

#[cfg(test)]
pub(crate) mod fixtures;

pub use column::Column;
pub use task::{
    AddCommentInput, Comment, CreateTaskInput, MoveTaskInput, Placement, ReorderEntry, Tag, Task,
    UpdateTaskInput, User,
};
