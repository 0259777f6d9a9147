//! Client-side board settings: tag filters, column visibility, sorting and theme.

pub mod store;
pub mod types;

pub use store::SettingsStore;
pub use types::{BoardSettings, FilterSettings, SortDirection, SortField, SortSettings, Theme};
