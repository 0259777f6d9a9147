pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod model;
pub mod reorder;
pub mod settings;
