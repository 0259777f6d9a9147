//! Store builders and invariant checks for unit tests.

use taskboard_core::model::{Column, CreateTaskInput};

use super::SqliteStore;

/// In-memory store holding one task per `(title, column)`, created in order.
pub fn store_with(tasks: &[(&str, Column)]) -> (SqliteStore, Vec<String>) {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let ids = tasks
        .iter()
        .map(|(title, column)| {
            store
                .create_task(CreateTaskInput {
                    title: title.to_string(),
                    column: Some(*column),
                    ..Default::default()
                })
                .unwrap()
                .id
        })
        .collect();
    (store, ids)
}

/// Every column holds exactly the positions 0..n-1.
pub fn assert_dense(store: &SqliteStore) {
    for column in Column::ALL {
        let positions: Vec<u32> = store
            .column_positions(column)
            .unwrap()
            .into_iter()
            .map(|(_, p)| p)
            .collect();
        let expected: Vec<u32> = (0..positions.len() as u32).collect();
        assert_eq!(positions, expected, "column {column} is not dense");
    }
}
