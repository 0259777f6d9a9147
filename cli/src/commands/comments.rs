use serde_json::json;
use taskboard_core::api::{AddCommentInput, CliError};

use super::cli::{CommentArgs, CommentCommand};
use super::Session;
use crate::render;

pub async fn handle_comment(args: CommentArgs, session: &mut Session) -> Result<(), CliError> {
    match args.command {
        CommentCommand::List { task_id } => {
            let comments = session
                .controller
                .list_comments(&task_id)
                .await
                .map_err(CliError::from_client)?;
            session.emit(&comments, || render::render_comments(&comments))
        }
        CommentCommand::Add {
            task_id,
            author,
            text,
        } => {
            let comment = session
                .controller
                .add_comment(
                    &task_id,
                    AddCommentInput {
                        author_id: author,
                        text,
                    },
                )
                .await
                .map_err(CliError::from_client)?;
            session.emit(&comment, || render::render_comments(std::slice::from_ref(&comment)))
        }
        CommentCommand::Delete {
            task_id,
            comment_id,
        } => {
            session
                .controller
                .delete_comment(&task_id, &comment_id)
                .await
                .map_err(CliError::from_client)?;
            session.emit(&json!({ "success": true }), || {
                format!("deleted comment {comment_id}")
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use taskboard_core::api::{AppConfig, BoardError, Column, CreateTaskInput};
    use taskboard_plugins::client::LocalBoard;
    use taskboard_plugins::store::SqliteStore;

    #[tokio::test]
    async fn test_comment_add_list_delete() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let user = store.insert_user("Alice Chen", "a.svg").unwrap();
        let task = store
            .create_task(CreateTaskInput {
                title: "A".into(),
                column: Some(Column::Todo),
                ..Default::default()
            })
            .unwrap();
        let store = Arc::new(Mutex::new(store));
        let mut session =
            Session::with_api(AppConfig::default(), Arc::new(LocalBoard::new(store.clone())), true);

        handle_comment(
            CommentArgs {
                command: CommentCommand::Add {
                    task_id: task.id.clone(),
                    author: user.id.clone(),
                    text: "looks good".into(),
                },
            },
            &mut session,
        )
        .await
        .unwrap();

        let comments = store.lock().unwrap().list_comments(&task.id).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author.name, "Alice Chen");

        handle_comment(
            CommentArgs {
                command: CommentCommand::Delete {
                    task_id: task.id.clone(),
                    comment_id: comments[0].id.clone(),
                },
            },
            &mut session,
        )
        .await
        .unwrap();
        assert!(store.lock().unwrap().list_comments(&task.id).unwrap().is_empty());

        let err = handle_comment(
            CommentArgs {
                command: CommentCommand::Add {
                    task_id: task.id.clone(),
                    author: "nobody".into(),
                    text: "hi".into(),
                },
            },
            &mut session,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::Board(BoardError::NotFound { .. })));
    }
}
