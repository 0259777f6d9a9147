//! 基础请求验证逻辑
//!
//! Everything here runs before the store is touched.

use taskboard_core::api::{AddCommentInput, BoardError, ReorderEntry};

use super::models::{AddCommentRequest, ReorderItem};

/// Positions travel as signed integers on the wire.
pub fn validate_position(position: i64) -> Result<u32, BoardError> {
    if position < 0 {
        return Err(BoardError::validation(format!(
            "position must be non-negative (got {position})"
        )));
    }
    u32::try_from(position)
        .map_err(|_| BoardError::validation(format!("position out of range (got {position})")))
}

pub fn validate_reorder(items: Vec<ReorderItem>) -> Result<Vec<ReorderEntry>, BoardError> {
    if items.is_empty() {
        return Err(BoardError::validation("tasks array is required"));
    }
    items
        .into_iter()
        .map(|item| {
            let position = validate_position(item.position)?;
            Ok(ReorderEntry::new(item.id, item.state, position))
        })
        .collect()
}

pub fn validate_comment(req: AddCommentRequest) -> Result<AddCommentInput, BoardError> {
    if req.author_id.trim().is_empty() || req.text.trim().is_empty() {
        return Err(BoardError::validation("authorId and text are required"));
    }
    Ok(AddCommentInput {
        author_id: req.author_id,
        text: req.text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_core::api::Column;

    #[test]
    fn test_validate_position() {
        assert_eq!(validate_position(0).unwrap(), 0);
        assert_eq!(validate_position(7).unwrap(), 7);

        match validate_position(-1) {
            Err(BoardError::Validation(msg)) => assert!(msg.contains("non-negative")),
            other => panic!("Expected Validation error, got {other:?}"),
        }
        assert!(validate_position(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_reorder_empty() {
        assert!(matches!(
            validate_reorder(Vec::new()),
            Err(BoardError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_reorder_converts_entries() {
        let entries = validate_reorder(vec![
            ReorderItem {
                id: "a".into(),
                state: Column::Todo,
                position: 1,
            },
            ReorderItem {
                id: "b".into(),
                state: Column::Todo,
                position: 0,
            },
        ])
        .unwrap();
        assert_eq!(
            entries,
            vec![
                ReorderEntry::new("a", Column::Todo, 1),
                ReorderEntry::new("b", Column::Todo, 0),
            ]
        );

        let negative = validate_reorder(vec![ReorderItem {
            id: "a".into(),
            state: Column::Done,
            position: -3,
        }]);
        assert!(negative.is_err());
    }

    #[test]
    fn test_validate_comment_requires_author_and_text() {
        let missing_text = AddCommentRequest {
            author_id: "u1".into(),
            text: "  ".into(),
        };
        assert!(validate_comment(missing_text).is_err());

        let missing_author = AddCommentRequest {
            author_id: String::new(),
            text: "hello".into(),
        };
        assert!(validate_comment(missing_author).is_err());

        let ok = validate_comment(AddCommentRequest {
            author_id: "u1".into(),
            text: "hello".into(),
        })
        .unwrap();
        assert_eq!(ok.author_id, "u1");
    }
}
