use rusqlite::params;
use taskboard_core::model::User;

use super::rows::user_row;
use super::{new_id, SqliteStore, StoreError};

impl SqliteStore {
    pub fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, avatar_url FROM users ORDER BY name ASC, id ASC")?;
        let users = stmt.query_map([], user_row)?.collect::<Result<_, _>>()?;
        Ok(users)
    }

    pub fn insert_user(&mut self, name: &str, avatar_url: &str) -> Result<User, StoreError> {
        let user = User {
            id: new_id(),
            name: name.to_string(),
            avatar_url: avatar_url.to_string(),
        };
        self.conn.execute(
            "INSERT INTO users (id, name, avatar_url) VALUES (?1, ?2, ?3)",
            params![user.id, user.name, user.avatar_url],
        )?;
        Ok(user)
    }

    pub fn count_users(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_users_are_listed_by_name() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert_user("Frank Liu", "f.svg").unwrap();
        let alice = store.insert_user("Alice Chen", "a.svg").unwrap();
        let users = store.list_users().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0], alice);
        assert_eq!(store.count_users().unwrap(), 2);
    }
}
