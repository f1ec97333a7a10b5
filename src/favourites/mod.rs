//! Favourites tracking module
//!
//! Favourites are a set of (media kind, id) pairs persisted in SQLite.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::api::{MediaKey, MediaKind};
use crate::error::StoreError;

/// Get the database file path (~/.config/cinedex/favourites.db)
pub fn db_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cinedex")
        .join("favourites.db")
}

/// Set-membership capability over favourite catalog entries
pub trait FavouriteStore {
    fn exists(&self, key: MediaKey) -> Result<bool, StoreError>;

    /// Add an entry; adding twice is a no-op
    fn add(&self, key: MediaKey) -> Result<(), StoreError>;

    /// Remove an entry; removing a missing entry is a no-op
    fn remove(&self, key: MediaKey) -> Result<(), StoreError>;

    /// Flip membership, returning whether the entry is now a favourite
    fn toggle(&self, key: MediaKey) -> Result<bool, StoreError> {
        if self.exists(key)? {
            self.remove(key)?;
            Ok(false)
        } else {
            self.add(key)?;
            Ok(true)
        }
    }
}

/// A favourite record
#[derive(Debug, Clone, PartialEq)]
pub struct Favourite {
    pub key: MediaKey,
    /// Title at the time it was added, if known
    pub title: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// SQLite-backed favourites
pub struct SqliteFavourites {
    conn: Connection,
}

impl SqliteFavourites {
    /// Open or create the favourites database at the default path
    pub fn open() -> Result<Self, StoreError> {
        Self::open_at(&db_path())
    }

    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let store = Self {
            conn: Connection::open(path)?,
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS favourites (
                kind TEXT NOT NULL,
                media_id INTEGER NOT NULL,
                title TEXT,
                added_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (kind, media_id)
            )",
            [],
        )?;
        Ok(())
    }

    /// Add with a display title (kept if the entry already exists)
    pub fn add_titled(&self, key: MediaKey, title: Option<&str>) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO favourites (kind, media_id, title, added_at)
             VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT(kind, media_id) DO UPDATE SET
                 title = COALESCE(excluded.title, favourites.title)",
            params![key.kind.path(), key.id as i64, title],
        )?;
        Ok(())
    }

    /// [`toggle`](FavouriteStore::toggle) that records `title` when adding
    pub fn toggle_titled(&self, key: MediaKey, title: Option<&str>) -> Result<bool, StoreError> {
        if self.exists(key)? {
            self.remove(key)?;
            Ok(false)
        } else {
            self.add_titled(key, title)?;
            Ok(true)
        }
    }

    /// All favourites, most recently added first
    pub fn list(&self) -> Result<Vec<Favourite>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT kind, media_id, title, added_at FROM favourites
             ORDER BY added_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            let kind: String = row.get(0)?;
            let id: i64 = row.get(1)?;
            let title: Option<String> = row.get(2)?;
            let added_at: String = row.get(3)?;
            Ok((kind, id, title, added_at))
        })?;

        let mut favourites = Vec::new();
        for row in rows {
            let (kind, id, title, added_at) = row?;
            let Some(kind) = MediaKind::from_path(&kind) else {
                tracing::warn!("Skipping favourite with unknown kind '{}'", kind);
                continue;
            };
            let added_at = NaiveDateTime::parse_from_str(&added_at, "%Y-%m-%d %H:%M:%S")
                .map(|dt| dt.and_utc())
                .unwrap_or_else(|_| Utc::now());

            favourites.push(Favourite {
                key: MediaKey::new(kind, id as u64),
                title,
                added_at,
            });
        }

        Ok(favourites)
    }
}

impl FavouriteStore for SqliteFavourites {
    fn exists(&self, key: MediaKey) -> Result<bool, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM favourites WHERE kind = ?1 AND media_id = ?2",
            params![key.kind.path(), key.id as i64],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn add(&self, key: MediaKey) -> Result<(), StoreError> {
        self.add_titled(key, None)
    }

    fn remove(&self, key: MediaKey) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM favourites WHERE kind = ?1 AND media_id = ?2",
            params![key.kind.path(), key.id as i64],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let store = SqliteFavourites::open_in_memory().unwrap();
        let key = MediaKey::movie(550);

        assert!(!store.exists(key).unwrap());
        store.add(key).unwrap();
        store.add(key).unwrap();
        assert!(store.exists(key).unwrap());
        assert_eq!(store.list().unwrap().len(), 1);

        store.remove(key).unwrap();
        store.remove(key).unwrap();
        assert!(!store.exists(key).unwrap());
    }

    #[test]
    fn test_kinds_are_separate() {
        let store = SqliteFavourites::open_in_memory().unwrap();
        store.add(MediaKey::movie(42)).unwrap();

        assert!(store.exists(MediaKey::movie(42)).unwrap());
        assert!(!store.exists(MediaKey::series(42)).unwrap());
    }

    #[test]
    fn test_toggle() {
        let store = SqliteFavourites::open_in_memory().unwrap();
        let key = MediaKey::series(1399);

        assert!(store.toggle(key).unwrap());
        assert!(store.exists(key).unwrap());
        assert!(!store.toggle(key).unwrap());
        assert!(!store.exists(key).unwrap());
    }

    #[test]
    fn test_toggle_titled() {
        let store = SqliteFavourites::open_in_memory().unwrap();
        let key = MediaKey::movie(550);

        assert!(store.toggle_titled(key, Some("Fight Club")).unwrap());
        assert_eq!(store.list().unwrap()[0].title.as_deref(), Some("Fight Club"));
        assert!(!store.toggle_titled(key, Some("Fight Club")).unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_toggle_titled_propagates_lookup_failure() {
        let store = SqliteFavourites::open_in_memory().unwrap();
        store.conn.execute("DROP TABLE favourites", []).unwrap();

        let err = store.toggle_titled(MediaKey::movie(1), None).unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }

    #[test]
    fn test_list_keeps_titles() {
        let store = SqliteFavourites::open_in_memory().unwrap();
        store
            .add_titled(MediaKey::movie(1), Some("Fight Club"))
            .unwrap();
        store.add(MediaKey::movie(1)).unwrap();
        store.add(MediaKey::series(2)).unwrap();

        let favourites = store.list().unwrap();
        assert_eq!(favourites.len(), 2);
        let fight_club = favourites
            .iter()
            .find(|f| f.key == MediaKey::movie(1))
            .unwrap();
        assert_eq!(fight_club.title.as_deref(), Some("Fight Club"));
    }

    #[test]
    fn test_open_at_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("favourites.db");

        {
            let store = SqliteFavourites::open_at(&path).unwrap();
            store.add(MediaKey::movie(7)).unwrap();
        }

        let reopened = SqliteFavourites::open_at(&path).unwrap();
        assert!(reopened.exists(MediaKey::movie(7)).unwrap());
    }

    #[test]
    fn test_db_path() {
        assert!(db_path().ends_with("cinedex/favourites.db"));
    }
}
