//! SQLite-backed artwork repository.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{
    assemble_pool, lower_pool_size, Artwork, ArtworkQueries, ArtworkRepository, DuelRecord,
    NewArtwork, RepositoryError, DEFAULT_RATING,
};

const ARTWORK_COLUMNS: &str = "id, title, artist, panel, filename, thumbnail, rating, duel_count";

/// SQLite-backed artwork repository.
pub struct SqliteArtworkStore {
    conn: Mutex<Connection>,
    default_rating: i32,
}

impl SqliteArtworkStore {
    /// Create a new store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, RepositoryError> {
        let conn = Connection::open(path).map_err(db_error)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            default_rating: DEFAULT_RATING,
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory().map_err(db_error)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            default_rating: DEFAULT_RATING,
        })
    }

    /// Rating given to inserted artworks that don't carry their own.
    pub fn with_default_rating(mut self, rating: i32) -> Self {
        self.default_rating = rating;
        self
    }

    fn initialize_schema(conn: &Connection) -> Result<(), RepositoryError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS artworks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                artist TEXT NOT NULL,
                panel TEXT NOT NULL,
                filename TEXT NOT NULL UNIQUE,
                thumbnail TEXT,
                rating INTEGER NOT NULL,
                duel_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_artworks_rating ON artworks(rating);
            CREATE INDEX IF NOT EXISTS idx_artworks_duel_count ON artworks(duel_count);

            CREATE TABLE IF NOT EXISTS duels (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                duelist_one INTEGER NOT NULL,
                duelist_two INTEGER NOT NULL,
                winner INTEGER NOT NULL,
                decided_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(db_error)?;

        Ok(())
    }

    fn queries<'c>(&self, conn: &'c Connection) -> SqliteQueries<'c> {
        SqliteQueries {
            conn,
            default_rating: self.default_rating,
        }
    }
}

/// Query implementation over a borrowed connection, shared by plain calls and
/// transactions.
struct SqliteQueries<'c> {
    conn: &'c Connection,
    default_rating: i32,
}

fn db_error(e: rusqlite::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn sql_limit(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

fn row_to_artwork(row: &rusqlite::Row) -> rusqlite::Result<Artwork> {
    Ok(Artwork {
        id: row.get(0)?,
        title: row.get(1)?,
        artist: row.get(2)?,
        panel: row.get(3)?,
        filename: row.get(4)?,
        thumbnail: row.get(5)?,
        rating: row.get(6)?,
        duel_count: row.get(7)?,
    })
}

impl SqliteQueries<'_> {
    fn list(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Artwork>, RepositoryError> {
        let mut stmt = self.conn.prepare(sql).map_err(db_error)?;
        let rows = stmt.query_map(params, row_to_artwork).map_err(db_error)?;

        let mut artworks = Vec::new();
        for row_result in rows {
            artworks.push(row_result.map_err(db_error)?);
        }
        Ok(artworks)
    }
}

impl ArtworkQueries for SqliteQueries<'_> {
    fn artwork(&self, id: i64) -> Result<Artwork, RepositoryError> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM artworks WHERE id = ?", ARTWORK_COLUMNS),
                params![id],
                row_to_artwork,
            )
            .optional()
            .map_err(db_error)?
            .ok_or_else(|| RepositoryError::NotFound(format!("artwork {}", id)))
    }

    fn artwork_by_filename(&self, filename: &str) -> Result<Option<Artwork>, RepositoryError> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM artworks WHERE filename = ?", ARTWORK_COLUMNS),
                params![filename],
                row_to_artwork,
            )
            .optional()
            .map_err(db_error)
    }

    fn artwork_with_lowest_duel_count(&self) -> Result<Artwork, RepositoryError> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM artworks ORDER BY duel_count ASC, id ASC LIMIT 1",
                    ARTWORK_COLUMNS
                ),
                [],
                row_to_artwork,
            )
            .optional()
            .map_err(db_error)?
            .ok_or_else(|| RepositoryError::NotFound("no artworks in the show".to_string()))
    }

    fn artworks_with_similar_rating(
        &self,
        benchmark: &Artwork,
        count: usize,
    ) -> Result<Vec<Artwork>, RepositoryError> {
        let higher = self.list(
            &format!(
                "SELECT {} FROM artworks WHERE rating > ? AND id != ? ORDER BY rating ASC, id ASC LIMIT ?",
                ARTWORK_COLUMNS
            ),
            &[&benchmark.rating, &benchmark.id, &sql_limit(count)],
        )?;

        let remaining = lower_pool_size(higher.len(), count);
        let lower = self.list(
            &format!(
                "SELECT {} FROM artworks WHERE rating <= ? AND id != ? ORDER BY rating DESC, id ASC LIMIT ?",
                ARTWORK_COLUMNS
            ),
            &[&benchmark.rating, &benchmark.id, &sql_limit(remaining)],
        )?;

        Ok(assemble_pool(lower, higher, count))
    }

    fn rank(&self, artwork: &Artwork) -> Result<i64, RepositoryError> {
        let higher: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM artworks WHERE rating > ?",
                params![artwork.rating],
                |row| row.get(0),
            )
            .map_err(db_error)?;
        Ok(higher + 1)
    }

    fn update_artwork(&self, artwork: &Artwork) -> Result<(), RepositoryError> {
        let changed = self
            .conn
            .execute(
                "UPDATE artworks SET title = ?, artist = ?, panel = ?, filename = ?, thumbnail = ?, rating = ?, duel_count = ?, updated_at = ? WHERE id = ?",
                params![
                    artwork.title,
                    artwork.artist,
                    artwork.panel,
                    artwork.filename,
                    artwork.thumbnail,
                    artwork.rating,
                    artwork.duel_count,
                    Utc::now().to_rfc3339(),
                    artwork.id,
                ],
            )
            .map_err(db_error)?;

        if changed == 0 {
            return Err(RepositoryError::NotFound(format!("artwork {}", artwork.id)));
        }
        Ok(())
    }

    fn append_duel(&self, duel: &DuelRecord) -> Result<i64, RepositoryError> {
        self.conn
            .execute(
                "INSERT INTO duels (duelist_one, duelist_two, winner, decided_at) VALUES (?, ?, ?, ?)",
                params![
                    duel.duelist_one,
                    duel.duelist_two,
                    duel.winner,
                    duel.decided_at.to_rfc3339(),
                ],
            )
            .map_err(db_error)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<Artwork>, RepositoryError> {
        self.list(
            &format!(
                "SELECT {} FROM artworks ORDER BY rating DESC, id ASC LIMIT ?",
                ARTWORK_COLUMNS
            ),
            &[&sql_limit(limit)],
        )
    }

    fn total_duel_count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM duels", [], |row| row.get(0))
            .map_err(db_error)?;
        Ok(count.max(0) as u64)
    }

    fn insert_artwork(&self, artwork: NewArtwork) -> Result<Artwork, RepositoryError> {
        let rating = artwork.rating.unwrap_or(self.default_rating);
        let now = Utc::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO artworks (title, artist, panel, filename, thumbnail, rating, duel_count, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)",
                params![
                    artwork.title,
                    artwork.artist,
                    artwork.panel,
                    artwork.filename,
                    artwork.thumbnail,
                    rating,
                    now,
                    now,
                ],
            )
            .map_err(db_error)?;

        Ok(Artwork {
            id: self.conn.last_insert_rowid(),
            title: artwork.title,
            artist: artwork.artist,
            panel: artwork.panel,
            filename: artwork.filename,
            thumbnail: artwork.thumbnail,
            rating,
            duel_count: 0,
        })
    }
}

impl ArtworkQueries for SqliteArtworkStore {
    fn artwork(&self, id: i64) -> Result<Artwork, RepositoryError> {
        let conn = self.conn.lock().unwrap();
        self.queries(&conn).artwork(id)
    }

    fn artwork_by_filename(&self, filename: &str) -> Result<Option<Artwork>, RepositoryError> {
        let conn = self.conn.lock().unwrap();
        self.queries(&conn).artwork_by_filename(filename)
    }

    fn artwork_with_lowest_duel_count(&self) -> Result<Artwork, RepositoryError> {
        let conn = self.conn.lock().unwrap();
        self.queries(&conn).artwork_with_lowest_duel_count()
    }

    fn artworks_with_similar_rating(
        &self,
        benchmark: &Artwork,
        count: usize,
    ) -> Result<Vec<Artwork>, RepositoryError> {
        let conn = self.conn.lock().unwrap();
        self.queries(&conn)
            .artworks_with_similar_rating(benchmark, count)
    }

    fn rank(&self, artwork: &Artwork) -> Result<i64, RepositoryError> {
        let conn = self.conn.lock().unwrap();
        self.queries(&conn).rank(artwork)
    }

    fn update_artwork(&self, artwork: &Artwork) -> Result<(), RepositoryError> {
        let conn = self.conn.lock().unwrap();
        self.queries(&conn).update_artwork(artwork)
    }

    fn append_duel(&self, duel: &DuelRecord) -> Result<i64, RepositoryError> {
        let conn = self.conn.lock().unwrap();
        self.queries(&conn).append_duel(duel)
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<Artwork>, RepositoryError> {
        let conn = self.conn.lock().unwrap();
        self.queries(&conn).leaderboard(limit)
    }

    fn total_duel_count(&self) -> Result<u64, RepositoryError> {
        let conn = self.conn.lock().unwrap();
        self.queries(&conn).total_duel_count()
    }

    fn insert_artwork(&self, artwork: NewArtwork) -> Result<Artwork, RepositoryError> {
        let conn = self.conn.lock().unwrap();
        self.queries(&conn).insert_artwork(artwork)
    }
}

impl ArtworkRepository for SqliteArtworkStore {
    fn run_transaction(
        &self,
        work: &mut dyn FnMut(&dyn ArtworkQueries) -> Result<(), RepositoryError>,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().map_err(db_error)?;

        // Dropping `tx` on the error path rolls everything back.
        work(&SqliteQueries {
            conn: &tx,
            default_rating: self.default_rating,
        })?;

        tx.commit().map_err(db_error)
    }
}
