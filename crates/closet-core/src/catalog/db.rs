use chrono::Utc;
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::error::{CatalogError, CatalogResult};
use super::models::{Item, NewItem, NewOutfit, Outfit, OutfitItem};

/// Durable record of items, outfits, and their membership relation.
///
/// Wraps a single SQLite connection, opened once and passed by handle to
/// the orchestrator and compositor. Every mutation runs in a transaction,
/// so id allocation and insert are atomic and readers never observe a
/// half-written row.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open (or create) the catalog database at `path`
    pub fn open(path: &Path) -> CatalogResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CatalogError::Initialization(format!(
                    "cannot create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let conn = Connection::open(path)?;
        let catalog = Self::from_connection(conn)?;
        info!("Catalog database initialized at {}", path.display());
        Ok(catalog)
    }

    /// Open an in-memory catalog, used by tests
    pub fn open_in_memory() -> CatalogResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> CatalogResult<Self> {
        // Cascades on the join tables depend on this
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let mut catalog = Self { conn };
        catalog.init_schema()?;
        Ok(catalog)
    }

    /// Create tables and indexes if they don't exist
    fn init_schema(&mut self) -> CatalogResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS images (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL UNIQUE,
                file_path TEXT NOT NULL,
                description TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS image_categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                image_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                FOREIGN KEY (image_id) REFERENCES images (id) ON DELETE CASCADE,
                FOREIGN KEY (category_id) REFERENCES categories (id) ON DELETE CASCADE,
                UNIQUE(image_id, category_id)
            );

            CREATE TABLE IF NOT EXISTS image_tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                image_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                FOREIGN KEY (image_id) REFERENCES images (id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags (id) ON DELETE CASCADE,
                UNIQUE(image_id, tag_id)
            );

            CREATE TABLE IF NOT EXISTS outfits (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL UNIQUE,
                file_path TEXT NOT NULL,
                description TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS outfit_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                outfit_id INTEGER NOT NULL,
                image_id INTEGER NOT NULL,
                FOREIGN KEY (outfit_id) REFERENCES outfits (id) ON DELETE CASCADE,
                FOREIGN KEY (image_id) REFERENCES images (id) ON DELETE CASCADE,
                UNIQUE(outfit_id, image_id)
            );

            CREATE INDEX IF NOT EXISTS idx_images_filename ON images(filename);
            CREATE INDEX IF NOT EXISTS idx_categories_name ON categories(name);
            CREATE INDEX IF NOT EXISTS idx_tags_name ON tags(name);
            CREATE INDEX IF NOT EXISTS idx_image_categories_image_id
                ON image_categories(image_id);
            CREATE INDEX IF NOT EXISTS idx_image_tags_image_id
                ON image_tags(image_id);
            CREATE INDEX IF NOT EXISTS idx_outfits_filename ON outfits(filename);
            CREATE INDEX IF NOT EXISTS idx_outfit_items_outfit_id
                ON outfit_items(outfit_id);",
        )?;
        Ok(())
    }

    // -- Items --

    /// Insert a new item together with its category and tag links.
    ///
    /// The row insert and all link inserts are one transaction.
    pub fn create_item(&mut self, item: &NewItem) -> CatalogResult<Item> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        let inserted = tx.execute(
            "INSERT INTO images (filename, file_path, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![
                item.filename,
                item.file_path.to_string_lossy(),
                item.description,
                now
            ],
        );
        if let Err(e) = inserted {
            return Err(map_unique_violation(e, &item.filename));
        }
        let id = tx.last_insert_rowid();

        for category in &item.categories {
            let category_id = ensure_named_row(&tx, "categories", category, &now)?;
            tx.execute(
                "INSERT OR IGNORE INTO image_categories (image_id, category_id)
                 VALUES (?1, ?2)",
                params![id, category_id],
            )?;
        }
        for tag in &item.tags {
            let tag_id = ensure_named_row(&tx, "tags", tag, &now)?;
            tx.execute(
                "INSERT OR IGNORE INTO image_tags (image_id, tag_id) VALUES (?1, ?2)",
                params![id, tag_id],
            )?;
        }

        tx.commit()?;
        info!("Catalogued item {} ({})", id, item.filename);
        self.get_item(id)
    }

    /// Get a single item by id
    pub fn get_item(&self, id: i64) -> CatalogResult<Item> {
        let row = self
            .conn
            .query_row(
                "SELECT id, filename, file_path, description, created_at, updated_at
                 FROM images WHERE id = ?1",
                params![id],
                map_item_row,
            )
            .optional()?;

        match row {
            Some(mut item) => {
                self.attach_labels(&mut item)?;
                Ok(item)
            }
            None => Err(CatalogError::MissingItems(vec![id])),
        }
    }

    /// All items in creation order
    pub fn get_items(&self) -> CatalogResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, filename, file_path, description, created_at, updated_at
             FROM images ORDER BY id",
        )?;
        let rows = stmt.query_map([], map_item_row)?;

        let mut items = Vec::new();
        for row in rows {
            let mut item = row?;
            self.attach_labels(&mut item)?;
            items.push(item);
        }
        Ok(items)
    }

    /// Resolve items by id, preserving input order.
    ///
    /// If any id is absent the whole lookup fails with `MissingItems`
    /// naming every absent id.
    pub fn get_items_by_ids(&self, ids: &[i64]) -> CatalogResult<Vec<Item>> {
        let mut items = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        let mut seen_missing = HashSet::new();

        for &id in ids {
            match self.get_item(id) {
                Ok(item) => items.push(item),
                Err(CatalogError::MissingItems(_)) => {
                    if seen_missing.insert(id) {
                        missing.push(id);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        if missing.is_empty() {
            Ok(items)
        } else {
            Err(CatalogError::MissingItems(missing))
        }
    }

    /// Whether an item with this filename is already catalogued
    pub fn item_filename_exists(&self, filename: &str) -> CatalogResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM images WHERE filename = ?1",
            params![filename],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Number of catalogued items
    pub fn item_count(&self) -> CatalogResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Replace an item's description, touching `updated_at`
    pub fn update_item_description(
        &mut self,
        id: i64,
        description: Option<&str>,
    ) -> CatalogResult<Item> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE images SET description = ?1, updated_at = ?2 WHERE id = ?3",
            params![description, now, id],
        )?;
        if updated == 0 {
            return Err(CatalogError::MissingItems(vec![id]));
        }
        self.get_item(id)
    }

    /// All category names in use, sorted
    pub fn get_categories(&self) -> CatalogResult<Vec<String>> {
        self.names_from("SELECT name FROM categories ORDER BY name")
    }

    /// All tag names in use, sorted
    pub fn get_tags(&self) -> CatalogResult<Vec<String>> {
        self.names_from("SELECT name FROM tags ORDER BY name")
    }

    /// Items carrying the given category, newest first
    pub fn get_items_by_category(&self, category: &str) -> CatalogResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT i.id, i.filename, i.file_path, i.description,
                    i.created_at, i.updated_at
             FROM images i
             JOIN image_categories ic ON ic.image_id = i.id
             JOIN categories c ON c.id = ic.category_id
             WHERE c.name = ?1
             ORDER BY i.created_at DESC, i.id DESC",
        )?;
        let rows = stmt.query_map(params![category], map_item_row)?;

        let mut items = Vec::new();
        for row in rows {
            let mut item = row?;
            self.attach_labels(&mut item)?;
            items.push(item);
        }
        Ok(items)
    }

    /// Remove an item, blocked while any outfit references it.
    ///
    /// Returns whether a row was deleted. Category and tag links go with
    /// the row via cascade; the image files are not touched.
    pub fn remove_item(&mut self, id: i64) -> CatalogResult<bool> {
        let tx = self.conn.transaction()?;

        let referenced: i64 = tx.query_row(
            "SELECT COUNT(*) FROM outfit_items WHERE image_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        if referenced > 0 {
            return Err(CatalogError::ItemReferenced(id));
        }

        let deleted = tx.execute("DELETE FROM images WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    // -- Outfits --

    /// Insert a new outfit and its membership rows in one transaction.
    ///
    /// Fails with `EmptyOutfit` on an empty member set and `MissingItems`
    /// if any member id is absent; in both cases nothing is written.
    pub fn create_outfit(
        &mut self,
        outfit: &NewOutfit,
        member_ids: &[i64],
    ) -> CatalogResult<Outfit> {
        if member_ids.is_empty() {
            return Err(CatalogError::EmptyOutfit);
        }

        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        // Referential integrity is checked inside the same transaction
        // that inserts the membership rows
        let mut missing = Vec::new();
        let mut seen = HashSet::new();
        for &id in member_ids {
            let exists: i64 = tx.query_row(
                "SELECT COUNT(*) FROM images WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )?;
            if exists == 0 && seen.insert(id) {
                missing.push(id);
            }
        }
        if !missing.is_empty() {
            return Err(CatalogError::MissingItems(missing));
        }

        let inserted = tx.execute(
            "INSERT INTO outfits (filename, file_path, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![
                outfit.filename,
                outfit.file_path.to_string_lossy(),
                outfit.description,
                now
            ],
        );
        if let Err(e) = inserted {
            return Err(map_unique_violation(e, &outfit.filename));
        }
        let id = tx.last_insert_rowid();

        let mut linked = HashSet::new();
        for &item_id in member_ids {
            // A repeated id contributes one membership row
            if linked.insert(item_id) {
                tx.execute(
                    "INSERT INTO outfit_items (outfit_id, image_id) VALUES (?1, ?2)",
                    params![id, item_id],
                )?;
            }
        }

        tx.commit()?;
        info!(
            "Catalogued outfit {} ({}) with {} members",
            id,
            outfit.filename,
            linked.len()
        );
        self.get_outfit(id)
    }

    /// Get a single outfit with resolved member display data
    pub fn get_outfit(&self, id: i64) -> CatalogResult<Outfit> {
        let row = self
            .conn
            .query_row(
                "SELECT id, filename, file_path, description, created_at, updated_at
                 FROM outfits WHERE id = ?1",
                params![id],
                map_outfit_row,
            )
            .optional()?;

        match row {
            Some(mut outfit) => {
                outfit.items = self.outfit_members(outfit.id)?;
                Ok(outfit)
            }
            None => Err(CatalogError::MissingItems(vec![id])),
        }
    }

    /// All outfits in creation order, members resolved
    pub fn get_outfits(&self) -> CatalogResult<Vec<Outfit>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, filename, file_path, description, created_at, updated_at
             FROM outfits ORDER BY id",
        )?;
        let rows = stmt.query_map([], map_outfit_row)?;

        let mut outfits = Vec::new();
        for row in rows {
            let mut outfit = row?;
            outfit.items = self.outfit_members(outfit.id)?;
            outfits.push(outfit);
        }
        Ok(outfits)
    }

    /// Replace an outfit's description, touching `updated_at`
    pub fn update_outfit_description(
        &mut self,
        id: i64,
        description: Option<&str>,
    ) -> CatalogResult<Outfit> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE outfits SET description = ?1, updated_at = ?2 WHERE id = ?3",
            params![description, now, id],
        )?;
        if updated == 0 {
            return Err(CatalogError::MissingItems(vec![id]));
        }
        self.get_outfit(id)
    }

    /// Add a membership row, both sides checked first.
    ///
    /// Returns whether a row was inserted; an item that is already a
    /// member is left alone.
    pub fn add_item_to_outfit(&mut self, outfit_id: i64, item_id: i64) -> CatalogResult<bool> {
        let tx = self.conn.transaction()?;

        let outfits: i64 = tx.query_row(
            "SELECT COUNT(*) FROM outfits WHERE id = ?1",
            params![outfit_id],
            |row| row.get(0),
        )?;
        if outfits == 0 {
            return Err(CatalogError::MissingItems(vec![outfit_id]));
        }
        let items: i64 = tx.query_row(
            "SELECT COUNT(*) FROM images WHERE id = ?1",
            params![item_id],
            |row| row.get(0),
        )?;
        if items == 0 {
            return Err(CatalogError::MissingItems(vec![item_id]));
        }

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO outfit_items (outfit_id, image_id) VALUES (?1, ?2)",
            params![outfit_id, item_id],
        )?;
        tx.commit()?;
        Ok(inserted > 0)
    }

    /// Remove a membership row, keeping the outfit non-empty.
    ///
    /// Returns whether a row was deleted; removing the last member fails
    /// with `EmptyOutfit` and leaves the membership untouched.
    pub fn remove_item_from_outfit(
        &mut self,
        outfit_id: i64,
        item_id: i64,
    ) -> CatalogResult<bool> {
        let tx = self.conn.transaction()?;

        let members: i64 = tx.query_row(
            "SELECT COUNT(*) FROM outfit_items WHERE outfit_id = ?1",
            params![outfit_id],
            |row| row.get(0),
        )?;
        let deleted = tx.execute(
            "DELETE FROM outfit_items WHERE outfit_id = ?1 AND image_id = ?2",
            params![outfit_id, item_id],
        )?;
        if deleted > 0 && members == deleted as i64 {
            // Dropping the transaction rolls the delete back
            return Err(CatalogError::EmptyOutfit);
        }

        tx.commit()?;
        Ok(deleted > 0)
    }

    /// Number of catalogued outfits
    pub fn outfit_count(&self) -> CatalogResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM outfits", [], |row| row.get(0))?;
        Ok(count)
    }

    // -- Internals --

    fn outfit_members(&self, outfit_id: i64) -> CatalogResult<Vec<OutfitItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT oi.outfit_id, oi.image_id, i.filename, i.file_path
             FROM outfit_items oi
             JOIN images i ON i.id = oi.image_id
             WHERE oi.outfit_id = ?1
             ORDER BY oi.id",
        )?;
        let rows = stmt.query_map(params![outfit_id], |row| {
            Ok(OutfitItem {
                outfit_id: row.get(0)?,
                item_id: row.get(1)?,
                filename: row.get(2)?,
                file_path: PathBuf::from(row.get::<_, String>(3)?),
            })
        })?;

        let mut members = Vec::new();
        for row in rows {
            members.push(row?);
        }
        Ok(members)
    }

    fn attach_labels(&self, item: &mut Item) -> CatalogResult<()> {
        item.categories = self.labels_for(
            item.id,
            "SELECT c.name FROM categories c
             JOIN image_categories ic ON ic.category_id = c.id
             WHERE ic.image_id = ?1 ORDER BY c.name",
        )?;
        item.tags = self.labels_for(
            item.id,
            "SELECT t.name FROM tags t
             JOIN image_tags it ON it.tag_id = t.id
             WHERE it.image_id = ?1 ORDER BY t.name",
        )?;
        Ok(())
    }

    fn labels_for(&self, item_id: i64, sql: &str) -> CatalogResult<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params![item_id], |row| row.get::<_, String>(0))?;

        let mut labels = Vec::new();
        for row in rows {
            labels.push(row?);
        }
        Ok(labels)
    }

    fn names_from(&self, sql: &str) -> CatalogResult<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }
}

/// Insert-or-fetch the id of a named row in `categories` or `tags`
fn ensure_named_row(
    tx: &rusqlite::Transaction<'_>,
    table: &str,
    name: &str,
    now: &str,
) -> CatalogResult<i64> {
    tx.execute(
        &format!(
            "INSERT OR IGNORE INTO {} (name, created_at) VALUES (?1, ?2)",
            table
        ),
        params![name, now],
    )?;
    let id = tx.query_row(
        &format!("SELECT id FROM {} WHERE name = ?1", table),
        params![name],
        |row| row.get(0),
    )?;
    Ok(id)
}

fn map_item_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        filename: row.get(1)?,
        file_path: PathBuf::from(row.get::<_, String>(2)?),
        description: row.get(3)?,
        categories: Vec::new(),
        tags: Vec::new(),
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn map_outfit_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Outfit> {
    Ok(Outfit {
        id: row.get(0)?,
        filename: row.get(1)?,
        file_path: PathBuf::from(row.get::<_, String>(2)?),
        description: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
        items: Vec::new(),
    })
}

/// Translate a UNIQUE constraint failure into a duplicate-filename error
fn map_unique_violation(err: rusqlite::Error, filename: &str) -> CatalogError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            CatalogError::DuplicateFilename(filename.to_string())
        }
        _ => CatalogError::Database(err),
    }
}
