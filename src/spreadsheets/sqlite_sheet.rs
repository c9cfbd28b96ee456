// src/spreadsheets/sqlite_sheet.rs
use crate::db::connection::{init_db, Database};
use crate::errors::ServerError;
use crate::spreadsheets::backend::{SheetBackend, SheetRow};
use crate::spreadsheets::columns::SHEET_HEADERS;
use chrono::Utc;
use rusqlite::{params, Connection};

/// Sheet backed by a local SQLite file.
pub struct SqliteSheet {
    db: Database,
}

impl SqliteSheet {
    /// Open (creating if needed) and check the header row matches the schema
    /// this build expects.
    pub fn open(db: Database, schema_path: &str) -> Result<Self, ServerError> {
        init_db(&db, schema_path)?;
        db.with_conn(|conn| ensure_header(conn))?;
        Ok(Self { db })
    }
}

fn ensure_header(conn: &mut Connection) -> Result<(), ServerError> {
    let mut stmt = conn.prepare("SELECT name FROM sheet_header ORDER BY position")?;
    let existing = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    drop(stmt);

    if existing.is_empty() {
        let tx = conn.transaction()?;
        for (i, name) in SHEET_HEADERS.iter().enumerate() {
            tx.execute(
                "INSERT INTO sheet_header (position, name) VALUES (?1, ?2)",
                params![i as i64, name],
            )?;
        }
        tx.commit()?;
        return Ok(());
    }

    if existing.iter().map(String::as_str).ne(SHEET_HEADERS.iter().copied()) {
        return Err(ServerError::SheetError(format!(
            "sheet header mismatch: found [{}]",
            existing.join(", ")
        )));
    }
    Ok(())
}

fn decode_cells(raw: &str) -> Result<SheetRow, ServerError> {
    let cells: Vec<String> = serde_json::from_str(raw)
        .map_err(|e| ServerError::SheetError(format!("corrupt row: {e}")))?;
    Ok(SheetRow::from_cells(cells))
}

fn encode_cells(row: &SheetRow) -> Result<String, ServerError> {
    serde_json::to_string(row).map_err(|e| ServerError::SheetError(e.to_string()))
}

impl SheetBackend for SqliteSheet {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn get_rows(&self) -> Result<Vec<SheetRow>, ServerError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT cells FROM sheet_rows ORDER BY row_index")?;
            let raw = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            raw.iter().map(|r| decode_cells(r)).collect()
        })
    }

    fn append_row(&self, row: &SheetRow) -> Result<(), ServerError> {
        let cells = encode_cells(row)?;
        self.db.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO sheet_rows (row_index, lead_id, cells, updated_at)
                VALUES ((SELECT COALESCE(MAX(row_index) + 1, 0) FROM sheet_rows), ?1, ?2, ?3)
                "#,
                params![row.lead_id(), cells, Utc::now().naive_utc()],
            )?;
            Ok(())
        })
    }

    fn update_row(&self, index: usize, row: &SheetRow) -> Result<(), ServerError> {
        let cells = encode_cells(row)?;
        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE sheet_rows SET lead_id = ?1, cells = ?2, updated_at = ?3 WHERE row_index = ?4",
                params![row.lead_id(), cells, Utc::now().naive_utc(), index as i64],
            )?;
            if changed == 0 {
                return Err(ServerError::SheetError(format!("row {index} does not exist")));
            }
            Ok(())
        })
    }
}
