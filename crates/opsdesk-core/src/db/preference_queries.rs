//! Column preference queries.

use log::warn;
use rusqlite::params;

use crate::{
    error::{DatabaseResultExt, Result},
    models::{Column, ColumnPreferences},
};

const SELECT_COLUMNS_SQL: &str =
    "SELECT column_name, visible, editable FROM column_preferences ORDER BY column_name";
const UPSERT_COLUMN_SQL: &str = "INSERT INTO column_preferences (column_name, visible, editable) VALUES (?1, ?2, ?3) \
     ON CONFLICT(column_name) DO UPDATE SET visible = excluded.visible, editable = excluded.editable";
const DELETE_COLUMNS_SQL: &str = "DELETE FROM column_preferences";

impl super::Database {
    /// Loads stored column preferences; columns without a row keep their
    /// defaults and unknown column names are skipped.
    pub fn load_column_preferences(&self) -> Result<ColumnPreferences> {
        let mut stmt = self
            .connection
            .prepare(SELECT_COLUMNS_SQL)
            .db_context("Failed to prepare column preference query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, bool>(2)?,
                ))
            })
            .db_context("Failed to query column preferences")?;

        let mut preferences = ColumnPreferences::default();
        for row in rows {
            let (name, visible, editable) = row.db_context("Failed to read column preference")?;
            let column: Column = match name.parse() {
                Ok(column) => column,
                Err(e) => {
                    warn!("Ignoring stored preference: {e}");
                    continue;
                }
            };
            preferences.set_visible(column, visible);
            if let Err(e) = preferences.set_editable(column, editable) {
                warn!("Ignoring stored editability of {column}: {e}");
            }
        }

        Ok(preferences)
    }

    /// Replaces the stored preferences with the effective setting of every
    /// column.
    pub fn save_column_preferences(&mut self, preferences: &ColumnPreferences) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(DELETE_COLUMNS_SQL, [])
            .db_context("Failed to clear column preferences")?;
        for (column, setting) in preferences.iter() {
            tx.execute(
                UPSERT_COLUMN_SQL,
                params![column.as_str(), setting.visible, setting.editable],
            )
            .db_context("Failed to store column preference")?;
        }

        tx.commit().db_context("Failed to commit transaction")
    }
}
