//! Database schema initialization and migrations.

use log::info;

use crate::{
    error::{DatabaseResultExt, Result},
    models::Column,
};

impl super::Database {
    /// Creates missing tables from the embedded schema, then migrates.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()
    }

    /// Early preference files had a visibility flag only.
    fn apply_migrations(&self) -> Result<()> {
        let has_editable_column: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('column_preferences') WHERE name = 'editable'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .db_context("Failed to inspect column_preferences table")?;

        if !has_editable_column {
            info!("Adding editable flag to column preferences");
            self.connection
                .execute(
                    "ALTER TABLE column_preferences ADD COLUMN editable INTEGER NOT NULL DEFAULT 0",
                    [],
                )
                .db_context("Failed to add editable column to column_preferences table")?;

            // Stored rows predate lockable columns; keep their cells editable.
            for column in Column::ALL.into_iter().filter(|c| c.field().is_some()) {
                self.connection
                    .execute(
                        "UPDATE column_preferences SET editable = 1 WHERE column_name = ?1",
                        [column.as_str()],
                    )
                    .db_context("Failed to migrate column editability")?;
            }
        }

        Ok(())
    }
}
