use rusqlite::{Connection, Params, Row};

/// Maps a query row onto a model. Columns are read by name, so queries may
/// alias them or select them in any order.
pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;

    fn query_all<P: Params>(conn: &Connection, sql: &str, params: P) -> rusqlite::Result<Vec<Self>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, Self::from_row)?;
        rows.collect()
    }
}
