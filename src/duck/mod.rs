use anyhow::{Context, Result};
use duckdb::{Connection, ToSql};
use std::path::Path;

use crate::process::filter::FilteredTable;

/// Open a DuckDB database on disk at `path`, creating the file if it doesn't exist.
pub fn open_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("opening DuckDB database at {}", path.display()))?;
    Ok(conn)
}

/// Open a DuckDB in-memory database.
pub fn open_mem_db() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    Ok(conn)
}

/// Make sure the three-column destination table for a dataset exists.
/// Values stay VARCHAR: flag stripping can legitimately leave a cell empty.
pub fn ensure_table(conn: &Connection, table: &str) -> Result<()> {
    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS {}(
                series VARCHAR,
                period VARCHAR,
                value VARCHAR
            );",
            table
        ),
        [],
    )
    .with_context(|| format!("creating table {}", table))?;
    Ok(())
}

/// Insert one (series key, period label, value) row per observation cell via
/// the bulk appender. Returns how many observations landed.
pub fn insert_observations(
    conn: &Connection,
    table: &str,
    data: &FilteredTable,
) -> Result<usize> {
    let mut triples: Vec<(&str, &str, &str)> = Vec::new();
    for row in &data.rows {
        let series = row.cells[0].as_str();
        for (period, value) in data.headers.iter().zip(&row.cells).skip(1) {
            triples.push((series, period.as_str(), value.as_str()));
        }
    }

    let mut appender = conn
        .appender(table)
        .with_context(|| format!("opening appender for {}", table))?;
    appender.append_rows(triples.iter().map(|(series, period, value)| {
        [
            series as &dyn ToSql,
            period as &dyn ToSql,
            value as &dyn ToSql,
        ]
    }))?;
    appender.flush()?;

    Ok(triples.len())
}
