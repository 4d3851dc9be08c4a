use anyhow::{Context, Result};
use std::path::Path;

use crate::process::filter::FilteredTable;

/// Write the filtered table as a comma-separated flat file: the header record
/// first, then one record per kept row (series key + observation cells).
pub fn write_csv(table: &FilteredTable, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV file {}", path.display()))?;

    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(&row.cells)?;
    }
    wtr.flush()
        .with_context(|| format!("flushing CSV file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::filter::{Country, CountryRow};
    use anyhow::Result;
    use std::fs;

    #[test]
    fn writes_header_then_rows() -> Result<()> {
        let table = FilteredTable {
            headers: vec!["unit,geo".into(), "2011M01 ".into(), "2007M01 ".into()],
            rows: vec![CountryRow {
                country: Country::Greece,
                cells: vec!["NR,I551-I553,EL".into(), "1098763".into(), "1206835".into()],
            }],
        };

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nights.csv");
        write_csv(&table, &path)?;

        let written = fs::read_to_string(&path)?;
        let mut lines = written.lines();
        // the key label contains a comma, so the csv writer quotes it
        assert_eq!(lines.next(), Some("\"unit,geo\",2011M01 ,2007M01 "));
        assert_eq!(
            lines.next(),
            Some("\"NR,I551-I553,EL\",1098763,1206835")
        );
        assert_eq!(lines.next(), None);
        Ok(())
    }
}
