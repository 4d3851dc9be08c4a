//! Reduces a raw Eurostat table to the two national series we keep, the
//! 2011M01–2007M01 window, and digit-only observation cells.
//!
//! Every step borrows its input and returns a new table. The fixed order is
//! rows → columns → flags: column slicing expects the series key still at
//! cell 0, and flag stripping expects only kept rows to remain.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::RawTable;

// A series key looks like "NR,I551-I553,EL": comma-separated categorical
// dimensions. Which dimensions exist varies per dataset; the header's key
// label says which.
const UNIT_MARKER: &str = "NR";
const ACTIVITY_MARKER: &str = "I551-I553";
const PARTNER_DIM: &str = "partner";
const PARTNER_TOTAL: &str = "WORLD";
const RESIDENCY_DIM: &str = "c_resid";
const RESIDENCY_TOTAL: &str = "TOTAL";

/// First and last period labels of the kept window, as they appear in the
/// header. Eurostat lists periods newest-first, so the "start" is the later
/// month. The trailing spaces are part of the labels.
pub const RANGE_START: &str = "2011M01 ";
pub const RANGE_END: &str = "2007M01 ";

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").expect("valid regex"));

/// The two geographies retained by the row filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Country {
    Greece,
    Sweden,
}

impl Country {
    pub const ALL: [Country; 2] = [Country::Greece, Country::Sweden];

    /// Eurostat geo code, as matched in the series key.
    pub fn geo_code(self) -> &'static str {
        match self {
            Country::Greece => "EL",
            Country::Sweden => "SE",
        }
    }

    /// Lowercase tag for output filenames.
    pub fn file_tag(self) -> &'static str {
        match self {
            Country::Greece => "el",
            Country::Sweden => "se",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Country::Greece => "Greece",
            Country::Sweden => "Sweden",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A kept data row, tagged with the geography its key matched so consumers
/// never have to rely on row position to tell Greece from Sweden.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRow {
    pub country: Country,
    /// Cell 0 is the series key; the rest are observation cells.
    pub cells: Vec<String>,
}

/// A table after row selection: the untouched header plus the tagged rows that
/// survived, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredTable {
    pub headers: Vec<String>,
    pub rows: Vec<CountryRow>,
}

impl FilteredTable {
    /// The kept row for `country`. Selection can legitimately come back empty
    /// for a geography, so absence is an explicit error rather than a default.
    pub fn row(&self, country: Country) -> Result<&CountryRow> {
        match self.rows.iter().find(|r| r.country == country) {
            Some(row) => Ok(row),
            None => bail!("no {} row survived the series filters", country),
        }
    }

    /// The observation cells for `country` parsed as integers, ready for
    /// charting. Only meaningful after flag stripping; a cell left without
    /// digits (e.g. a ":" placeholder) fails here, naming the period.
    pub fn series(&self, country: Country) -> Result<Vec<u64>> {
        let row = self.row(country)?;
        let mut values = Vec::with_capacity(row.cells.len().saturating_sub(1));
        for (period, cell) in self.headers.iter().zip(&row.cells).skip(1) {
            match cell.parse::<u64>() {
                Ok(v) => values.push(v),
                Err(_) => bail!(
                    "{} observation for period {:?} is not numeric: {:?}",
                    country,
                    period,
                    cell
                ),
            }
        }
        Ok(values)
    }
}

/// Keep only the most general monthly series for Greece and Sweden.
///
/// The header's key label tells us which optional dimensions this dataset
/// carries; a row is kept when its key pins every dimension to the aggregate
/// value (unit NR, activity I551-I553, partner WORLD, residency TOTAL) and
/// names one of the two geographies. Row order is preserved.
pub fn select_rows(table: &RawTable) -> FilteredTable {
    let key_label = table.headers.first().map(String::as_str).unwrap_or("");
    let has_partner = key_label.contains(PARTNER_DIM);
    let has_residency = key_label.contains(RESIDENCY_DIM);

    let mut rows = Vec::new();
    for row in &table.rows {
        let key = row.first().map(String::as_str).unwrap_or("");

        if !key.contains(UNIT_MARKER) || !key.contains(ACTIVITY_MARKER) {
            continue;
        }
        if has_partner && !key.contains(PARTNER_TOTAL) {
            continue;
        }
        if has_residency && !key.contains(RESIDENCY_TOTAL) {
            continue;
        }
        let country = match Country::ALL
            .iter()
            .find(|c| key.contains(c.geo_code()))
        {
            Some(&c) => c,
            None => continue,
        };

        rows.push(CountryRow {
            country,
            cells: row.clone(),
        });
    }

    FilteredTable {
        headers: table.headers.clone(),
        rows,
    }
}

/// Keep the series key plus the period columns between `RANGE_START` and
/// `RANGE_END`, inclusive, in source (newest-first) order.
///
/// Errors if either boundary label is missing from the header, if the labels
/// appear out of order, or if a data row is too short for the slice. Nothing
/// is truncated or padded silently.
pub fn select_columns(table: &FilteredTable) -> Result<FilteredTable> {
    let start = match table.headers.iter().position(|h| h == RANGE_START) {
        Some(i) => i,
        None => bail!("period column {:?} not found in header", RANGE_START),
    };
    let end = match table.headers.iter().position(|h| h == RANGE_END) {
        Some(i) => i,
        None => bail!("period column {:?} not found in header", RANGE_END),
    };
    if start > end {
        bail!(
            "period columns out of order: {:?} at {} after {:?} at {}",
            RANGE_START,
            start,
            RANGE_END,
            end
        );
    }

    let mut headers = Vec::with_capacity(end - start + 2);
    headers.push(table.headers[0].clone());
    headers.extend_from_slice(&table.headers[start..=end]);

    let mut rows = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        if row.cells.len() <= end {
            bail!(
                "row {:?} has {} columns, needs at least {}",
                row.cells.first().map(String::as_str).unwrap_or(""),
                row.cells.len(),
                end + 1
            );
        }
        let mut cells = Vec::with_capacity(end - start + 2);
        cells.push(row.cells[0].clone());
        cells.extend_from_slice(&row.cells[start..=end]);
        rows.push(CountryRow {
            country: row.country,
            cells,
        });
    }

    Ok(FilteredTable { headers, rows })
}

/// Strip Eurostat annotation flags from observation cells, keeping only ASCII
/// digits. "4560.0 c" becomes "45600" — the decimal point goes with the flag,
/// matching the established output format. A cell with no digits at all (e.g.
/// the ":" placeholder for missing data) becomes empty and is passed through.
///
/// The header and every row's series key are never touched, and every data row
/// present is stripped, however many selection produced.
pub fn strip_flags(table: &FilteredTable) -> FilteredTable {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let cells = row
                .cells
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    if i == 0 {
                        cell.clone()
                    } else {
                        NON_DIGIT.replace_all(cell, "").into_owned()
                    }
                })
                .collect();
            CountryRow {
                country: row.country,
                cells,
            }
        })
        .collect();

    FilteredTable {
        headers: table.headers.clone(),
        rows,
    }
}

/// The full reduction: rows, then columns, then flags. The order is load
/// bearing — see the module docs.
pub fn filter_table(table: &RawTable) -> Result<FilteredTable> {
    let selected = select_rows(table);
    let windowed = select_columns(&selected)?;
    Ok(strip_flags(&windowed))
}
