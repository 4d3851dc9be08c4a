// src/process/mod.rs
use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use flate2::read::GzDecoder;

use std::{
    fs::File,
    io::{self, BufReader, BufWriter},
    path::Path,
};

pub mod filter;

/// A parsed Eurostat TSV, straight off the wire.
///
/// `headers[0]` is the composite series-key label (e.g. `unit,nace_r2,geo\time`);
/// the remaining header cells are period labels carrying a trailing space
/// (e.g. `2011M01 `). Each data row keys on its first cell the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Decompress `gz_path` into a plain TSV at `tsv_path`, streaming.
#[tracing::instrument(level = "info", skip_all, fields(gz = %gz_path.as_ref().display()))]
pub fn unpack_gz<P: AsRef<Path>, Q: AsRef<Path>>(gz_path: P, tsv_path: Q) -> Result<()> {
    let gz_path = gz_path.as_ref();
    let tsv_path = tsv_path.as_ref();

    let file = File::open(gz_path)
        .with_context(|| format!("Failed to open archive: {}", gz_path.display()))?;
    let mut decoder = GzDecoder::new(BufReader::new(file));

    let out = File::create(tsv_path)
        .with_context(|| format!("Failed to create TSV file: {}", tsv_path.display()))?;
    let mut writer = BufWriter::new(out);

    io::copy(&mut decoder, &mut writer)
        .with_context(|| format!("Failed to decompress {}", gz_path.display()))?;
    Ok(())
}

/// Read a Eurostat TSV into memory: first record is the header, the rest are
/// data rows. Field counts may vary between records; shape is enforced later,
/// when columns are sliced.
#[tracing::instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn read_tsv<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open TSV: {}", path.display()))?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut records: Vec<Vec<String>> = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result
            .with_context(|| format!("TSV parse error in {} at record {}", path.display(), idx))?;
        records.push(record.iter().map(str::to_string).collect());
    }

    if records.is_empty() {
        bail!("TSV {} contains no records, not even a header", path.display());
    }
    let headers = records.remove(0);

    Ok(RawTable {
        headers,
        rows: records,
    })
}
