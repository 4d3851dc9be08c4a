use anyhow::{Context, Result};
use estatscraper::{
    chart, duck, export,
    fetch::{self, Dataset},
    process::{self, filter},
};
use reqwest::Client;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tokio::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) configure dirs ───────────────────────────────────────────
    let client = Client::new();
    let downloads_dir = PathBuf::from("downloads");
    let tsv_dir = PathBuf::from("tsv");
    let exports_dir = PathBuf::from("exports");
    let charts_dir = PathBuf::from("charts");

    for d in &[&downloads_dir, &tsv_dir, &exports_dir, &charts_dir] {
        fs::create_dir_all(d)?;
    }
    let db_path = exports_dir.join("tourism.duckdb");

    // ─── 3) download all archives concurrently ───────────────────────
    let mut handles = Vec::with_capacity(fetch::DATASETS.len());
    for ds in fetch::DATASETS {
        let client = client.clone();
        let url = ds.url();
        let dest = downloads_dir.join(ds.archive_name());
        handles.push(tokio::spawn(async move {
            info!(dataset = ds.name, "downloading");
            let start = Instant::now();
            let path = fetch::gzips::download_gz(&client, &url, &dest).await?;
            info!(dataset = ds.name, elapsed = ?start.elapsed(), "downloaded");
            Ok::<_, anyhow::Error>((ds, path))
        }));
    }

    let mut downloaded: Vec<(&'static Dataset, PathBuf)> = Vec::new();
    for joined in futures::future::join_all(handles).await {
        match joined? {
            Ok(pair) => downloaded.push(pair),
            Err(e) => error!("download failed: {:#}", e),
        }
    }

    // ─── 4) process each dataset, one at a time ──────────────────────
    for (ds, gz_path) in downloaded {
        info!(dataset = ds.name, "processing");

        // the whole chain is file + database work; keep it off the runtime
        let result = tokio::task::spawn_blocking({
            let tsv_path = tsv_dir.join(ds.tsv_name());
            let exports_dir = exports_dir.clone();
            let charts_dir = charts_dir.clone();
            let db_path = db_path.clone();
            move || run_dataset(ds, &gz_path, &tsv_path, &exports_dir, &charts_dir, &db_path)
        })
        .await?;

        // a bad dataset aborts its own pipeline only
        if let Err(e) = result {
            error!(dataset = ds.name, "pipeline failed: {:#}", e);
            continue;
        }
        info!(dataset = ds.name, "done");
    }

    info!("all done");
    Ok(())
}

/// Unpack → parse → filter → export (CSV, relational, charts) for one dataset.
fn run_dataset(
    ds: &Dataset,
    gz_path: &Path,
    tsv_path: &Path,
    exports_dir: &Path,
    charts_dir: &Path,
    db_path: &Path,
) -> Result<()> {
    process::unpack_gz(gz_path, tsv_path)?;
    let raw = process::read_tsv(tsv_path)?;
    info!(dataset = ds.name, rows = raw.rows.len(), "parsed");

    let table = filter::filter_table(&raw)
        .with_context(|| format!("filtering dataset {}", ds.name))?;
    info!(
        dataset = ds.name,
        rows = table.rows.len(),
        periods = table.headers.len() - 1,
        "filtered"
    );

    let csv_path = exports_dir.join(format!("{}.csv", ds.name));
    export::write_csv(&table, &csv_path)?;
    info!(dataset = ds.name, path = %csv_path.display(), "wrote CSV");

    let conn = duck::open_db(db_path)?;
    duck::ensure_table(&conn, ds.name)?;
    let observations = duck::insert_observations(&conn, ds.name, &table)?;
    info!(dataset = ds.name, observations, "inserted into DuckDB");

    for country in filter::Country::ALL {
        let series = table
            .series(country)
            .with_context(|| format!("charting {} for {}", ds.name, country))?;
        let chart_path = charts_dir.join(format!("{}_{}.svg", ds.name, country.file_tag()));
        chart::render_bar_chart(&chart_path, country.name(), "Month", ds.description, &series)?;
        info!(dataset = ds.name, path = %chart_path.display(), "wrote chart");
    }

    Ok(())
}
