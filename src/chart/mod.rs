use anyhow::{bail, Result};
use plotters::prelude::*;
use std::path::Path;

/// Render a monthly series as a vertical bar chart, one bar per period in
/// source (newest-first) order, written as an SVG at `path`.
///
/// The caller supplies already-parsed values; see
/// [`crate::process::filter::FilteredTable::series`].
pub fn render_bar_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    values: &[u64],
) -> Result<()> {
    if values.is_empty() {
        bail!("no observations to chart for {:?}", title);
    }

    let root = SVGBackend::new(path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = values.iter().copied().max().unwrap_or(1).max(1);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 32))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(96)
        .build_cartesian_2d((0..values.len()).into_segmented(), 0..y_max + y_max / 10)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.7).filled())
            .data(values.iter().enumerate().map(|(i, v)| (i, *v))),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;

    #[test]
    fn renders_svg_to_disk() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nights_el.svg");
        render_bar_chart(
            &path,
            "Greece",
            "Month",
            "Nights spent at tourist accommodation establishments",
            &[1098763, 1127432, 1206835],
        )?;

        let svg = fs::read_to_string(&path)?;
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Greece"));
        Ok(())
    }

    #[test]
    fn empty_series_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.svg");
        assert!(render_bar_chart(&path, "Greece", "Month", "Nights", &[]).is_err());
        assert!(!path.exists());
    }
}
