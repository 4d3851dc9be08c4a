//! Catalog of the Eurostat tourism-occupancy bulk-download datasets.

const BULK_DOWNLOAD_BASE: &str =
    "https://ec.europa.eu/eurostat/estat-navtree-portlet-prod/BulkDownloadListing?file=data/";

/// One monthly tourism-occupancy dataset from the Eurostat bulk facility.
///
/// `name` doubles as the local file stem and the relational table name, so it
/// stays lowercase with underscores.
#[derive(Debug)]
pub struct Dataset {
    pub name: &'static str,
    /// Eurostat dataset code, e.g. "tour_occ_nim".
    pub code: &'static str,
    /// Human description, used as the chart value-axis label.
    pub description: &'static str,
}

pub static DATASETS: &[Dataset] = &[
    Dataset {
        name: "nights",
        code: "tour_occ_nim",
        description: "Nights spent at tourist accommodation establishments",
    },
    Dataset {
        name: "nights_nr",
        code: "tour_occ_ninrmw",
        description: "Nights spent by non-residents at tourist accommodation establishments",
    },
    Dataset {
        name: "arrivals",
        code: "tour_occ_arm",
        description: "Arrivals at tourist accommodation establishments",
    },
    Dataset {
        name: "arrivals_nr",
        code: "tour_occ_arnrmw",
        description: "Arrivals of non-residents at tourist accommodation establishments",
    },
];

impl Dataset {
    /// Bulk-download URL for the gzipped TSV of this dataset.
    pub fn url(&self) -> String {
        format!("{}{}.tsv.gz", BULK_DOWNLOAD_BASE, self.code)
    }

    /// Local filename for the downloaded archive.
    pub fn archive_name(&self) -> String {
        format!("{}.tsv.gz", self.name)
    }

    /// Local filename for the decompressed TSV.
    pub fn tsv_name(&self) -> String {
        format!("{}.tsv", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_all_four_datasets() {
        let names: Vec<_> = DATASETS.iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["nights", "nights_nr", "arrivals", "arrivals_nr"]);
    }

    #[test]
    fn url_points_at_bulk_download_facility() {
        let nights = &DATASETS[0];
        assert_eq!(
            nights.url(),
            "https://ec.europa.eu/eurostat/estat-navtree-portlet-prod/BulkDownloadListing?file=data/tour_occ_nim.tsv.gz"
        );
        assert_eq!(nights.archive_name(), "nights.tsv.gz");
        assert_eq!(nights.tsv_name(), "nights.tsv");
    }
}
