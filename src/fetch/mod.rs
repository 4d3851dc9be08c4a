pub mod gzips;
pub mod urls;

pub use urls::{Dataset, DATASETS};
