pub mod chart;
pub mod duck;
pub mod export;
pub mod fetch;
pub mod process;
