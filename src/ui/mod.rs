pub mod charts;
pub mod grid;
pub mod metrics;
pub mod panels;
