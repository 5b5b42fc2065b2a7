pub mod aggregator;
pub mod formatter;
