/// CSV export for step results.
pub mod export;
