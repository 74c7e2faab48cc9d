/// CSV export of dispatch snapshots.
pub mod export;
