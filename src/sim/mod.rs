/// Energy-management dispatch policy.
pub mod dispatcher;
pub mod engine;
pub mod kpi;
/// Sliding-window demand transient detection.
pub mod transient;
pub mod types;
