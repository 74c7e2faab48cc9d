//! Physical device models for the hybrid storage system.

/// Electrochemical battery model.
pub mod battery;
/// Synthetic community load profile generator.
pub mod load;
/// Supercapacitor model and null stand-in.
pub mod supercap;

// Re-export the main types for convenience
pub use battery::Battery;
pub use load::CommunityLoad;
pub use supercap::FastStorage;
pub use supercap::NullStorage;
pub use supercap::Supercapacitor;
