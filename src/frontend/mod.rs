//! The built UI bundle: verifying it and producing it.

pub mod build;
pub mod gate;

pub use build::FrontendBuilder;
pub use gate::{dist_dir, ArtifactGate, ArtifactReport};
