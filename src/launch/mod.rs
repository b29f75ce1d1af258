//! Starting the backend server.
//!
//! [`ServerSettings`] holds the typed runtime values, [`LaunchPlan`] turns
//! them into a concrete command and [`Launcher`] runs it. On Unix the
//! server replaces the depot process so signals reach it directly.

pub mod plan;
pub mod process;
pub mod settings;

pub use plan::LaunchPlan;
pub use process::{Launcher, ProcessLauncher};
pub use settings::{Mode, ServerSettings};
