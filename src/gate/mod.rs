//! Version-advance gate
//!
//! Refuses a push when the working version is behind the newest SemVer tag
//! on the local branch, or behind the newest version ever published on the
//! remote branch (declared in any source file of any remote commit, or
//! present as a remote tag).

pub mod declarations;
pub mod local_version;
pub mod version_gate;

pub use declarations::{DeclarationScanner, Unscannable};
pub use local_version::LocalVersion;
pub use version_gate::{
    decide, GateOptions, GateOutcome, GateReport, PassReason, VersionGate, Violation,
};
