//! Domain logic - pure value types independent of git and HTTP access

pub mod commit;
pub mod remote;
pub mod tag;
pub mod version;

pub use commit::CommitRef;
pub use remote::RemoteSlug;
pub use tag::{Tag, TagMap};
pub use version::SemanticVersion;
