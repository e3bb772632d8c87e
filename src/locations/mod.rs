pub mod registry;
pub mod session;
pub mod tree;
pub mod types;

pub use registry::{LocationAction, LocationRegistry};
pub use session::LocationSession;
pub use tree::TreeLoader;
pub use types::{DirectoryEntry, Location, LocationDraft, LocationPatch, RawEntry};
