//! The dock's persistent tile list.

pub mod defaults;
pub mod errors;
pub mod registry;
pub mod tiles;

pub use defaults::DefaultsDockRegistry;
pub use errors::DockError;
pub use registry::{DockRegistry, MemoryDockRegistry, remove_tiles_where};
pub use tiles::{DockTile, parse_persistent_apps};
