//! Profile store adapters

mod filesystem;
mod in_memory;

pub use filesystem::FsProfileStore;
pub use in_memory::InMemoryProfileStore;
