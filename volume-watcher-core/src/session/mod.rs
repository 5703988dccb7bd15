pub mod registry;
pub mod sampling;
pub mod watcher;
