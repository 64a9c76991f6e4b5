//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI
//! args and runs the operation against the router, registry or settings.

pub mod archive;
pub mod classify;
pub mod config;
pub mod registry;
pub mod stylesheet;

pub use classify::execute as classify;
pub use config::execute as config;
pub use stylesheet::execute as stylesheet;
