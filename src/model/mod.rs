pub mod task;
pub mod group;
pub mod store;
pub mod config;

pub use task::*;
pub use group::*;
pub use store::*;
pub use config::*;
