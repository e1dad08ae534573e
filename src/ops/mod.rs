pub mod filter;
pub mod import;
pub mod reorder;
pub mod task_ops;
