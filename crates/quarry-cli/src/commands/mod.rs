//! Command implementations.

pub mod categories;
pub mod extract;
pub mod resolve;

pub use self::categories::execute_categories;
pub use self::extract::{execute_extract, run_extract};
pub use self::resolve::execute_resolve;
