pub mod audit;
pub mod comment;
pub mod entry;
pub mod vote;

pub use audit::*;
pub use comment::*;
pub use entry::*;
pub use vote::*;
