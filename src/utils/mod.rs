pub mod numbering;
pub mod sanitize;
pub mod time;

pub use numbering::NumberPool;
