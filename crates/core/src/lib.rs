// crates/core/src/lib.rs
pub mod archive;
pub mod branch;
pub mod browse;
pub mod error;
pub mod export;
pub mod format;

pub use archive::*;
pub use branch::*;
pub use browse::*;
pub use error::*;
pub use export::*;
pub use format::*;
