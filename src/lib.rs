pub mod analyzer;
pub mod cli;
pub mod error;
pub mod mappings;
pub mod parser;
pub mod patcher;
pub mod progress;
pub mod report;
pub mod scanner;

pub use error::{ConstMapError, Result};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_CONFIG_ERROR: i32 = 2;
