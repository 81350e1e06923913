pub mod company;

// Re-export commonly used types
pub use company::*;
