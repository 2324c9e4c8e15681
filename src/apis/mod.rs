pub mod trackor;
pub mod file;

// Re-export all APIs
pub use trackor::{TrackorApi, DELETE_CONFIRMATION};
pub use file::FileApi;
