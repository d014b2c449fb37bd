pub mod chunked;
pub mod context;
pub mod packed;
pub mod reader;
