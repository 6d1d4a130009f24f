pub mod call;
pub mod clear;
pub mod export;
pub mod import;
pub mod summary;
