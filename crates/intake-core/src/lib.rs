pub mod config;
pub mod crypto;
pub mod engine;
pub mod judge;
pub mod model;
pub mod providers;
pub mod report;
pub mod storage;
pub mod validate;
