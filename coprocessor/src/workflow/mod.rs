pub mod acquisition;
pub mod config;
pub mod context;
pub mod processor;
