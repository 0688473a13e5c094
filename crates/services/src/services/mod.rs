pub mod breed;
pub mod config;
