pub mod booklet;
pub mod config;
pub mod error;
pub mod marker;
pub mod pdf;
pub mod pipeline;
pub mod render;
