pub mod cache;
pub mod config;
pub mod error;
pub mod evolution;
pub mod graph;
pub mod individual;
pub mod population;
pub mod problem;
pub mod segmentation;
// cmd and reports belong to the binary (main.rs).
