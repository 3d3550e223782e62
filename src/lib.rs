pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod normalize;
pub mod options;
