//! One parser per supported file format

pub mod json;
pub mod toml;
pub mod yaml;
