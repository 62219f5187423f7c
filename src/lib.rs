pub mod city;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod parser;
pub mod prompt;
pub mod query;
pub mod record;
pub mod stats;

pub use error::{BikeshareError, Result};
