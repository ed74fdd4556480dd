pub mod args;
pub mod commands;
mod config;
mod db;
mod error;
pub mod model;
mod session;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use error::{error_type_of, Error, ErrorType, Result};
pub use session::Session;
