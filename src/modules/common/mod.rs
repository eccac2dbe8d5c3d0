pub mod error;
pub mod logging;
pub mod paths;
pub mod platform;
pub mod settings;
pub mod utils;
