pub mod common;
pub mod locator;
pub mod process;
pub mod service;
pub mod startup;
pub mod writer;
