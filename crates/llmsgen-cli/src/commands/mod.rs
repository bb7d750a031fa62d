//! Command implementations for the llmsgen CLI

pub mod generate;

pub use generate::execute as generate;
