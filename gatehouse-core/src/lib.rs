pub mod access;
pub mod actor;
pub mod authorization;
pub mod settings;
pub mod utils;
