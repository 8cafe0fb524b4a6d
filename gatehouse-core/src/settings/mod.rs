pub mod directory;
pub mod routes;
pub mod session;
pub mod views;
