pub mod config;
pub mod db;
pub mod dom;
pub mod entitlement;
pub mod errors;
pub mod export;
pub mod layout;
pub mod models;
pub mod raster;
pub mod store;
pub mod templates;
pub mod validation;
