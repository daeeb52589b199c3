pub mod app;
pub mod appearance;
pub mod config;
pub mod csv_loader;
pub mod logging;
pub mod utils;
pub mod views;
