pub mod config;
pub mod headless;
pub mod loader;
pub mod logging;
pub mod output;
pub mod ui;
pub mod vm;
