pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod nav;
pub mod ui;
