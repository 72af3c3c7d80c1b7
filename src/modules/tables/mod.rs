pub mod config;
pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use config::get_table_config;
pub use model::*;
pub use router::init_tables_router;
