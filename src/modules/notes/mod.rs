pub mod controller;
pub mod model;
pub mod mutation;
pub mod router;
pub mod service;

pub use model::*;
pub use router::init_notes_router;
