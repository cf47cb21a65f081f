pub mod error;
pub mod model;
pub mod routes;
pub mod stats;
pub mod store;
pub mod ui;
