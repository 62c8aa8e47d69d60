pub mod error;
pub mod model;
pub mod search_api;
