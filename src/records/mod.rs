//! Record-service proxy client and the domain types projected from its
//! records.

pub mod api_types;
pub mod cache;
pub mod client;
pub mod source;
pub mod types;
