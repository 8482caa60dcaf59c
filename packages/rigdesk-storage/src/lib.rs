pub mod crypto;
pub mod db;
pub mod live;
pub mod models;
pub mod objects;
pub mod queries;
pub mod redis;
pub mod schema;
pub mod search_index;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
