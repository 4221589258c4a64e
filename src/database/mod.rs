pub mod connection;
pub mod schema;

pub use connection::create_pool;
pub use schema::init_schema;
