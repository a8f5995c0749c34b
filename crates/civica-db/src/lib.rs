pub mod connection;
pub use connection::Connection;

pub mod results;
pub mod schema;

pub mod attendance;
pub mod donations;
pub mod events;
pub mod members;
pub mod news;
pub mod subscriptions;
