pub mod connection;
pub mod entities;
pub mod repositories;
pub mod store;

pub use connection::*;
pub use repositories::*;
pub use store::SeaOrmGameStore;
