pub mod memory;
pub mod postgres;
pub mod store;
pub mod users;
