pub mod favorite;
pub mod follow;
pub mod user;
