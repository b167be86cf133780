pub mod collection;
pub mod shared;
pub mod user;
