//! Database query modules.

pub mod collection;
pub mod movies;
pub mod users;
