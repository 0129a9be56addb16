//! The data-management core: users, shared movie records, and the
//! per-user collection entries that tie them together.

mod manager;

pub use manager::CollectionManager;
