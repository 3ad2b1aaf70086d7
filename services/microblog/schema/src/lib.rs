//! sea-orm entities for the microblog tables.

pub mod microposts;
pub mod relationships;
pub mod users;
