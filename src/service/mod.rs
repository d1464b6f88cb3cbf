//! Operations on the store: each function is one unit of work, meant to run
//! inside [`Database::transaction`](crate::store::Database::transaction) (or
//! [`Database::read`](crate::store::Database::read) for queries).

pub mod classification;
pub mod competitions;
pub mod matches;
pub mod players;
pub mod teams;
