//! Repositories for database operations
//!
//! Each repository owns one table and reports failures as
//! [`common::error::DatabaseError`]. Operations that must run inside a
//! caller's transaction take a `&mut PgConnection` instead of using the pool.

pub mod complaint;
pub mod joint;
pub mod user;
pub mod vote;

pub use complaint::ComplaintRepository;
pub use joint::JointRepository;
pub use user::UserRepository;
pub use vote::VoteRepository;
