//! Business logic services for the Librarium API.

pub mod author;
pub mod book;
