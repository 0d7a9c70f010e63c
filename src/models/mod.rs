pub mod author;
pub mod book;
pub mod pagination;
pub mod patch;
