use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub type DbConn = Arc<Mutex<Connection>>;

mod comment;
mod review;

pub use comment::CommentRepository;
pub use review::ReviewRepository;

#[cfg(test)]
mod tests;
