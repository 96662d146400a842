pub mod parser;
pub mod rows;
