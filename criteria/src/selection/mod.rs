pub mod filter;
pub mod predicate;
pub mod sql;
