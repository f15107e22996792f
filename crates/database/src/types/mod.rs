//! Shared result aliases and error types

pub mod errors;

pub type DatabaseResult<T> = Result<T, errors::DatabaseError>;
pub type UserResult<T> = Result<T, errors::UserError>;
