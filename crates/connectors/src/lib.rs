pub mod endpoint;
pub mod provider;
pub mod sql;
