pub mod error;
pub mod runner;
pub mod tables;
pub mod task;
pub mod upsert;

#[cfg(test)]
mod tests;
