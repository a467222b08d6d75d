pub mod core;
pub mod descriptor;
pub mod records;
pub mod report;
