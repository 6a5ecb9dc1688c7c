pub mod assertions;
pub mod report;
pub mod runner;
pub mod schema;
