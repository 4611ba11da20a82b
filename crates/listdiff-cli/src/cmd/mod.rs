pub mod operations;
pub mod run;
