pub mod config;
pub mod run;
pub mod type_text;
