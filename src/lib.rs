pub mod args;
pub mod console;
pub mod data_dir;
pub mod db;
pub mod errors;
pub mod menu;
pub mod model;
pub mod parser;
