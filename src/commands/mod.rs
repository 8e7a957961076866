pub mod generate;
pub mod library;
pub mod providers;
