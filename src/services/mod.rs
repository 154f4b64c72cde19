pub mod app;
pub mod config;
pub mod extractor;
pub mod images;
pub mod inspector;
pub mod package;
pub mod scanner;
