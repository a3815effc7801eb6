pub mod app;
pub mod cli;
pub mod command;
pub mod config;
pub mod context;
pub mod copy;
pub mod editor;
pub mod logging;
pub mod screen;
pub mod session;
pub mod tree;
