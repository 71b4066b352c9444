pub mod cli;
pub mod commands;
pub mod common;
pub mod db;
pub mod error;
pub mod network;
pub mod record;
pub mod source;
