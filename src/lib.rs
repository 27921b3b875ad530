pub mod cache;
pub mod config;
pub mod errors;
pub mod jobs;
pub mod models;
pub mod playlist;
pub mod sources;
pub mod utils;
pub mod web;
pub mod xmltv;
