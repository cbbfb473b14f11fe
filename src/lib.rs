pub mod config;
pub mod crawler;
pub mod fetch_error;
pub mod fetcher;
pub mod parser;
pub mod planner;
pub mod sink;
pub mod stations;
