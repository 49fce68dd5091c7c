pub mod algorithm;
pub mod classifier;
pub mod common;
pub mod config;
pub mod corpus;
pub mod map;
pub mod runner;
pub mod stat;
