pub mod ai;
pub mod config;
pub mod task;
pub mod web;
