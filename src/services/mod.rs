// Service module exports

pub mod batch;
pub mod commands;
pub mod config;
pub mod export;
pub mod geometry;
pub mod interval;
pub mod snapping;
