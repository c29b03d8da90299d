// ABOUTME: Command implementations for the CLI surface
// ABOUTME: Exports the poll, config, and watermark commands

pub mod config;
pub mod poll;
pub mod watermark;
