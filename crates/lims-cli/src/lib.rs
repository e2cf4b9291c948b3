//! Library half of the `lims` command-line tool.

pub mod config;
pub mod logging;
pub mod pipeline;
