//! Highlight CLI - report rendering shared by the command-line tools

pub mod output;
