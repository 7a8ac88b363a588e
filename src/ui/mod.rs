//! UI layer: text output for the CLI.

pub mod report;
