//! Terminal output for the marketing-list CLI
//!
//! - Status lines
//! - Formatting of miles, dollar amounts and coordinates
//! - Property tables

#![warn(missing_docs)]

pub mod output;
