//! Road network CLI library.
//!
//! Output formatting shared by the `roadnet-cli` subcommands.

pub mod output;
