//! friday-cli
//! ==========
//!
//! Command-line driver for the `friday-core` client.
//!
//! This crate primarily provides a binary (`friday-cli`). The library target
//! only exists so that a documentation page is rendered with this overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! friday-cli --help
//! friday-cli geo
//! friday-cli search "Seattle"
//! friday-cli signup --name "Ada" --email ada@example.com --city-id 42
//! friday-cli feedback --email ada@example.com --category bug "The map is blank"
//! friday-cli banner dismiss
//! ```
//!
//! Configuration is read from `--config <file.json>` (if given) and then
//! `FRIDAY_*` environment variables. Log verbosity follows `RUST_LOG`, or
//! `-v` / `-vv` when it is unset.
//!
//! For programmatic access use the [`friday-core`] crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
