//! toponym-cli
//! ===========
//!
//! Command-line interface for the `toponym-core` gazetteer search engine.
//!
//! This crate primarily provides a binary (`toponym`). The library target
//! only exists so that the crate documentation renders this overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! toponym --help
//! toponym build
//! toponym search "Berlin" --count 5
//! toponym --lang de search "Frankfurt, Hessen"
//! toponym proximity 52.52 13.40 --radius 10
//! toponym --json get 2950159
//! toponym stats
//! ```
//!
//! All commands read `data/database.bin` and rebuild it from
//! `data/allCountries.txt` and `data/alternateNames.txt` when it is missing
//! or older than those tables. Use `--data-dir` or the individual path flags
//! to point elsewhere.
//!
//! For programmatic access use the `toponym-core` crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
