//! # histfab
//!
//! Umbrella crate for histfab. The binary lives in `histfab-cli`.

pub use histfab_core::*;
