//! Locale-aware number fields for GPUI.
//!
//! [`number_field`] holds the headless field state. Formatting, parsing and
//! value validation live in the [`format`] crate re-exported here.

pub mod number_field;

pub use number_format as format;

mod error;
pub use error::*;

mod init;
pub use init::*;
