//! Invoking a rule's build script.
//!
#![doc = snowflake_util::see_manual!()]

#![warn(missing_docs)]

pub use self::runner::*;

mod runner;
