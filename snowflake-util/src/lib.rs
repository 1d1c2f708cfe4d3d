//! Snowflake-specific utility items.
//!
//! This crate collects the pieces that are shared between the crates
//! implementing the build engine: the cryptographic hashing primitives
//! used to give rules and artifacts stable identity, and the validated
//! source-name type used to key a rule's sources mapping.

#![warn(missing_docs)]

/// Markdown text telling the reader to refer to
/// the manual for definitions of unfamiliar terms.
#[macro_export]
macro_rules! see_manual
{
    () => {
        concat!(
            "The documentation for this crate does not define all terms.\n",
            "Refer to the [Snowflake manual] for a thorough description\n",
            "of all the terms and their concepts involved.\n",
            "\n",
            "[Snowflake manual]: /snowflake-manual/index.html\n",
        )
    };
}

pub mod hash;
pub mod source_name;
