//! A content-addressed build engine.
//!
//! This crate wires an on-disk [`Backend`][`snowflake_core::Backend`]
//! implementation (the [`state`] module) to [`Evaluator`], the engine
//! that walks a rule graph and drives it to completion.

#![warn(missing_docs)]

pub use self::{config::Config, evaluator::Evaluator};

pub mod fanout;
pub mod state;

mod config;
mod evaluator;
