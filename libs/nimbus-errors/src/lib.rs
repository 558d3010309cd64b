#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Error payload types shared by the Nimbus SDK crates
//!
//! This crate holds pure data types with no transport dependencies:
//! - RFC 9457 Problem Details as received from a service (`ProblemDetails`)

pub mod problem;

pub use problem::{APPLICATION_PROBLEM_JSON, ProblemDetails};
