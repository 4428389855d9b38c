//! Integration test crate for Clipmark.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It drives a full `EditorSession` over a clock-driven media backend.

#[cfg(test)]
mod harness;

#[cfg(test)]
mod scenarios;

#[cfg(test)]
mod persistence;

#[cfg(test)]
mod properties;
