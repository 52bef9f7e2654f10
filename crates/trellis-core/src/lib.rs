//! Trellis Core Types and Definitions
//!
//! This crate provides the foundational types for Trellis workflow graphs.
//! It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Flow**: The workflow graph model ([`flow`] module)
//!
//! Nothing in this crate knows about layout algorithms or insertion policy;
//! those live in the `trellis` crate and operate on these types.

pub mod flow;
pub mod geometry;
pub mod identifier;
