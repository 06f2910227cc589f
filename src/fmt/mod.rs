//! Canonical rendering of the syntax tree
//!
//! This module provides `Display` implementations for [`crate::ast`] nodes.
//! Rendering a parsed tree makes operator grouping visible, which is what the
//! command-line tool prints and what most parser tests compare against.

mod canonical;
