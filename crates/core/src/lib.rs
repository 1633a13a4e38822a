//! Core library for issueview
//!
//! This crate implements the **Functional Core** of the issueview application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The issueview project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`issueview_core`** (this crate): Pure transformation functions with zero I/O
//! - **`issueview`**: I/O operations and orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Deterministic**: Behavior is predictable and reproducible
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! - [`adf`]: The document converter — Atlassian Document Format trees to
//!   plain text (for search/indexing) and sanitized HTML (for display)
//! - [`jira`]: Transformations for Jira API responses, which feed document
//!   trees and attachment metadata into the converter
//!
//! Each module contains:
//!
//! - **Domain models**: Structured types representing API responses and outputs
//! - **Transformation functions**: Pure functions that convert API data to domain models
//! - **Comprehensive tests**: Unit tests using fixture data (no mocking)
//!
//! # Example Usage
//!
//! ```rust
//! use issueview_core::adf::{extract_plain_text, render_html};
//!
//! let doc = serde_json::json!({
//!     "type": "doc",
//!     "content": [
//!         { "type": "paragraph", "content": [{ "type": "text", "text": "Hello" }] }
//!     ]
//! });
//!
//! assert_eq!(extract_plain_text(&doc), "Hello");
//! assert_eq!(render_html(&doc, &[], None), "<p>Hello</p>");
//! ```

pub mod adf;
pub mod jira;
