// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query plan builders
//!
//! The compiler proper, split by concern:
//! - QueryBuilder: query root, location path, boolean connectives, comparisons
//! - function_builder: built-in function calls (classification, matches, not, attributes)
//! - relationship_builder: relationship traversal and relationship sub-predicates

pub mod function_builder;
pub mod query_builder;
pub mod relationship_builder;

pub use query_builder::{BuiltQuery, QueryBuilder};

use crate::error::CompileError;

pub type CompileResult<T> = Result<T, CompileError>;
