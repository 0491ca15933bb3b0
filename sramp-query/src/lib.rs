// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! sramp-query: the S-RAMP XPath query language
//!
//! This crate models S-RAMP repository queries as a typed AST, prints them
//! back to canonical query text, and compiles them into a backend-neutral
//! structural query (selectors, joins, constraints, ordering) for a
//! hierarchical content store.
//!
//! # Quick Start
//!
//! ```no_run
//! use sramp_query::ast::{EqualityExpr, Predicate, Query, XPathSerializer};
//! use sramp_query::classification::InMemoryClassificationResolver;
//! use sramp_query::plan::QueryCompiler;
//!
//! # fn main() -> Result<(), sramp_query::CompileError> {
//! let query = Query::of_type("core", "Document")
//!     .with_predicate(Predicate::new(EqualityExpr::property_equals("name", "PO.xml")));
//!
//! // "/s-ramp/core/Document[@name = 'PO.xml']"
//! println!("{}", XPathSerializer::new().serialize(&query));
//!
//! let resolver = InMemoryClassificationResolver::new();
//! let compiled = QueryCompiler::new(&resolver).compile(&query)?.build_query()?;
//! println!("{}", compiled.to_sql2());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//!   Query AST ──► QueryValidator ──► QueryBuilder ──► Compilation ──► CompiledQuery
//!       │                           (query, function,   (deferred        │
//!       ▼                            relationship)       errors)         ▼
//!   XPathSerializer                                              Sql2Renderer
//! ```

pub mod ast;
pub mod classification;
pub mod config;
pub mod error;
pub mod plan;
pub mod schema;

pub use ast::{Query, QueryTemplate, Visitable, Visitor, XPathSerializer};
pub use classification::{ClassificationResolver, InMemoryClassificationResolver, ResolutionError};
pub use config::{CompilerConfig, ConfigError};
pub use error::{CompileError, ErrorKind};
pub use plan::{Compilation, CompiledQuery, OrderBy, QueryCompiler, StructuralQuery};
