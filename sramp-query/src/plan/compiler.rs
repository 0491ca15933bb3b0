// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query compiler
//!
//! [`QueryCompiler`] holds configuration and the classification resolver
//! only. Every call to [`QueryCompiler::compile`] builds its own state, so one
//! compiler can serve any number of queries, from any number of threads.

use serde::{Deserialize, Serialize};

use crate::ast::{Query, QueryValidator};
use crate::classification::ClassificationResolver;
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::plan::builders::QueryBuilder;
use crate::plan::context::and_all;
use crate::plan::render::Sql2Renderer;
use crate::plan::structural::{Column, Constraint, Ordering, PropertyValue, Source, StructuralQuery};
use crate::schema::properties::{self, UUID};

/// Requested result order: one property, ascending or descending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Core property name, e.g. `name` or `lastModifiedTimestamp`
    pub property: String,
    pub ascending: bool,
}

impl OrderBy {
    pub fn ascending(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ascending: true,
        }
    }

    pub fn descending(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ascending: false,
        }
    }
}

/// Compiles query ASTs into structural queries
pub struct QueryCompiler<'a> {
    resolver: &'a dyn ClassificationResolver,
    config: CompilerConfig,
}

impl<'a> QueryCompiler<'a> {
    /// Create a compiler with the default configuration
    pub fn new(resolver: &'a dyn ClassificationResolver) -> Self {
        Self::with_config(resolver, CompilerConfig::default())
    }

    pub fn with_config(resolver: &'a dyn ClassificationResolver, config: CompilerConfig) -> Self {
        Self { resolver, config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile `query` without ordering
    pub fn compile(&self, query: &Query) -> Result<Compilation, CompileError> {
        self.compile_with_order(query, None)
    }

    /// Compile `query`, ordering results by `order` when given
    ///
    /// Structural and unsupported-construct errors are returned here.
    /// Resolution and value errors are carried by the [`Compilation`] and
    /// reported by [`Compilation::build_query`].
    pub fn compile_with_order(
        &self,
        query: &Query,
        order: Option<&OrderBy>,
    ) -> Result<Compilation, CompileError> {
        QueryValidator::validate(query)?;
        let built = QueryBuilder::build(&self.config, self.resolver, query)?;

        let ordering = order.map(|order| Ordering {
            operand: PropertyValue::new(
                built.output_selector.as_str(),
                properties::core_column(&order.property),
            ),
            ascending: order.ascending,
        });

        if !built.deferred.is_empty() {
            log::warn!(
                "Query compiled with {} deferred error(s); first: {}",
                built.deferred.len(),
                built.deferred[0]
            );
        }

        Ok(Compilation {
            source: built.source,
            constraints: built.constraints,
            output_selector: built.output_selector,
            ordering,
            errors: built.deferred,
        })
    }
}

/// Result of compiling one query, before finalization
#[derive(Debug, Clone)]
pub struct Compilation {
    source: Source,
    constraints: Vec<Constraint>,
    output_selector: String,
    ordering: Option<Ordering>,
    errors: Vec<CompileError>,
}

impl Compilation {
    /// Deferred errors, in the order they were found
    pub fn errors(&self) -> &[CompileError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Top-level constraints, before they are AND-ed together
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn output_selector(&self) -> &str {
        &self.output_selector
    }

    /// Assemble the executable query, or report the first deferred error
    pub fn build_query(self) -> Result<CompiledQuery, CompileError> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }

        let columns = vec![Column::new(self.output_selector.as_str(), UUID)];
        let mut query = StructuralQuery::new(self.source, and_all(self.constraints), columns);
        if let Some(ordering) = &self.ordering {
            query = query.with_ordering(ordering.clone());
        }

        Ok(CompiledQuery {
            query,
            output_selector: self.output_selector,
            order: self.ordering,
        })
    }
}

/// A finalized query ready for the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledQuery {
    pub query: StructuralQuery,
    /// Selector whose identity column is the result
    pub output_selector: String,
    pub order: Option<Ordering>,
}

impl CompiledQuery {
    /// Render as JCR-SQL2 text
    pub fn to_sql2(&self) -> String {
        Sql2Renderer::new().render(&self.query)
    }
}
