// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query builder - compiles a query AST into structural query parts
//!
//! Each compile function returns the constraints its subtree produced, so
//! boolean connectives fold exactly what their operands returned. Fatal
//! errors propagate with `?`; resolution and value errors are deferred into
//! the [`CompileState`] and the offending leaf contributes no constraint.

use chrono::NaiveDate;

use super::CompileResult;
use crate::ast::{
    AndExpr, ComparisonOperator, EqualityExpr, Expr, ForwardPropertyStep, LocationPath, Number,
    Operand, OrExpr, Predicate, PrimaryExpr, QName, Query, SubartifactSet,
};
use crate::classification::ClassificationResolver;
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::plan::context::{and_all, or_all, AliasGenerator, CompileState, Scope, SourceFrame};
use crate::plan::structural::{Constraint, Operator, PropertyValue, Selector, Source, Value};
use crate::schema::artifact_type::{self, EXTENDED_ARTIFACT_TYPE, EXTENDED_DOCUMENT, EXTENDED_MODEL};
use crate::schema::namespaces::SRAMP_NS;
use crate::schema::properties::{self, ARTIFACT_MODEL, ARTIFACT_TYPE, BASE_ARTIFACT_TYPE, EXTENDED_TYPE};

/// Output of one compilation, before finalization
#[derive(Debug)]
pub struct BuiltQuery {
    pub source: Source,
    /// Top-level constraints, to be AND-ed
    pub constraints: Vec<Constraint>,
    /// Selector whose artifacts form the result set
    pub output_selector: String,
    /// Selector of the artifact set named by the location path
    pub primary_selector: String,
    /// Non-fatal errors, in the order they were found
    pub deferred: Vec<CompileError>,
}

/// Builder for structural queries; one instance per compilation
pub struct QueryBuilder<'a> {
    pub(super) config: &'a CompilerConfig,
    pub(super) resolver: &'a dyn ClassificationResolver,
    pub(super) state: CompileState,
}

impl<'a> QueryBuilder<'a> {
    /// Compile `query` with fresh state
    pub fn build(
        config: &'a CompilerConfig,
        resolver: &'a dyn ClassificationResolver,
        query: &Query,
    ) -> CompileResult<BuiltQuery> {
        let mut aliases = AliasGenerator::new();
        let primary = aliases.next_artifact();
        let frame = SourceFrame::new(Selector::new(BASE_ARTIFACT_TYPE, primary.clone()));
        let builder = Self {
            config,
            resolver,
            state: CompileState::new(aliases, frame),
        };
        builder.compile_query(query, primary)
    }

    fn compile_query(mut self, query: &Query, primary: String) -> CompileResult<BuiltQuery> {
        let mut constraints =
            self.compile_location_path(&query.artifact_set.location_path, &primary);

        let mut output = Scope::artifact(primary.clone());
        if let Some(predicate) = &query.predicate {
            constraints.extend(self.compile_predicate(predicate, &output)?);
        }
        if let Some(subartifact_set) = &query.subartifact_set {
            output = self.compile_relationship_step(subartifact_set, &primary, &mut constraints)?;
        }

        // Trashed artifacts live outside the root
        constraints.push(Constraint::descendant_node(&primary, &self.config.root_path));

        log::debug!(
            "Compiled query: {} top-level constraints, output selector {}",
            constraints.len(),
            output.selector
        );

        let (source, deferred) = self.state.into_parts();
        Ok(BuiltQuery {
            source,
            constraints,
            output_selector: output.selector,
            primary_selector: primary,
            deferred,
        })
    }

    /// Narrow the primary selector to the artifact model and type
    fn compile_location_path(&self, path: &LocationPath, selector: &str) -> Vec<Constraint> {
        match (&path.artifact_model, &path.artifact_type) {
            (model, Some(type_name)) => {
                let known = artifact_type::lookup(type_name)
                    .filter(|_| model.as_deref() != Some(EXTENDED_MODEL));
                match known {
                    Some(known) => {
                        let model = model.as_deref().unwrap_or(known.model);
                        vec![
                            Constraint::equal_to(selector, ARTIFACT_MODEL, model),
                            Constraint::equal_to(selector, ARTIFACT_TYPE, type_name.as_str()),
                        ]
                    }
                    None => {
                        log::trace!("Treating '{}' as an extended artifact type", type_name);
                        vec![
                            Constraint::in_list(
                                selector,
                                ARTIFACT_TYPE,
                                vec![EXTENDED_ARTIFACT_TYPE.into(), EXTENDED_DOCUMENT.into()],
                            ),
                            Constraint::equal_to(selector, EXTENDED_TYPE, type_name.as_str()),
                        ]
                    }
                }
            }
            (Some(model), None) => vec![Constraint::equal_to(selector, ARTIFACT_MODEL, model.as_str())],
            (None, None) => Vec::new(),
        }
    }

    pub(super) fn compile_predicate(
        &mut self,
        predicate: &Predicate,
        scope: &Scope,
    ) -> CompileResult<Vec<Constraint>> {
        self.compile_expr(&predicate.expr, scope)
    }

    pub(super) fn compile_expr(&mut self, expr: &Expr, scope: &Scope) -> CompileResult<Vec<Constraint>> {
        self.compile_and(&expr.and_expr, scope)
    }

    fn compile_and(&mut self, node: &AndExpr, scope: &Scope) -> CompileResult<Vec<Constraint>> {
        let Some(right) = &node.right else {
            return self.compile_or(&node.left, scope);
        };
        let mut items = self.compile_or(&node.left, scope)?;
        items.extend(self.compile_and(right, scope)?);
        Ok(and_all(items).into_iter().collect())
    }

    fn compile_or(&mut self, node: &OrExpr, scope: &Scope) -> CompileResult<Vec<Constraint>> {
        let Some(right) = &node.right else {
            return self.compile_equality(&node.left, scope);
        };
        let mut items = self.compile_equality(&node.left, scope)?;
        items.extend(self.compile_or(right, scope)?);
        Ok(or_all(items).into_iter().collect())
    }

    fn compile_equality(&mut self, node: &EqualityExpr, scope: &Scope) -> CompileResult<Vec<Constraint>> {
        match node {
            EqualityExpr::SubartifactSet(set) => self.compile_nested_subartifact_set(set, scope),
            EqualityExpr::Grouped(expr) => self.compile_expr(expr, scope),
            EqualityExpr::Comparison {
                left,
                operator,
                right,
            } => {
                let operand = self.resolve_operand(left, scope)?;
                let comparison = self
                    .resolve_value(right, &operand.property)?
                    .map(|value| Constraint::comparison(operand, map_operator(*operator), value));
                Ok(comparison.into_iter().collect())
            }
            EqualityExpr::Exists(Operand::Property(step)) => {
                let operand = self.resolve_property(step, &scope.selector)?;
                Ok(vec![Constraint::PropertyExistence(operand)])
            }
            EqualityExpr::Exists(Operand::Function(call)) => self.compile_function(call, scope),
        }
    }

    /// A subartifact set inside a predicate: a function or a relationship sub-predicate
    fn compile_nested_subartifact_set(
        &mut self,
        set: &SubartifactSet,
        scope: &Scope,
    ) -> CompileResult<Vec<Constraint>> {
        match set {
            SubartifactSet::Function(call) => self.compile_function(call, scope),
            SubartifactSet::Relationship {
                subartifact_set: Some(_),
                ..
            } => Err(CompileError::MultiLevelSubartifactSet),
            SubartifactSet::Relationship {
                path,
                predicate,
                subartifact_set: None,
            } => {
                let constraint =
                    self.compile_relationship_predicate(path, predicate.as_ref(), scope)?;
                Ok(vec![constraint])
            }
        }
    }

    fn resolve_operand(&mut self, operand: &Operand, scope: &Scope) -> CompileResult<PropertyValue> {
        match operand {
            Operand::Property(step) => self.resolve_property(step, &scope.selector),
            Operand::Function(call) => self.resolve_attribute_operand(call, scope),
        }
    }

    /// Map a property step to a column of `selector`
    pub(super) fn resolve_property(
        &self,
        step: &ForwardPropertyStep,
        selector: &str,
    ) -> CompileResult<PropertyValue> {
        let qname = &step.property_qname;
        match self.namespace_of(qname) {
            Some(namespace) if namespace != SRAMP_NS => {
                Err(CompileError::ForeignPropertyNamespace(namespace.to_string()))
            }
            Some(_) => Ok(PropertyValue::new(selector, properties::core_column(&qname.local_part))),
            None => Err(CompileError::ForeignPropertyNamespace(
                qname.prefix().unwrap_or_default().to_string(),
            )),
        }
    }

    /// Namespace URI of a qualified name; unqualified names are in the default namespace
    ///
    /// Returns `None` for a prefix that is not bound.
    pub(super) fn namespace_of<'q>(&'q self, qname: &'q QName) -> Option<&'q str> {
        let namespaces = &self.config.namespaces;
        if let Some(namespace) = qname.namespace_uri() {
            return Some(namespace);
        }
        match qname.prefix() {
            Some(prefix) => namespaces.namespace_uri(prefix),
            None => namespaces.default_namespace(),
        }
    }

    /// Turn a primary expression into a typed value for `column`
    ///
    /// Date literals only need to start with a date; a trailing time and
    /// offset (`2013-04-15T10:20:30+02:00`) is ignored. Parse failures are
    /// deferred and yield `None`.
    fn resolve_value(&mut self, primary: &PrimaryExpr, column: &str) -> CompileResult<Option<Value>> {
        match primary {
            PrimaryExpr::Literal(literal) if properties::is_date_column(column) => {
                match NaiveDate::parse_and_remainder(literal, &self.config.date_format) {
                    Ok((date, _time)) => Ok(Some(Value::Date(date))),
                    Err(e) => {
                        self.state.defer(CompileError::InvalidValue {
                            literal: literal.clone(),
                            property: column.to_string(),
                            reason: e.to_string(),
                        });
                        Ok(None)
                    }
                }
            }
            PrimaryExpr::Literal(literal) => Ok(Some(Value::String(literal.clone()))),
            PrimaryExpr::Number(Number::Integer(i)) => Ok(Some(Value::Long(*i))),
            PrimaryExpr::Number(Number::Decimal(d)) => Ok(Some(Value::Double(*d))),
            PrimaryExpr::PropertyRef(qname) => Err(CompileError::PropertyAsValue(qname.to_string())),
        }
    }
}

fn map_operator(operator: ComparisonOperator) -> Operator {
    match operator {
        ComparisonOperator::Equal => Operator::EqualTo,
        ComparisonOperator::NotEqual => Operator::NotEqualTo,
        ComparisonOperator::LessThan => Operator::LessThan,
        ComparisonOperator::LessThanOrEqual => Operator::LessThanOrEqualTo,
        ComparisonOperator::GreaterThan => Operator::GreaterThan,
        ComparisonOperator::GreaterThanOrEqual => Operator::GreaterThanOrEqualTo,
        ComparisonOperator::Like => Operator::Like,
    }
}
