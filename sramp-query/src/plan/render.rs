// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! JCR-SQL2 renderer
//!
//! Renders a [`StructuralQuery`] as JCR-SQL2 text. Used for logging and for
//! backends that accept query strings rather than query objects.

use std::fmt::Write;

use crate::plan::structural::{
    Column, Constraint, JoinCondition, JoinType, Ordering, PropertyValue, Source, StructuralQuery,
    Value,
};

/// Binding strength of a rendered constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Or,
    And,
    Atom,
}

/// Renders structural queries to JCR-SQL2
#[derive(Debug, Clone)]
pub struct Sql2Renderer {
    /// chrono format used for date literals inside `CAST(... AS DATE)`
    pub date_format: String,
}

impl Default for Sql2Renderer {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%dT00:00:00.000Z".to_string(),
        }
    }
}

impl Sql2Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self, query: &StructuralQuery) -> String {
        let mut out = String::new();
        self.write_query(&mut out, query);
        out
    }

    fn write_query(&self, out: &mut String, query: &StructuralQuery) {
        out.push_str("SELECT ");
        if query.columns.is_empty() {
            out.push('*');
        }
        for (i, column) in query.columns.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_column(out, column);
        }

        out.push_str(" FROM ");
        write_source(out, &query.source);

        if let Some(constraint) = &query.constraint {
            out.push_str(" WHERE ");
            self.write_constraint(out, constraint, Precedence::Or);
        }

        if !query.orderings.is_empty() {
            out.push_str(" ORDER BY ");
            for (i, ordering) in query.orderings.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_ordering(out, ordering);
            }
        }
    }

    fn write_constraint(&self, out: &mut String, constraint: &Constraint, context: Precedence) {
        match constraint {
            Constraint::Comparison {
                operand,
                operator,
                value,
            } => {
                write_operand(out, operand);
                let _ = write!(out, " {} ", operator.symbol());
                self.write_value(out, value);
            }
            Constraint::PropertyExistence(operand) => {
                write_operand(out, operand);
                out.push_str(" IS NOT NULL");
            }
            Constraint::FullTextSearch {
                selector,
                property,
                expression,
            } => {
                let _ = write!(out, "CONTAINS({}.", selector);
                match property {
                    Some(property) => {
                        let _ = write!(out, "[{}]", property);
                    }
                    None => out.push('*'),
                }
                out.push_str(", ");
                write_string(out, expression);
                out.push(')');
            }
            Constraint::InList { operand, values } => {
                write_operand(out, operand);
                out.push_str(" IN (");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_value(out, value);
                }
                out.push(')');
            }
            Constraint::InSubquery { operand, subquery } => {
                write_operand(out, operand);
                out.push_str(" IN (");
                self.write_query(out, subquery);
                out.push(')');
            }
            Constraint::DescendantNode {
                selector,
                ancestor_path,
            } => {
                let _ = write!(out, "ISDESCENDANTNODE({}, ", selector);
                write_string(out, ancestor_path);
                out.push(')');
            }
            Constraint::And(left, right) => {
                self.write_binary(out, left, right, "AND", Precedence::And, context)
            }
            Constraint::Or(left, right) => {
                self.write_binary(out, left, right, "OR", Precedence::Or, context)
            }
            Constraint::Not(inner) => {
                out.push_str("NOT (");
                self.write_constraint(out, inner, Precedence::Or);
                out.push(')');
            }
        }
    }

    fn write_binary(
        &self,
        out: &mut String,
        left: &Constraint,
        right: &Constraint,
        keyword: &str,
        own: Precedence,
        context: Precedence,
    ) {
        let wrap = context > own;
        if wrap {
            out.push('(');
        }
        self.write_constraint(out, left, own);
        let _ = write!(out, " {} ", keyword);
        self.write_constraint(out, right, own);
        if wrap {
            out.push(')');
        }
    }

    fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            Value::String(text) => write_string(out, text),
            Value::Long(n) => {
                let _ = write!(out, "{}", n);
            }
            Value::Double(n) => {
                let _ = write!(out, "{:?}", n);
            }
            Value::Date(date) => {
                out.push_str("CAST(");
                write_string(out, &date.format(&self.date_format).to_string());
                out.push_str(" AS DATE)");
            }
        }
    }
}

fn write_operand(out: &mut String, operand: &PropertyValue) {
    let _ = write!(out, "{}.[{}]", operand.selector, operand.property);
}

fn write_string(out: &mut String, text: &str) {
    out.push('\'');
    out.push_str(&text.replace('\'', "''"));
    out.push('\'');
}

fn write_column(out: &mut String, column: &Column) {
    match &column.property {
        Some(property) => {
            let _ = write!(out, "{}.[{}]", column.selector, property);
        }
        None => {
            let _ = write!(out, "{}.*", column.selector);
        }
    }
    if let Some(alias) = &column.alias {
        let _ = write!(out, " AS {}", alias);
    }
}

fn write_source(out: &mut String, source: &Source) {
    match source {
        Source::Selector(selector) => {
            let _ = write!(out, "[{}] AS {}", selector.node_type, selector.alias);
        }
        Source::Join {
            left,
            join_type,
            right,
            condition,
        } => {
            write_source(out, left);
            let keyword = match join_type {
                JoinType::Inner => "INNER JOIN",
                JoinType::LeftOuter => "LEFT OUTER JOIN",
            };
            let _ = write!(
                out,
                " {} [{}] AS {} ON ",
                keyword, right.node_type, right.alias
            );
            match condition {
                JoinCondition::Equi {
                    left_selector,
                    left_property,
                    right_selector,
                    right_property,
                } => {
                    let _ = write!(
                        out,
                        "{}.[{}] = {}.[{}]",
                        left_selector, left_property, right_selector, right_property
                    );
                }
                JoinCondition::ChildNode { child, parent } => {
                    let _ = write!(out, "ISCHILDNODE({}, {})", child, parent);
                }
            }
        }
    }
}

fn write_ordering(out: &mut String, ordering: &Ordering) {
    write_operand(out, &ordering.operand);
    out.push_str(if ordering.ascending { " ASC" } else { " DESC" });
}
