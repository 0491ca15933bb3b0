// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Built-in function calls
//!
//! | Function | Namespace | Compiles to |
//! |---|---|---|
//! | `classifiedByAnyOf(., c...)` / `classifiedByAllOf` | s-ramp | OR / AND of normalized classification equalities |
//! | `exactlyClassifiedByAnyOf(., c...)` / `exactlyClassifiedByAllOf` | s-ramp | OR / AND of direct classification equalities |
//! | `getRelationshipAttribute(., k)` / `getTargetAttribute(., k)` | s-ramp | a relationship / target attribute column |
//! | `matches(., p)` / `matches(@prop, p)` | fn | full-text search / LIKE |
//! | `not(expr)` | fn | NOT of the compiled expression |

use std::collections::BTreeSet;

use super::query_builder::QueryBuilder;
use super::CompileResult;
use crate::ast::validator::is_ncname;
use crate::ast::{Argument, FunctionCall};
use crate::error::CompileError;
use crate::plan::context::{and_all, or_all, Scope};
use crate::plan::structural::{Constraint, JoinType, Operator, PropertyValue, Selector, Value};
use crate::schema::namespaces::{SRAMP_NS, XPATH_FN_NS};
use crate::schema::properties::{self, CLASSIFIED_BY, CONTENT_NODE, NORMALIZED_CLASSIFIED_BY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    ClassifiedByAnyOf,
    ClassifiedByAllOf,
    ExactlyClassifiedByAnyOf,
    ExactlyClassifiedByAllOf,
    GetRelationshipAttribute,
    GetTargetAttribute,
    Matches,
    Not,
}

impl Builtin {
    fn is_attribute(&self) -> bool {
        matches!(self, Builtin::GetRelationshipAttribute | Builtin::GetTargetAttribute)
    }
}

impl<'a> QueryBuilder<'a> {
    /// Compile a function call in constraint position
    pub(super) fn compile_function(
        &mut self,
        call: &FunctionCall,
        scope: &Scope,
    ) -> CompileResult<Vec<Constraint>> {
        let builtin = self.identify(call)?;
        log::trace!("Compiling function {:?}", builtin);
        match builtin {
            Builtin::ClassifiedByAnyOf => {
                self.compile_classification(call, scope, NORMALIZED_CLASSIFIED_BY, true)
            }
            Builtin::ClassifiedByAllOf => {
                self.compile_classification(call, scope, NORMALIZED_CLASSIFIED_BY, false)
            }
            Builtin::ExactlyClassifiedByAnyOf => {
                self.compile_classification(call, scope, CLASSIFIED_BY, true)
            }
            Builtin::ExactlyClassifiedByAllOf => {
                self.compile_classification(call, scope, CLASSIFIED_BY, false)
            }
            // A bare attribute function tests that the attribute is present
            Builtin::GetRelationshipAttribute | Builtin::GetTargetAttribute => {
                let operand = self.attribute_column(call, builtin, scope)?;
                Ok(vec![Constraint::PropertyExistence(operand)])
            }
            Builtin::Matches => self.compile_matches(call, scope),
            Builtin::Not => self.compile_not(call, scope),
        }
    }

    /// Resolve a function used as the left-hand side of a comparison
    pub(super) fn resolve_attribute_operand(
        &mut self,
        call: &FunctionCall,
        scope: &Scope,
    ) -> CompileResult<PropertyValue> {
        let builtin = self.identify(call)?;
        if !builtin.is_attribute() {
            return Err(CompileError::FunctionAsOperand(call.function_name.local_part.clone()));
        }
        self.attribute_column(call, builtin, scope)
    }

    fn identify(&self, call: &FunctionCall) -> CompileResult<Builtin> {
        let name = &call.function_name;
        let local = name.local_part.as_str();
        let builtin = match self.namespace_of(name) {
            Some(SRAMP_NS) => match local {
                "classifiedByAnyOf" => Builtin::ClassifiedByAnyOf,
                "classifiedByAllOf" => Builtin::ClassifiedByAllOf,
                "exactlyClassifiedByAnyOf" => Builtin::ExactlyClassifiedByAnyOf,
                "exactlyClassifiedByAllOf" => Builtin::ExactlyClassifiedByAllOf,
                "getRelationshipAttribute" => Builtin::GetRelationshipAttribute,
                "getTargetAttribute" => Builtin::GetTargetAttribute,
                "matches" | "not" => {
                    return Err(CompileError::WrongFunctionNamespace(local.to_string()))
                }
                _ => return Err(CompileError::UnknownFunction(local.to_string())),
            },
            Some(XPATH_FN_NS) => match local {
                "matches" => Builtin::Matches,
                "not" => Builtin::Not,
                _ => return Err(CompileError::UnknownFunction(name.to_string())),
            },
            _ => return Err(CompileError::UnknownFunction(name.to_string())),
        };
        Ok(builtin)
    }

    fn compile_classification(
        &mut self,
        call: &FunctionCall,
        scope: &Scope,
        column: &str,
        any_of: bool,
    ) -> CompileResult<Vec<Constraint>> {
        let function = &call.function_name.local_part;
        if call.arguments.len() < 2 {
            return Err(CompileError::ArgumentCount {
                function: function.clone(),
                expected: "at least 2".to_string(),
                found: call.arguments.len(),
            });
        }

        // The first argument is the receiver
        let names = call.arguments[1..]
            .iter()
            .map(|arg| {
                arg.as_literal()
                    .map(str::to_string)
                    .ok_or_else(|| CompileError::ExpectedStringLiteral {
                        function: function.clone(),
                    })
            })
            .collect::<CompileResult<BTreeSet<_>>>()?;

        let identifiers = match self.resolver.resolve_all(&names) {
            Ok(identifiers) => identifiers,
            Err(e) => {
                self.state.defer(e.into());
                return Ok(Vec::new());
            }
        };

        let equalities: Vec<_> = identifiers
            .into_iter()
            .map(|id| Constraint::equal_to(&scope.selector, column, id))
            .collect();
        let folded = if any_of {
            or_all(equalities)
        } else {
            and_all(equalities)
        };
        Ok(folded.into_iter().collect())
    }

    fn attribute_column(
        &self,
        call: &FunctionCall,
        builtin: Builtin,
        scope: &Scope,
    ) -> CompileResult<PropertyValue> {
        let function = &call.function_name.local_part;
        if call.arguments.len() != 2 {
            return Err(CompileError::ArgumentCount {
                function: function.clone(),
                expected: "2".to_string(),
                found: call.arguments.len(),
            });
        }
        let key = call.arguments[1]
            .as_literal()
            .ok_or_else(|| CompileError::ExpectedStringLiteral {
                function: function.clone(),
            })?;
        // The key becomes part of a column name
        if !is_ncname(key) {
            return Err(CompileError::InvalidAttributeKey {
                function: function.clone(),
                key: key.to_string(),
            });
        }

        let selector = match builtin {
            Builtin::GetRelationshipAttribute => scope.relationship.as_ref(),
            _ => scope.target.as_ref(),
        };
        let selector =
            selector.ok_or_else(|| CompileError::AttributeOutsideRelationship(function.clone()))?;
        Ok(PropertyValue::new(
            selector.as_str(),
            properties::other_attribute_column(key),
        ))
    }

    fn compile_matches(&mut self, call: &FunctionCall, scope: &Scope) -> CompileResult<Vec<Constraint>> {
        let function = &call.function_name.local_part;
        let [receiver, pattern] = call.arguments.as_slice() else {
            return Err(CompileError::ArgumentCount {
                function: function.clone(),
                expected: "2".to_string(),
                found: call.arguments.len(),
            });
        };
        let pattern = pattern
            .as_literal()
            .ok_or_else(|| CompileError::ExpectedStringLiteral {
                function: function.clone(),
            })?;

        if receiver.is_context_item() {
            return Ok(vec![self.full_text_search(scope, pattern)]);
        }

        let step = receiver
            .as_property_step()
            .ok_or_else(|| CompileError::ExpectedProperty {
                function: function.clone(),
            })?;
        let operand = self.resolve_property(step, &scope.selector)?;
        let like = pattern.replace(&self.config.wildcard_token, &self.config.backend_wildcard);
        Ok(vec![Constraint::comparison(
            operand,
            Operator::Like,
            Value::String(like),
        )])
    }

    /// Search artifact metadata or, when enabled, the artifact's content child
    fn full_text_search(&mut self, scope: &Scope, pattern: &str) -> Constraint {
        let metadata = Constraint::full_text_search(&scope.selector, pattern);
        if !self.config.search_content {
            return metadata;
        }

        // One content join per artifact selector in the current frame
        let content = match self.state.frame.content_selector(&scope.selector) {
            Some(alias) => alias.to_string(),
            None => {
                let alias = self.state.aliases.next_content();
                self.state.frame.join_child(
                    Selector::new(CONTENT_NODE, alias.clone()),
                    &scope.selector,
                    JoinType::LeftOuter,
                );
                self.state
                    .frame
                    .set_content_selector(scope.selector.as_str(), alias.clone());
                alias
            }
        };
        Constraint::or(metadata, Constraint::full_text_search(&content, pattern))
    }

    fn compile_not(&mut self, call: &FunctionCall, scope: &Scope) -> CompileResult<Vec<Constraint>> {
        let [argument] = call.arguments.as_slice() else {
            return Err(CompileError::ArgumentCount {
                function: call.function_name.local_part.clone(),
                expected: "1".to_string(),
                found: call.arguments.len(),
            });
        };
        match argument {
            Argument::Expr(expr) => {
                let inner = self.compile_expr(expr, scope)?;
                Ok(and_all(inner).map(Constraint::not).into_iter().collect())
            }
            Argument::Primary(_) => Err(CompileError::NotRequiresExpr),
        }
    }
}
