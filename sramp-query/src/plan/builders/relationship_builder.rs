// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Relationship traversal
//!
//! Two shapes are supported:
//!
//! - A top-level step (`/s-ramp/wsdl/WsdlDocument/wsdlService[...]`) joins
//!   artifact → relationship → target → artifact and makes the last artifact
//!   selector the output of the query.
//! - A relationship inside a predicate (`/s-ramp/core/Document[relatedTo[...]]`)
//!   asks whether the artifact owns such a relationship. The backend has no
//!   correlated subqueries, so this becomes an uncorrelated derived table
//!   selecting the owners of every matching relationship:
//!
//! ```text
//! artifact1.[jcr:uuid] IN (
//!   SELECT artifact3.[jcr:uuid] AS uuid FROM [sramp:relationship] AS relationship1
//!   INNER JOIN [sramp:target] AS target1 ON ISCHILDNODE(target1, relationship1)
//!   INNER JOIN [sramp:baseArtifactType] AS artifact2 ON target1.[sramp:targetArtifact] = artifact2.[jcr:uuid]
//!   INNER JOIN [sramp:baseArtifactType] AS artifact3 ON ISCHILDNODE(relationship1, artifact3)
//!   WHERE relationship1.[sramp:relationshipType] = '...' AND <predicate on artifact2> AND ...)
//! ```

use super::query_builder::QueryBuilder;
use super::CompileResult;
use crate::ast::{Predicate, RelationshipPath, SubartifactSet};
use crate::error::CompileError;
use crate::plan::context::{and_all, Scope, SourceFrame};
use crate::plan::structural::{Column, Constraint, JoinType, Selector, StructuralQuery};
use crate::schema::properties::{
    BASE_ARTIFACT_TYPE, RELATIONSHIP_NODE, RELATIONSHIP_TYPE, TARGET_ARTIFACT, TARGET_NODE, UUID,
};

/// Column alias of the derived table's owner identity
const OWNER_COLUMN: &str = "uuid";

impl<'a> QueryBuilder<'a> {
    /// Compile the top-level `/relationship[predicate]` step
    ///
    /// Returns the scope of the relationship targets, which become the output.
    pub(super) fn compile_relationship_step(
        &mut self,
        set: &SubartifactSet,
        primary: &str,
        constraints: &mut Vec<Constraint>,
    ) -> CompileResult<Scope> {
        let (path, predicate) = match set {
            SubartifactSet::Function(call) => {
                return Err(CompileError::FunctionAsSubartifactSet(
                    call.function_name.local_part.clone(),
                ))
            }
            SubartifactSet::Relationship {
                subartifact_set: Some(_),
                ..
            } => return Err(CompileError::MultiLevelSubartifactSet),
            SubartifactSet::Relationship {
                path, predicate, ..
            } => (path, predicate),
        };

        let relationship = self.state.aliases.next_relationship();
        let target = self.state.aliases.next_target();
        let artifact = self.state.aliases.next_artifact();

        let frame = &mut self.state.frame;
        frame.join_child(
            Selector::new(RELATIONSHIP_NODE, relationship.clone()),
            primary,
            JoinType::Inner,
        );
        frame.join_child(
            Selector::new(TARGET_NODE, target.clone()),
            &relationship,
            JoinType::Inner,
        );
        constraints.push(Constraint::equal_to(
            &relationship,
            RELATIONSHIP_TYPE,
            path.relationship_type.as_str(),
        ));
        frame.join_eq(
            Selector::new(BASE_ARTIFACT_TYPE, artifact.clone()),
            &target,
            TARGET_ARTIFACT,
            UUID,
        );

        log::debug!(
            "Pivoting output to {} via relationship '{}'",
            artifact,
            path.relationship_type
        );

        let scope = Scope::relationship(artifact, relationship, target);
        if let Some(predicate) = predicate {
            constraints.extend(self.compile_predicate(predicate, &scope)?);
        }
        Ok(scope)
    }

    /// Compile a relationship sub-predicate into `owner IN (derived table)`
    pub(super) fn compile_relationship_predicate(
        &mut self,
        path: &RelationshipPath,
        predicate: Option<&Predicate>,
        scope: &Scope,
    ) -> CompileResult<Constraint> {
        let relationship = self.state.aliases.next_relationship();
        let saved = self.state.enter_frame(SourceFrame::new(Selector::new(
            RELATIONSHIP_NODE,
            relationship.clone(),
        )));

        let derived = self.build_derived_table(path, predicate, &relationship);
        // Restore the enclosing source even when the derived table failed
        let frame = self.state.leave_frame(saved);
        let (constraints, owner) = derived?;

        let subquery = StructuralQuery::new(
            frame.into_source(),
            and_all(constraints),
            vec![Column::new(owner, UUID).with_alias(OWNER_COLUMN)],
        );
        Ok(Constraint::in_subquery(&scope.selector, UUID, subquery))
    }

    /// Fill the active frame with the derived table joins; returns its constraints and owner selector
    fn build_derived_table(
        &mut self,
        path: &RelationshipPath,
        predicate: Option<&Predicate>,
        relationship: &str,
    ) -> CompileResult<(Vec<Constraint>, String)> {
        let mut constraints = vec![Constraint::equal_to(
            relationship,
            RELATIONSHIP_TYPE,
            path.relationship_type.as_str(),
        )];

        if let Some(predicate) = predicate {
            // The predicate applies to the artifact the relationship points at
            let artifact = self.state.aliases.next_artifact();
            let target = self.state.aliases.next_target();
            self.state.frame.join_child(
                Selector::new(TARGET_NODE, target.clone()),
                relationship,
                JoinType::Inner,
            );
            self.state.frame.join_eq(
                Selector::new(BASE_ARTIFACT_TYPE, artifact.clone()),
                &target,
                TARGET_ARTIFACT,
                UUID,
            );
            let inner = Scope::relationship(artifact, relationship, target);
            constraints.extend(self.compile_predicate(predicate, &inner)?);
        }

        constraints.push(Constraint::descendant_node(
            relationship,
            &self.config.root_path,
        ));

        let owner = self.state.aliases.next_artifact();
        self.state.frame.join_parent(
            Selector::new(BASE_ARTIFACT_TYPE, owner.clone()),
            relationship,
        );
        Ok((constraints, owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{EqualityExpr, Expr, Query};
    use crate::classification::InMemoryClassificationResolver;
    use crate::config::CompilerConfig;
    use crate::plan::builders::BuiltQuery;
    use crate::plan::structural::{JoinCondition, Source};

    fn build(query: &Query) -> CompileResult<BuiltQuery> {
        let config = CompilerConfig::default();
        let resolver = InMemoryClassificationResolver::new();
        QueryBuilder::build(&config, &resolver, query)
    }

    fn subquery(constraint: &Constraint) -> &StructuralQuery {
        match constraint {
            Constraint::InSubquery { subquery, .. } => &**subquery,
            other => panic!("expected IN subquery, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_relationship_predicate() {
        let query = Query::of_type("core", "Document").with_predicate(Predicate::new(
            EqualityExpr::subartifact_set(SubartifactSet::relationship("relatedDocument")),
        ));
        let built = build(&query).unwrap();

        // Outer source is untouched by the derived table
        assert_eq!(built.source, Source::selector(BASE_ARTIFACT_TYPE, "artifact1"));

        let derived = subquery(&built.constraints[2]);
        let aliases: Vec<_> = derived
            .source
            .selectors()
            .iter()
            .map(|s| s.alias.clone())
            .collect();
        assert_eq!(aliases, vec!["relationship1", "artifact2"]);
        assert_eq!(
            derived.conjuncts(),
            vec![
                &Constraint::equal_to("relationship1", RELATIONSHIP_TYPE, "relatedDocument"),
                &Constraint::descendant_node("relationship1", "/s-ramp"),
            ]
        );
        assert_eq!(
            derived.columns,
            vec![Column::new("artifact2", UUID).with_alias("uuid")]
        );
    }

    #[test]
    fn test_relationship_predicate_with_target_condition() {
        let inner = Predicate::new(EqualityExpr::property_equals("name", "Foo"));
        let query = Query::of_type("wsdl", "WsdlDocument").with_predicate(Predicate::new(
            EqualityExpr::subartifact_set(SubartifactSet::relationship_where("wsdlService", inner)),
        ));
        let built = build(&query).unwrap();
        let derived = subquery(&built.constraints[2]);

        let Source::Join {
            left, condition, ..
        } = &derived.source
        else {
            panic!("expected a join");
        };
        assert_eq!(
            *condition,
            JoinCondition::child_node("relationship1", "artifact3")
        );
        assert_eq!(left.join_count(), 2);
        assert_eq!(
            derived.conjuncts()[1],
            &Constraint::equal_to("artifact2", "sramp:name", "Foo")
        );
    }

    #[test]
    fn test_relationship_attribute_inside_predicate() {
        let attribute = crate::ast::FunctionCall::new(
            crate::ast::QName::new(
                crate::schema::namespaces::SRAMP_NS,
                "getRelationshipAttribute",
                "s-ramp",
            ),
            vec![
                crate::ast::Argument::context_item(),
                crate::ast::Argument::literal("primary"),
            ],
        );
        let inner = Predicate::new(Expr::and(
            EqualityExpr::comparison(attribute, crate::ast::ComparisonOperator::Equal, "true"),
            EqualityExpr::property_equals("name", "Foo"),
        ));
        let query = Query::all().with_predicate(Predicate::new(EqualityExpr::subartifact_set(
            SubartifactSet::relationship_where("includedXsds", inner),
        )));
        let built = build(&query).unwrap();
        let derived = subquery(&built.constraints[0]);

        assert_eq!(
            derived.conjuncts()[1],
            &Constraint::equal_to(
                "relationship1",
                "sramp-otherAttributes:primary",
                "true"
            )
        );
    }

    #[test]
    fn test_top_level_errors() {
        let nested = Query::of_type("wsdl", "WsdlDocument").with_subartifact_set(
            SubartifactSet::relationship("wsdlService").then(SubartifactSet::relationship("port")),
        );
        assert_eq!(
            build(&nested).unwrap_err(),
            CompileError::MultiLevelSubartifactSet
        );

        let function = Query::all().with_subartifact_set(SubartifactSet::Function(
            crate::ast::FunctionCall::new(crate::ast::QName::local("classifiedByAnyOf"), vec![]),
        ));
        assert_eq!(
            build(&function).unwrap_err(),
            CompileError::FunctionAsSubartifactSet("classifiedByAnyOf".into())
        );
    }

    #[test]
    fn test_nested_relationship_in_predicate_is_rejected() {
        let query = Query::all().with_predicate(Predicate::new(EqualityExpr::subartifact_set(
            SubartifactSet::relationship("a").then(SubartifactSet::relationship("b")),
        )));
        assert_eq!(
            build(&query).unwrap_err(),
            CompileError::MultiLevelSubartifactSet
        );
    }
}
