// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! End-to-end tests for the query compiler
//!
//! Each test builds a query AST the way the parser would, compiles it and
//! checks the finalized structural query.

#[path = "testutils/mod.rs"]
mod testutils;

#[cfg(test)]
mod compiler_integration {
    use super::testutils::{classification_call, fn_call, geography_resolver, init_logging, sramp_call};
    use chrono::{DateTime, NaiveDate};
    use sramp_query::ast::{
        Argument, ComparisonOperator, EqualityExpr, Expr, ForwardPropertyStep, FunctionCall,
        Predicate, QName, Query, QueryTemplate, SubartifactSet, XPathSerializer,
    };
    use sramp_query::classification::InMemoryClassificationResolver;
    use sramp_query::plan::{
        Column, Constraint, JoinCondition, JoinType, OrderBy, Ordering, PropertyValue,
        QueryCompiler, Selector, Source, Value,
    };
    use sramp_query::schema::properties::{CLASSIFIED_BY, NORMALIZED_CLASSIFIED_BY, UUID};
    use sramp_query::{CompileError, CompilerConfig, ErrorKind, ResolutionError};

    fn compile(query: &Query) -> Result<sramp_query::CompiledQuery, CompileError> {
        init_logging();
        let resolver = geography_resolver();
        QueryCompiler::new(&resolver).compile(query)?.build_query()
    }

    fn with_predicate(query: Query, expr: impl Into<Expr>) -> Query {
        query.with_predicate(Predicate::new(expr))
    }

    #[test]
    fn test_document_by_name() {
        let query = with_predicate(
            Query::of_type("core", "Document"),
            EqualityExpr::property_equals("name", "PO.xml"),
        );
        let compiled = compile(&query).expect("query should compile");

        assert_eq!(
            compiled.query.source,
            Source::selector("sramp:baseArtifactType", "artifact1")
        );
        assert_eq!(
            compiled.query.conjuncts(),
            vec![
                &Constraint::equal_to("artifact1", "sramp:artifactModel", "core"),
                &Constraint::equal_to("artifact1", "sramp:artifactType", "Document"),
                &Constraint::equal_to("artifact1", "sramp:name", "PO.xml"),
                &Constraint::descendant_node("artifact1", "/s-ramp"),
            ]
        );
        assert!(compiled.query.orderings.is_empty());
        assert_eq!(compiled.query.columns, vec![Column::new("artifact1", UUID)]);
    }

    #[test]
    fn test_relationship_step_pivots_output() {
        let query = Query::of_type("wsdl", "WsdlDocument").with_subartifact_set(
            SubartifactSet::relationship_where(
                "wsdlService",
                Predicate::new(EqualityExpr::property_equals("name", "Foo")),
            ),
        );
        let compiled = compile(&query).unwrap();

        let expected_source = Source::selector("sramp:baseArtifactType", "artifact1")
            .join(
                JoinType::Inner,
                Selector::new("sramp:relationship", "relationship1"),
                JoinCondition::child_node("relationship1", "artifact1"),
            )
            .join(
                JoinType::Inner,
                Selector::new("sramp:target", "target1"),
                JoinCondition::child_node("target1", "relationship1"),
            )
            .join(
                JoinType::Inner,
                Selector::new("sramp:baseArtifactType", "artifact2"),
                JoinCondition::equi("target1", "sramp:targetArtifact", "artifact2", UUID),
            );
        assert_eq!(compiled.query.source, expected_source);
        assert_eq!(compiled.output_selector, "artifact2");
        assert_eq!(compiled.query.columns, vec![Column::new("artifact2", UUID)]);

        let conjuncts = compiled.query.conjuncts();
        assert!(conjuncts.contains(&&Constraint::equal_to(
            "relationship1",
            "sramp:relationshipType",
            "wsdlService"
        )));
        assert!(conjuncts.contains(&&Constraint::equal_to("artifact2", "sramp:name", "Foo")));
        assert_eq!(
            conjuncts.last(),
            Some(&&Constraint::descendant_node("artifact1", "/s-ramp"))
        );
    }

    #[test]
    fn test_classification_folds() {
        let all_of = with_predicate(
            Query::all(),
            EqualityExpr::function(classification_call("classifiedByAllOf", &["Europe", "Asia"])),
        );
        let compiled = compile(&all_of).unwrap();
        let asia = Constraint::equal_to(
            "artifact1",
            NORMALIZED_CLASSIFIED_BY,
            "http://example.org/regions#Asia",
        );
        let europe = Constraint::equal_to(
            "artifact1",
            NORMALIZED_CLASSIFIED_BY,
            "http://example.org/regions#Europe",
        );
        // AND folds flatten into the top-level conjuncts
        assert_eq!(
            compiled.query.conjuncts(),
            vec![&asia, &europe, &Constraint::descendant_node("artifact1", "/s-ramp")]
        );

        let any_of = with_predicate(
            Query::all(),
            EqualityExpr::function(classification_call("classifiedByAnyOf", &["Europe", "Asia"])),
        );
        let compiled = compile(&any_of).unwrap();
        assert_eq!(compiled.query.conjuncts()[0], &Constraint::or(asia, europe));
    }

    #[test]
    fn test_bare_property_is_existence_test() {
        let query = with_predicate(
            Query::of_model("xsd"),
            EqualityExpr::exists(ForwardPropertyStep::local("someProperty")),
        );
        let compiled = compile(&query).unwrap();
        assert_eq!(
            compiled.query.conjuncts()[1],
            &Constraint::exists("artifact1", "sramp-properties:someProperty")
        );
    }

    #[test]
    fn test_not_wraps_one_constraint() {
        let inner = Expr::and(
            EqualityExpr::property_equals("name", "a"),
            EqualityExpr::property_equals("version", "1.0"),
        );
        let query = with_predicate(
            Query::all(),
            EqualityExpr::function(fn_call("not", vec![Argument::Expr(inner)])),
        );
        let compiled = compile(&query).unwrap();

        let negated: Vec<_> = compiled
            .query
            .conjuncts()
            .into_iter()
            .filter(|c| matches!(c, Constraint::Not(_)))
            .collect();
        assert_eq!(negated.len(), 1);
        assert_eq!(
            negated[0],
            &Constraint::not(Constraint::and(
                Constraint::equal_to("artifact1", "sramp:name", "a"),
                Constraint::equal_to("artifact1", "version", "1.0"),
            ))
        );
    }

    #[test]
    fn test_unknown_sramp_function_is_fatal() {
        init_logging();
        let resolver = InMemoryClassificationResolver::new();
        let query = with_predicate(
            Query::all(),
            EqualityExpr::function(sramp_call("bogus", vec![Argument::context_item()])),
        );
        let error = QueryCompiler::new(&resolver).compile(&query).unwrap_err();
        assert_eq!(error, CompileError::UnknownFunction("bogus".into()));
        assert_eq!(error.kind(), ErrorKind::UnsupportedConstruct);
    }

    #[test]
    fn test_resolution_failure_is_deferred_until_build() {
        init_logging();
        let resolver = geography_resolver();
        let query = with_predicate(
            Query::all(),
            Expr::and(
                EqualityExpr::function(classification_call("classifiedByAnyOf", &["Atlantis"])),
                EqualityExpr::property_equals("name", "x"),
            ),
        );

        let compilation = QueryCompiler::new(&resolver).compile(&query).unwrap();
        assert!(compilation.has_errors());
        // Compilation continued past the failed lookup
        assert!(compilation
            .constraints()
            .contains(&Constraint::equal_to("artifact1", "sramp:name", "x")));

        assert_eq!(
            compilation.build_query().unwrap_err(),
            CompileError::Resolution(ResolutionError::UnknownClassification("Atlantis".into()))
        );
    }

    #[test]
    fn test_first_deferred_error_wins() {
        init_logging();
        let resolver = geography_resolver();
        let query = with_predicate(
            Query::all(),
            Expr::and(
                EqualityExpr::property_equals("lastModifiedTimestamp", "01/02/2024"),
                EqualityExpr::function(classification_call("classifiedByAnyOf", &["Atlantis"])),
            ),
        );

        let compilation = QueryCompiler::new(&resolver).compile(&query).unwrap();
        assert_eq!(compilation.errors().len(), 2);
        assert_eq!(
            compilation.build_query().unwrap_err().kind(),
            ErrorKind::Value
        );
    }

    #[test]
    fn test_date_comparison() {
        let query = with_predicate(
            Query::all(),
            EqualityExpr::comparison(
                ForwardPropertyStep::local("createdTimestamp"),
                ComparisonOperator::GreaterThanOrEqual,
                "2024-01-31",
            ),
        );
        let compiled = compile(&query).unwrap();
        assert!(compiled
            .to_sql2()
            .contains("artifact1.[jcr:created] >= CAST('2024-01-31T00:00:00.000Z' AS DATE)"));
    }

    #[test]
    fn test_ordering_and_sql2() {
        init_logging();
        let resolver = geography_resolver();
        let query = with_predicate(
            Query::of_type("core", "XmlDocument"),
            EqualityExpr::function(fn_call(
                "matches",
                vec![Argument::property("name"), Argument::literal(".*order.*")],
            )),
        );
        let compiled = QueryCompiler::new(&resolver)
            .compile_with_order(&query, Some(&OrderBy::ascending("name")))
            .unwrap()
            .build_query()
            .unwrap();

        assert_eq!(
            compiled.to_sql2(),
            "SELECT artifact1.[jcr:uuid] FROM [sramp:baseArtifactType] AS artifact1 \
             WHERE artifact1.[sramp:artifactModel] = 'core' \
             AND artifact1.[sramp:artifactType] = 'XmlDocument' \
             AND artifact1.[sramp:name] LIKE '%order%' \
             AND ISDESCENDANTNODE(artifact1, '/s-ramp') \
             ORDER BY artifact1.[sramp:name] ASC"
        );
    }

    #[test]
    fn test_full_text_search_joins_content() {
        let query = with_predicate(
            Query::all(),
            Expr::or(
                EqualityExpr::function(fn_call(
                    "matches",
                    vec![Argument::context_item(), Argument::literal("invoice")],
                )),
                EqualityExpr::function(fn_call(
                    "matches",
                    vec![Argument::context_item(), Argument::literal("receipt")],
                )),
            ),
        );
        let compiled = compile(&query).unwrap();

        let sql = compiled.to_sql2();
        assert_eq!(compiled.query.source.join_count(), 1);
        assert!(sql.contains(
            "LEFT OUTER JOIN [nt:resource] AS content1 ON ISCHILDNODE(content1, artifact1)"
        ));
        assert!(sql.contains("CONTAINS(content1.*, 'receipt')"));
    }

    #[test]
    fn test_relationship_predicate_uses_derived_table() {
        let query = with_predicate(
            Query::of_type("xsd", "XsdDocument"),
            EqualityExpr::subartifact_set(SubartifactSet::relationship_where(
                "importedXsds",
                Predicate::new(EqualityExpr::property_equals("name", "common.xsd")),
            )),
        );
        let sql = compile(&query).unwrap().to_sql2();

        assert!(sql.contains("artifact1.[jcr:uuid] IN (SELECT artifact3.[jcr:uuid] AS uuid"));
        assert!(sql.contains("relationship1.[sramp:relationshipType] = 'importedXsds'"));
        assert!(sql.contains("artifact2.[sramp:name] = 'common.xsd'"));
        assert!(sql.contains("ISDESCENDANTNODE(relationship1, '/s-ramp')"));
    }

    #[test]
    fn test_foreign_property_namespace_is_rejected() {
        let query = with_predicate(
            Query::all(),
            EqualityExpr::comparison(
                ForwardPropertyStep::new(QName::new("urn:acme", "rating", "acme")),
                ComparisonOperator::Equal,
                5i64,
            ),
        );
        assert_eq!(
            compile(&query).unwrap_err(),
            CompileError::ForeignPropertyNamespace("urn:acme".into())
        );
    }

    #[test]
    fn test_function_as_comparison_operand_is_rejected() {
        let call: FunctionCall = classification_call("classifiedByAnyOf", &["Europe"]);
        let query = with_predicate(
            Query::all(),
            EqualityExpr::comparison(call, ComparisonOperator::Equal, "x"),
        );
        assert_eq!(
            compile(&query).unwrap_err(),
            CompileError::FunctionAsOperand("classifiedByAnyOf".into())
        );
    }

    #[test]
    fn test_custom_root_path() {
        init_logging();
        let resolver = InMemoryClassificationResolver::new();
        let config = CompilerConfig {
            root_path: "/repository".to_string(),
            ..CompilerConfig::default()
        };
        let compiled = QueryCompiler::with_config(&resolver, config)
            .compile(&Query::all())
            .unwrap()
            .build_query()
            .unwrap();
        assert_eq!(
            compiled.query.constraint,
            Some(Constraint::descendant_node("artifact1", "/repository"))
        );
    }

    #[test]
    fn test_compiled_query_serializes_to_json() {
        let compiled = compile(&Query::of_type("core", "Document")).unwrap();
        let json = serde_json::to_value(&compiled).unwrap();
        assert_eq!(json["output_selector"], "artifact1");
        let back: sramp_query::CompiledQuery = serde_json::from_value(json).unwrap();
        assert_eq!(back, compiled);
    }

    fn wsdl_service_where(expr: impl Into<Expr>) -> Query {
        Query::of_type("wsdl", "WsdlDocument").with_subartifact_set(
            SubartifactSet::relationship_where("wsdlService", Predicate::new(expr)),
        )
    }

    #[test]
    fn test_date_time_template_value_compiles() {
        let offset_time = DateTime::parse_from_rfc3339("2013-04-15T10:20:30+02:00").unwrap();
        let text = QueryTemplate::new("/s-ramp[@lastModifiedTimestamp < ?]")
            .bind_date_time(offset_time)
            .format()
            .unwrap();

        let query = with_predicate(
            Query::all(),
            EqualityExpr::comparison(
                ForwardPropertyStep::local("lastModifiedTimestamp"),
                ComparisonOperator::LessThan,
                "2013-04-15T10:20:30+02:00",
            ),
        );
        assert_eq!(XPathSerializer::new().serialize(&query), text);

        let compiled = compile(&query).expect("timestamp literal should compile");
        assert_eq!(
            compiled.query.conjuncts()[0],
            &Constraint::comparison(
                PropertyValue::new("artifact1", "jcr:lastModified"),
                sramp_query::plan::Operator::LessThan,
                Value::Date(NaiveDate::from_ymd_opt(2013, 4, 15).unwrap()),
            )
        );
    }

    #[test]
    fn test_unicode_extended_type() {
        let compiled = compile(&Query::of_type("ext", "Übersicht")).unwrap();
        assert!(compiled
            .query
            .conjuncts()
            .contains(&&Constraint::equal_to("artifact1", "sramp:extendedType", "Übersicht")));
    }

    #[test]
    fn test_target_attribute_uses_target_selector() {
        let attribute = sramp_call(
            "getTargetAttribute",
            vec![Argument::context_item(), Argument::literal("ref")],
        );
        let query = wsdl_service_where(EqualityExpr::comparison(
            attribute,
            ComparisonOperator::Equal,
            "primary",
        ));
        let compiled = compile(&query).unwrap();
        assert!(compiled.query.conjuncts().contains(&&Constraint::equal_to(
            "target1",
            "sramp-otherAttributes:ref",
            "primary"
        )));
    }

    #[test]
    fn test_exact_classification_any_of() {
        let query = with_predicate(
            Query::all(),
            EqualityExpr::function(classification_call(
                "exactlyClassifiedByAnyOf",
                &["France", "Asia"],
            )),
        );
        let compiled = compile(&query).unwrap();
        assert_eq!(
            compiled.query.conjuncts()[0],
            &Constraint::or(
                Constraint::equal_to("artifact1", CLASSIFIED_BY, "http://example.org/regions#Asia"),
                Constraint::equal_to(
                    "artifact1",
                    CLASSIFIED_BY,
                    "http://example.org/regions#France"
                ),
            )
        );
    }

    #[test]
    fn test_ordering_follows_pivot() {
        init_logging();
        let resolver = geography_resolver();
        let query = wsdl_service_where(EqualityExpr::property_equals("name", "Foo"));
        let compiled = QueryCompiler::new(&resolver)
            .compile_with_order(&query, Some(&OrderBy::descending("name")))
            .unwrap()
            .build_query()
            .unwrap();

        let expected = Ordering::descending(PropertyValue::new("artifact2", "sramp:name"));
        assert_eq!(compiled.query.orderings, vec![expected]);
        assert!(compiled.to_sql2().ends_with("ORDER BY artifact2.[sramp:name] DESC"));
    }

    #[test]
    fn test_full_text_search_per_artifact_selector() {
        let search = |pattern: &str| {
            EqualityExpr::function(fn_call(
                "matches",
                vec![Argument::context_item(), Argument::literal(pattern)],
            ))
        };
        let query = Query::of_type("wsdl", "WsdlDocument")
            .with_predicate(Predicate::new(search("a")))
            .with_subartifact_set(SubartifactSet::relationship_where(
                "wsdlService",
                Predicate::new(search("b")),
            ));
        let compiled = compile(&query).unwrap();

        let sql = compiled.to_sql2();
        assert!(sql.contains("[nt:resource] AS content1 ON ISCHILDNODE(content1, artifact1)"));
        assert!(sql.contains("[nt:resource] AS content2 ON ISCHILDNODE(content2, artifact2)"));
        assert!(sql.contains("CONTAINS(content2.*, 'b')"));
    }
}
