// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Integration tests for the AST surface: serialization, custom visitors,
//! validation and query templates

#[path = "testutils/mod.rs"]
mod testutils;

#[cfg(test)]
mod ast_integration {
    use super::testutils::{classification_call, fn_call, init_logging};
    use chrono::NaiveDate;
    use sramp_query::ast::visitor::*;
    use sramp_query::ast::*;
    use sramp_query::schema::namespaces::NamespaceContext;
    use sramp_query::{CompileError, QueryCompiler};

    /// Collects every property name a query mentions
    #[derive(Default)]
    struct PropertyCollector {
        names: Vec<String>,
    }

    impl Visitor for PropertyCollector {
        fn visit_query(&mut self, node: &Query) {
            walk_query(self, node);
        }
        fn visit_artifact_set(&mut self, node: &ArtifactSet) {
            walk_artifact_set(self, node);
        }
        fn visit_location_path(&mut self, _node: &LocationPath) {}
        fn visit_predicate(&mut self, node: &Predicate) {
            walk_predicate(self, node);
        }
        fn visit_expr(&mut self, node: &Expr) {
            walk_expr(self, node);
        }
        fn visit_and_expr(&mut self, node: &AndExpr) {
            walk_and_expr(self, node);
        }
        fn visit_or_expr(&mut self, node: &OrExpr) {
            walk_or_expr(self, node);
        }
        fn visit_equality_expr(&mut self, node: &EqualityExpr) {
            walk_equality_expr(self, node);
        }
        fn visit_subartifact_set(&mut self, node: &SubartifactSet) {
            walk_subartifact_set(self, node);
        }
        fn visit_relationship_path(&mut self, _node: &RelationshipPath) {}
        fn visit_function_call(&mut self, node: &FunctionCall) {
            walk_function_call(self, node);
        }
        fn visit_argument(&mut self, node: &Argument) {
            walk_argument(self, node);
        }
        fn visit_primary_expr(&mut self, _node: &PrimaryExpr) {}
        fn visit_forward_property_step(&mut self, node: &ForwardPropertyStep) {
            self.names.push(node.property_qname.local_part.clone());
        }
    }

    fn sample_query() -> Query {
        Query::of_type("core", "Document").with_predicate(Predicate::new(Expr::and(
            EqualityExpr::property_equals("name", "PO.xml"),
            EqualityExpr::grouped(Expr::or(
                EqualityExpr::function(fn_call(
                    "matches",
                    vec![Argument::property("description"), Argument::literal(".*order.*")],
                )),
                EqualityExpr::exists(ForwardPropertyStep::local("approvedBy")),
            )),
        )))
    }

    #[test]
    fn test_visitor_reaches_every_property() {
        let mut collector = PropertyCollector::default();
        sample_query().accept(&mut collector);
        assert_eq!(collector.names, vec!["name", "description", "approvedBy"]);
    }

    #[test]
    fn test_serialize_sample() {
        assert_eq!(
            XPathSerializer::new().serialize(&sample_query()),
            "/s-ramp/core/Document[@name = 'PO.xml' and \
             (fn:matches(@description, '.*order.*') or @approvedBy)]"
        );
    }

    #[test]
    fn test_serializer_uses_registered_alias() {
        let namespaces = NamespaceContext::default().bind("acme", "urn:acme");
        let query = Query::all().with_predicate(Predicate::new(EqualityExpr::exists(
            ForwardPropertyStep::new(QName::in_namespace("urn:acme", "rating")),
        )));
        assert_eq!(
            XPathSerializer::with_namespaces(namespaces).serialize(&query),
            "/s-ramp[@acme:rating]"
        );
    }

    #[test]
    fn test_template_matches_serialized_query() {
        let from_template = QueryTemplate::new(
            "/s-ramp/core/Document[@name = ? and @createdTimestamp > ?]",
        )
        .bind_string("it's")
        .bind_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        .format()
        .unwrap();

        let query = Query::of_type("core", "Document").with_predicate(Predicate::new(Expr::and(
            EqualityExpr::property_equals("name", "it's"),
            EqualityExpr::comparison(
                ForwardPropertyStep::local("createdTimestamp"),
                ComparisonOperator::GreaterThan,
                "2024-05-01",
            ),
        )));
        assert_eq!(from_template, XPathSerializer::new().serialize(&query));
    }

    #[test]
    fn test_template_parameter_count() {
        let template = QueryTemplate::new("/s-ramp[@a = ? and @b = '?']").bind_number(3i64);
        assert_eq!(template.placeholder_count(), 1);
        assert_eq!(template.format().unwrap(), "/s-ramp[@a = 3 and @b = '?']");

        assert!(matches!(
            QueryTemplate::new("/s-ramp[@a = ?]").format(),
            Err(TemplateError::TooFewParameters { placeholders: 1, bound: 0 })
        ));
    }

    #[test]
    fn test_invalid_names_fail_before_compilation() {
        init_logging();
        let resolver = sramp_query::InMemoryClassificationResolver::new();
        let query = Query::all().with_predicate(Predicate::new(EqualityExpr::property_equals(
            "not a name",
            "x",
        )));
        assert!(matches!(
            QueryCompiler::new(&resolver).compile(&query),
            Err(CompileError::Structural(_))
        ));
    }

    #[test]
    fn test_ast_json_round_trip() {
        let query = Query::all().with_predicate(Predicate::new(EqualityExpr::function(
            classification_call("classifiedByAnyOf", &["Europe", "Asia"]),
        )));
        let json = serde_json::to_string(&query).unwrap();
        let back: Query = serde_json::from_str(&json).unwrap();
        assert_eq!(back, query);
        assert_eq!(
            XPathSerializer::new().serialize(&back),
            "/s-ramp[classifiedByAnyOf(., 'Europe', 'Asia')]"
        );
    }
}
