// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Shared fixtures for the integration tests

#![allow(dead_code)]

use sramp_query::ast::{Argument, FunctionCall, QName};
use sramp_query::classification::InMemoryClassificationResolver;
use sramp_query::schema::namespaces::{SRAMP_NS, XPATH_FN_NS};

/// Route `log` output through the test harness; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Resolver with a small geography taxonomy
pub fn geography_resolver() -> InMemoryClassificationResolver {
    InMemoryClassificationResolver::new()
        .with_classifier("Europe", "http://example.org/regions#Europe")
        .with_classifier("Asia", "http://example.org/regions#Asia")
        .with_classifier("France", "http://example.org/regions#France")
}

/// Call of an S-RAMP function written with the `s-ramp` prefix
pub fn sramp_call(local: &str, arguments: Vec<Argument>) -> FunctionCall {
    FunctionCall::new(QName::new(SRAMP_NS, local, "s-ramp"), arguments)
}

/// Call of an XPath function written with the `fn` prefix
pub fn fn_call(local: &str, arguments: Vec<Argument>) -> FunctionCall {
    FunctionCall::new(QName::new(XPATH_FN_NS, local, "fn"), arguments)
}

/// `classifiedByAnyOf(., labels...)` style call with the context item receiver
pub fn classification_call(local: &str, labels: &[&str]) -> FunctionCall {
    let mut arguments = vec![Argument::context_item()];
    arguments.extend(labels.iter().map(|label| Argument::literal(*label)));
    FunctionCall::new(QName::local(local), arguments)
}
