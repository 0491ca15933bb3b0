// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Namespaces known to the query language
//!
//! Function names and property names are qualified names. Unqualified
//! property names live in the core S-RAMP namespace; the XPath 2.0 function
//! namespace hosts `matches` and `not`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Core S-RAMP namespace
pub const SRAMP_NS: &str = "http://docs.oasis-open.org/s-ramp/ns/s-ramp-v1.0";
/// Default prefix bound to [`SRAMP_NS`]
pub const SRAMP_PREFIX: &str = "s-ramp";

/// XPath 2.0 function namespace
pub const XPATH_FN_NS: &str = "http://www.w3.org/2005/xpath-functions";
/// Prefix conventionally bound to [`XPATH_FN_NS`]
pub const XPATH_FN_PREFIX: &str = "fn";
/// Legacy alias for [`XPATH_FN_NS`] used by older clients
pub const XPATH2_PREFIX: &str = "xp2";

/// Repository-specific extension namespace
pub const ARTIFICER_NS: &str = "http://artificer.jboss.org";
pub const ARTIFICER_PREFIX: &str = "artificer";

/// Prefix ↔ namespace bindings used when reading and writing qualified names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceContext {
    /// Prefix that is implied when a name carries none
    pub default_prefix: String,
    /// Prefix → namespace URI
    pub bindings: BTreeMap<String, String>,
}

impl NamespaceContext {
    /// Create a context with only the given default binding
    pub fn new(default_prefix: impl Into<String>, default_namespace: impl Into<String>) -> Self {
        let default_prefix = default_prefix.into();
        let mut bindings = BTreeMap::new();
        bindings.insert(default_prefix.clone(), default_namespace.into());
        Self {
            default_prefix,
            bindings,
        }
    }

    /// Add (or replace) a prefix binding
    pub fn bind(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.bindings.insert(prefix.into(), namespace.into());
        self
    }

    /// Namespace URI bound to `prefix`
    pub fn namespace_uri(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    /// Namespace URI of the default prefix
    pub fn default_namespace(&self) -> Option<&str> {
        self.namespace_uri(&self.default_prefix)
    }

    /// First prefix bound to `namespace`, in prefix order
    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(_, uri)| uri.as_str() == namespace)
            .map(|(prefix, _)| prefix.as_str())
    }

    /// True when `prefix` is the default prefix
    pub fn is_default_prefix(&self, prefix: &str) -> bool {
        self.default_prefix == prefix
    }

    /// True when `namespace` is the namespace of the default prefix
    pub fn is_default_namespace(&self, namespace: &str) -> bool {
        self.default_namespace() == Some(namespace)
    }
}

impl Default for NamespaceContext {
    fn default() -> Self {
        Self::new(SRAMP_PREFIX, SRAMP_NS)
            .bind(XPATH_FN_PREFIX, XPATH_FN_NS)
            .bind(XPATH2_PREFIX, XPATH_FN_NS)
            .bind(ARTIFICER_PREFIX, ARTIFICER_NS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let ctx = NamespaceContext::default();
        assert_eq!(ctx.namespace_uri("s-ramp"), Some(SRAMP_NS));
        assert_eq!(ctx.namespace_uri("xp2"), Some(XPATH_FN_NS));
        assert_eq!(ctx.namespace_uri("fn"), Some(XPATH_FN_NS));
        assert_eq!(ctx.default_namespace(), Some(SRAMP_NS));
        assert!(ctx.is_default_prefix("s-ramp"));
        assert!(!ctx.is_default_prefix("fn"));
    }

    #[test]
    fn test_prefix_lookup_is_deterministic() {
        let ctx = NamespaceContext::default();
        // "fn" sorts before "xp2"
        assert_eq!(ctx.prefix_for(XPATH_FN_NS), Some("fn"));
        assert_eq!(ctx.prefix_for("urn:unknown"), None);
    }
}
