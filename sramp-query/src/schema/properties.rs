// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Backend vocabulary: node types, reserved columns and the core-property table

use once_cell::sync::Lazy;
use std::collections::HashMap;

// Node types of the artifact store
pub const BASE_ARTIFACT_TYPE: &str = "sramp:baseArtifactType";
pub const RELATIONSHIP_NODE: &str = "sramp:relationship";
pub const TARGET_NODE: &str = "sramp:target";
pub const CONTENT_NODE: &str = "nt:resource";

// Structural columns
pub const UUID: &str = "jcr:uuid";
pub const ARTIFACT_MODEL: &str = "sramp:artifactModel";
pub const ARTIFACT_TYPE: &str = "sramp:artifactType";
pub const EXTENDED_TYPE: &str = "sramp:extendedType";
pub const RELATIONSHIP_TYPE: &str = "sramp:relationshipType";
pub const TARGET_ARTIFACT: &str = "sramp:targetArtifact";
pub const CLASSIFIED_BY: &str = "sramp:classifiedBy";
pub const NORMALIZED_CLASSIFIED_BY: &str = "sramp:normalizedClassifiedBy";

// Well-known core columns
pub const CREATED: &str = "jcr:created";
pub const CREATED_BY: &str = "jcr:createdBy";
pub const LAST_MODIFIED: &str = "jcr:lastModified";
pub const LAST_MODIFIED_BY: &str = "jcr:lastModifiedBy";

/// Column prefix for user-defined properties
pub const CUSTOM_PROPERTY_PREFIX: &str = "sramp-properties";
/// Column prefix for relationship / target "other attributes"
pub const OTHER_ATTRIBUTES_PREFIX: &str = "sramp-otherAttributes";

/// Path under which live (non-trashed) artifacts are stored
pub const ROOT_PATH: &str = "/s-ramp";

static CORE_PROPERTIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("createdBy", CREATED_BY),
        ("version", "version"),
        ("uuid", "sramp:uuid"),
        ("createdTimestamp", CREATED),
        ("lastModifiedTimestamp", LAST_MODIFIED),
        ("lastModifiedBy", LAST_MODIFIED_BY),
        ("description", "sramp:description"),
        ("name", "sramp:name"),
        ("contentType", "sramp:contentType"),
        ("contentSize", "sramp:contentSize"),
        ("contentHash", "sramp:contentHash"),
        ("contentEncoding", "sramp:contentEncoding"),
        ("extendedType", EXTENDED_TYPE),
        ("ncName", "sramp:ncName"),
        ("namespace", "sramp:namespace"),
        ("targetNamespace", "sramp:targetNamespace"),
        ("style", "sramp:style"),
        ("transport", "sramp:transport"),
        ("soapLocation", "sramp:soapLocation"),
        ("derived", "sramp:derived"),
    ])
});

/// Map a core-namespace local name to its backend column.
///
/// Reserved names map to fixed columns; anything else is a user-defined
/// property stored under [`CUSTOM_PROPERTY_PREFIX`].
pub fn core_column(local_name: &str) -> String {
    match CORE_PROPERTIES.get(local_name) {
        Some(column) => (*column).to_string(),
        None => custom_column(local_name),
    }
}

/// True when `local_name` is one of the reserved core properties
pub fn is_reserved(local_name: &str) -> bool {
    CORE_PROPERTIES.contains_key(local_name)
}

/// Column of a user-defined property
pub fn custom_column(local_name: &str) -> String {
    format!("{}:{}", CUSTOM_PROPERTY_PREFIX, local_name)
}

/// Column of a relationship or target "other attribute"
pub fn other_attribute_column(key: &str) -> String {
    format!("{}:{}", OTHER_ATTRIBUTES_PREFIX, key)
}

/// True for columns that hold dates; literals compared against them are parsed as dates
pub fn is_date_column(column: &str) -> bool {
    column == CREATED || column == LAST_MODIFIED
}
