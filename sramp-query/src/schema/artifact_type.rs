// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Enumerated artifact types
//!
//! Every built-in artifact type belongs to exactly one artifact model
//! (`core`, `xsd`, `wsdl`, ...). Types outside this table are user-defined
//! extended types and live in the `ext` model.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Artifact model that hosts user-defined types
pub const EXTENDED_MODEL: &str = "ext";
/// Type name stored for extended (non-document) artifacts
pub const EXTENDED_ARTIFACT_TYPE: &str = "ExtendedArtifactType";
/// Type name stored for extended document artifacts
pub const EXTENDED_DOCUMENT: &str = "ExtendedDocument";

/// Static description of a built-in artifact type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactType {
    /// Type name as it appears in queries, e.g. `WsdlDocument`
    pub name: &'static str,
    /// Owning artifact model, e.g. `wsdl`
    pub model: &'static str,
    /// Human readable label
    pub label: &'static str,
    /// Derived artifacts are produced by the repository, never uploaded
    pub derived: bool,
}

impl ArtifactType {
    /// True for the two storage types used by extended artifacts
    pub fn is_extended(&self) -> bool {
        self.model == EXTENDED_MODEL
    }
}

const fn t(name: &'static str, model: &'static str, label: &'static str, derived: bool) -> ArtifactType {
    ArtifactType {
        name,
        model,
        label,
        derived,
    }
}

static ARTIFACT_TYPES: &[ArtifactType] = &[
    // core
    t("Document", "core", "Document", false),
    t("XmlDocument", "core", "XML Document", false),
    // xsd
    t("XsdDocument", "xsd", "XML Schema", false),
    t("AttributeDeclaration", "xsd", "XML Schema Attribute Declaration", true),
    t("ElementDeclaration", "xsd", "XML Schema Element Declaration", true),
    t("SimpleTypeDeclaration", "xsd", "XML Schema Simple Type Declaration", true),
    t("ComplexTypeDeclaration", "xsd", "XML Schema Complex Type Declaration", true),
    t("XsdType", "xsd", "XML Schema Type Declaration", true),
    // policy
    t("PolicyDocument", "policy", "Policy", false),
    t("PolicyExpression", "policy", "Policy Expression", true),
    t("PolicyAttachment", "policy", "Policy Attachment", true),
    // soapWsdl
    t("SoapAddress", "soapWsdl", "SOAP Address", true),
    t("SoapBinding", "soapWsdl", "SOAP Binding", true),
    // wsdl
    t("WsdlDocument", "wsdl", "WSDL", false),
    t("WsdlService", "wsdl", "WSDL Service", true),
    t("Port", "wsdl", "WSDL Port", true),
    t("WsdlExtension", "wsdl", "WSDL Extension", true),
    t("Part", "wsdl", "WSDL Part", true),
    t("Message", "wsdl", "WSDL Message", true),
    t("Fault", "wsdl", "WSDL Fault", true),
    t("PortType", "wsdl", "WSDL Port Type", true),
    t("Operation", "wsdl", "WSDL Operation", true),
    t("OperationInput", "wsdl", "WSDL Operation Input", true),
    t("OperationOutput", "wsdl", "WSDL Operation Output", true),
    t("Binding", "wsdl", "WSDL Binding", true),
    t("BindingOperation", "wsdl", "WSDL Binding Operation", true),
    t("BindingOperationInput", "wsdl", "WSDL Binding Operation Input", true),
    t("BindingOperationOutput", "wsdl", "WSDL Binding Operation Output", true),
    t("BindingOperationFault", "wsdl", "WSDL Binding Operation Fault", true),
    // serviceImplementation
    t("ServiceEndpoint", "serviceImplementation", "Service Endpoint", false),
    t("ServiceInstance", "serviceImplementation", "Service Instance", false),
    t("ServiceOperation", "serviceImplementation", "Service Operation", false),
    t("Organization", "serviceImplementation", "SOA Organization", false),
    // ext
    t(EXTENDED_ARTIFACT_TYPE, EXTENDED_MODEL, "Extended Artifact Type", false),
    t(EXTENDED_DOCUMENT, EXTENDED_MODEL, "Extended Document", false),
    // soa
    t("Actor", "soa", "SOA Actor", false),
    t("Choreography", "soa", "SOA Choreography", false),
    t("ChoreographyProcess", "soa", "SOA Choreography Process", false),
    t("Collaboration", "soa", "SOA Collaboration", false),
    t("CollaborationProcess", "soa", "SOA Collaboration Process", false),
    t("Composition", "soa", "SOA Composition", false),
    t("Effect", "soa", "SOA Effect", false),
    t("Element", "soa", "SOA Element", false),
    t("Event", "soa", "SOA Event", false),
    t("InformationType", "soa", "SOA Information Type", false),
    t("Orchestration", "soa", "SOA Orchestration", false),
    t("OrchestrationProcess", "soa", "SOA Orchestration Process", false),
    t("Policy", "soa", "SOA Policy", false),
    t("PolicySubject", "soa", "SOA Policy Subject", false),
    t("Process", "soa", "SOA Process", false),
    t("Service", "soa", "SOA Service", false),
    t("ServiceContract", "soa", "SOA Service Contract", false),
    t("ServiceComposition", "soa", "SOA Service Composition", false),
    t("ServiceInterface", "soa", "SOA Service Interface", false),
    t("System", "soa", "SOA System", false),
    t("Task", "soa", "SOA Task", false),
];

static BY_NAME: Lazy<HashMap<&'static str, &'static ArtifactType>> =
    Lazy::new(|| ARTIFACT_TYPES.iter().map(|t| (t.name, t)).collect());

/// Look up a built-in artifact type by its query name
pub fn lookup(name: &str) -> Option<&'static ArtifactType> {
    BY_NAME.get(name).copied()
}

/// True when `name` is a built-in artifact type
pub fn is_known(name: &str) -> bool {
    BY_NAME.contains_key(name)
}

/// All built-in artifact types, in declaration order
pub fn all() -> &'static [ArtifactType] {
    ARTIFACT_TYPES
}

/// True when the artifact models known to the repository include `model`
pub fn is_known_model(model: &str) -> bool {
    ARTIFACT_TYPES.iter().any(|t| t.model == model)
}
