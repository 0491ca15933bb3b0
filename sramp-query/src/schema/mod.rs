// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Repository schema knowledge used by the query compiler: artifact types,
//! namespaces and the backend column vocabulary

pub mod artifact_type;
pub mod namespaces;
pub mod properties;

pub use artifact_type::ArtifactType;
pub use namespaces::NamespaceContext;
