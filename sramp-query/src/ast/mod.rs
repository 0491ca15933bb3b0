// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! AST subsystem: query nodes, visitor dispatch, serialization, validation
//! and query templates for S-RAMP XPath queries

pub mod ast;
pub mod pretty_printer;
pub mod template;
pub mod validator;
pub mod visitor;

pub use ast::*;
pub use pretty_printer::XPathSerializer;
pub use template::{QueryTemplate, TemplateError};
pub use validator::QueryValidator;
pub use visitor::{Visitable, Visitor};
