// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query planning: compiles S-RAMP query ASTs into structural queries

pub mod builders;
pub mod compiler;
pub mod context;
pub mod render;
pub mod structural;

pub use compiler::{Compilation, CompiledQuery, OrderBy, QueryCompiler};
pub use render::Sql2Renderer;
pub use structural::{
    Column, Constraint, JoinCondition, JoinType, Operator, Ordering, PropertyValue, Selector,
    Source, StructuralQuery, Value,
};
