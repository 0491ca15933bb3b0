// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Parameterized query text
//!
//! A template such as `/s-ramp/core/Document[@name = ?]` has its `?`
//! placeholders replaced, in order, by bound values. Strings and dates are
//! emitted as quoted literals, numbers verbatim. A `?` inside a quoted
//! literal is left alone.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Too few query parameters: template has {placeholders}, {bound} bound")]
    TooFewParameters { placeholders: usize, bound: usize },

    #[error("Too many query parameters: template has {placeholders}, {bound} bound")]
    TooManyParameters { placeholders: usize, bound: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum Param {
    String(String),
    Number(String),
}

impl Param {
    fn write_to(&self, out: &mut String) {
        match self {
            Param::String(value) => {
                out.push('\'');
                out.push_str(&value.replace('\'', "''"));
                out.push('\'');
            }
            Param::Number(value) => out.push_str(value),
        }
    }
}

/// Query text with positional replacement parameters
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTemplate {
    template: String,
    params: Vec<Param>,
}

impl QueryTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            params: Vec::new(),
        }
    }

    pub fn bind_string(mut self, value: impl Into<String>) -> Self {
        self.params.push(Param::String(value.into()));
        self
    }

    pub fn bind_number(mut self, value: impl Into<TemplateNumber>) -> Self {
        let TemplateNumber(text) = value.into();
        self.params.push(Param::Number(text));
        self
    }

    /// Bind a calendar date as `'yyyy-MM-dd'`
    pub fn bind_date(mut self, date: NaiveDate) -> Self {
        self.params
            .push(Param::String(date.format("%Y-%m-%d").to_string()));
        self
    }

    /// Bind a timestamp as ISO-8601 without fractional seconds
    pub fn bind_date_time(mut self, date_time: DateTime<FixedOffset>) -> Self {
        self.params.push(Param::String(
            date_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        ));
        self
    }

    /// Number of `?` placeholders outside quoted literals
    pub fn placeholder_count(&self) -> usize {
        let mut in_literal = false;
        self.template
            .chars()
            .filter(|c| match *c {
                '\'' => {
                    in_literal = !in_literal;
                    false
                }
                '?' => !in_literal,
                _ => false,
            })
            .count()
    }

    /// Produce query text with every placeholder replaced
    pub fn format(&self) -> Result<String, TemplateError> {
        let placeholders = self.placeholder_count();
        let bound = self.params.len();
        if bound < placeholders {
            return Err(TemplateError::TooFewParameters {
                placeholders,
                bound,
            });
        }
        if bound > placeholders {
            return Err(TemplateError::TooManyParameters {
                placeholders,
                bound,
            });
        }

        let mut out = String::with_capacity(self.template.len());
        let mut params = self.params.iter();
        let mut in_literal = false;
        for c in self.template.chars() {
            match c {
                '\'' => {
                    in_literal = !in_literal;
                    out.push(c);
                }
                '?' if !in_literal => {
                    if let Some(param) = params.next() {
                        param.write_to(&mut out);
                    }
                }
                _ => out.push(c),
            }
        }
        log::trace!("Formatted query template: {}", out);
        Ok(out)
    }
}

/// Numeric value accepted by [`QueryTemplate::bind_number`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateNumber(String);

macro_rules! template_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for TemplateNumber {
                fn from(value: $t) -> Self {
                    TemplateNumber(value.to_string())
                }
            }
        )*
    };
}

template_number!(i32, i64, u32, u64, f32, f64);
