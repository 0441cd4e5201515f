//! Output module
//!
//! Response reshaping (field selection, then an optional jq filter) and the
//! table, plaintext and JSON renderers

pub mod fields;
pub mod filter;
pub mod render;

pub use fields::{filter_fields, parse_field_list, FieldSet};
pub use filter::{run_filter, JqFilter};
pub use render::{render, render_error, render_json, render_success, truncate_str, TableData};

use crate::utils::error::AppResult;
use serde_json::Value;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Padded columns, coloured on a terminal
    #[default]
    Table,
    /// Tab-separated, no colour
    Plaintext,
    /// Pretty-printed JSON
    Json,
}

impl OutputMode {
    /// JSON wins over plaintext when both are requested
    pub fn from_flags(json: bool, plaintext: bool) -> Self {
        if json {
            OutputMode::Json
        } else if plaintext {
            OutputMode::Plaintext
        } else {
            OutputMode::Table
        }
    }
}

/// Rendering options shared by every command
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub mode: OutputMode,
    pub no_color: bool,
    pub fields: FieldSet,
    pub jq: Option<String>,
}

impl OutputOptions {
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }
}

/// Field-select `document`, then run `expr` over it, emitting values in order
///
/// Without an expression the selected document is the single value. The
/// first filter error stops emission.
pub fn reshape_each<F>(document: Value, fields: &FieldSet, expr: Option<&str>, mut emit: F) -> AppResult<()>
where
    F: FnMut(Value) -> AppResult<()>,
{
    let selected = filter_fields(document, fields);
    match expr.map(str::trim).filter(|e| !e.is_empty()) {
        Some(expr) => JqFilter::compile(expr)?.for_each(selected, emit),
        None => emit(selected),
    }
}

/// Collecting form of [`reshape_each`]
pub fn reshape(document: Value, fields: &FieldSet, expr: Option<&str>) -> AppResult<Vec<Value>> {
    let mut values = Vec::new();
    reshape_each(document, fields, expr, |value| {
        values.push(value);
        Ok(())
    })?;
    Ok(values)
}
