//! jq filter evaluation
//!
//! Expressions are compiled against the jq core and standard library and run
//! on a single input document.

use crate::utils::error::{helpers, AppResult};
use jaq_interpret::{Ctx, Filter, FilterT, ParseCtx, RcIter, Val};
use serde_json::Value;

/// A compiled jq expression
pub struct JqFilter {
    filter: Filter,
}

impl std::fmt::Debug for JqFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JqFilter").finish_non_exhaustive()
    }
}

impl JqFilter {
    /// Parse and compile `expr`
    pub fn compile(expr: &str) -> AppResult<Self> {
        let mut defs = ParseCtx::new(Vec::new());
        defs.insert_natives(jaq_core::core());
        defs.insert_defs(jaq_std::std());

        let (parsed, errs) = jaq_parse::parse(expr, jaq_parse::main());
        if !errs.is_empty() {
            let details: Vec<String> = errs.iter().map(ToString::to_string).collect();
            return Err(helpers::filter_error(format!(
                "invalid expression '{}': {}",
                expr,
                details.join("; ")
            )));
        }
        let parsed = parsed.ok_or_else(|| {
            helpers::filter_error(format!("invalid expression '{}'", expr))
        })?;

        let filter = defs.compile(parsed);
        if !defs.errs.is_empty() {
            return Err(helpers::filter_error(format!(
                "failed to compile '{}': {} undefined or invalid symbol(s)",
                expr,
                defs.errs.len()
            )));
        }

        Ok(Self { filter })
    }

    /// Run against `input`, handing each output to `emit` in order
    ///
    /// Stops at the first runtime error; outputs already emitted stay emitted.
    pub fn for_each<F>(&self, input: Value, mut emit: F) -> AppResult<()>
    where
        F: FnMut(Value) -> AppResult<()>,
    {
        let inputs = RcIter::new(core::iter::empty());
        let outputs = self.filter.run((Ctx::new([], &inputs), Val::from(input)));

        for output in outputs {
            let value = output.map_err(|e| helpers::filter_error(e.to_string()))?;
            emit(Value::from(value))?;
        }
        Ok(())
    }

    /// Run against `input` and collect every output
    pub fn run(&self, input: Value) -> AppResult<Vec<Value>> {
        let mut values = Vec::new();
        self.for_each(input, |value| {
            values.push(value);
            Ok(())
        })?;
        Ok(values)
    }
}

/// Compile and run `expr` in one step
pub fn run_filter(expr: &str, input: Value) -> AppResult<Vec<Value>> {
    JqFilter::compile(expr)?.run(input)
}
