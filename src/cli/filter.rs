//! Parsing of `--eq/--in/--gt/--lt FIELD=VALUE` arguments into filters.
//!
//! Values are typed by their text: `true`/`false` become booleans, anything
//! that parses as a 64-bit integer becomes a long, everything else stays a
//! string. An `--in` list is numeric only when every element is.

use anyhow::{bail, Result};

use crate::domain::filter::{Filter, FilterValue, Operator};

/// Split `FIELD=VALUE` at the first `=`.
fn split_pair(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => Ok((field.trim(), value)),
        _ => bail!("expected FIELD=VALUE, got '{raw}'"),
    }
}

fn scalar(text: &str) -> FilterValue {
    match text {
        "true" => FilterValue::Boolean(true),
        "false" => FilterValue::Boolean(false),
        _ => text
            .parse::<i64>()
            .map_or_else(|_| FilterValue::String(text.to_string()), FilterValue::Long),
    }
}

fn list(text: &str) -> FilterValue {
    if text.is_empty() {
        return FilterValue::List(Vec::new());
    }
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    let numbers: Option<Vec<FilterValue>> = parts
        .iter()
        .map(|p| p.parse::<i64>().ok().map(FilterValue::Long))
        .collect();
    FilterValue::List(numbers.unwrap_or_else(|| {
        parts
            .iter()
            .map(|p| FilterValue::String((*p).to_string()))
            .collect()
    }))
}

/// Parse one argument for `op`.
///
/// # Errors
/// Returns an error if the argument has no `=` or an empty field name.
pub fn parse(op: Operator, raw: &str) -> Result<Filter> {
    let (field, text) = split_pair(raw)?;
    let value = match op {
        Operator::In => list(text),
        _ => scalar(text),
    };
    Ok(Filter::new(field, op, value))
}

/// Parse every filter argument, in `EQ, IN, GT, LT` order.
///
/// # Errors
/// Returns the first malformed argument.
pub fn parse_all(eq: &[String], is_in: &[String], gt: &[String], lt: &[String]) -> Result<Vec<Filter>> {
    let groups = [
        (Operator::Eq, eq),
        (Operator::In, is_in),
        (Operator::Gt, gt),
        (Operator::Lt, lt),
    ];
    let mut filters = Vec::new();
    for (op, args) in groups {
        for raw in args {
            filters.push(parse(op, raw)?);
        }
    }
    Ok(filters)
}
