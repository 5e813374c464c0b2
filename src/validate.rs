//! Client-side input checks run before any request leaves the SDK.

use crate::error::{Error, Result};
use serde_json::Value;
use std::ops::RangeInclusive;

/// Maximum size of inline HTML or Markdown content, in UTF-8 bytes.
pub const MAX_CONTENT_BYTES: usize = 2 * 1024 * 1024;

pub(crate) fn non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid(format!("{} must be a non-empty string", field)));
    }
    Ok(())
}

/// Identifier placed as a single URL path segment.
pub(crate) fn path_segment(field: &str, value: &str) -> Result<()> {
    non_empty(field, value)?;
    if matches!(value.trim(), "." | "..") {
        return Err(Error::invalid(format!("{} must not be a relative path", field)));
    }
    Ok(())
}

pub(crate) fn url(field: &str, value: &str) -> Result<()> {
    non_empty(field, value)?;
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(Error::invalid(format!(
            "{} must start with http:// or https://",
            field
        )));
    }
    Ok(())
}

pub(crate) fn content_size(field: &str, value: &str) -> Result<()> {
    if value.len() > MAX_CONTENT_BYTES {
        return Err(Error::invalid(format!(
            "{} exceeds the maximum size of 2 MiB ({} bytes)",
            field,
            value.len()
        )));
    }
    Ok(())
}

/// Exactly one of URL, HTML or Markdown must be given.
pub(crate) fn single_source(
    url_value: Option<&str>,
    html: Option<&str>,
    markdown: Option<&str>,
) -> Result<()> {
    let provided = [url_value, html, markdown]
        .iter()
        .filter(|s| s.is_some())
        .count();
    if provided != 1 {
        return Err(Error::invalid(
            "exactly one of website_url, website_html or website_markdown must be provided",
        ));
    }
    if let Some(u) = url_value {
        url("website_url", u)?;
    }
    if let Some(h) = html {
        non_empty("website_html", h)?;
        content_size("website_html", h)?;
    }
    if let Some(m) = markdown {
        non_empty("website_markdown", m)?;
        content_size("website_markdown", m)?;
    }
    Ok(())
}

pub(crate) fn range<T>(field: &str, value: T, bounds: RangeInclusive<T>) -> Result<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if !bounds.contains(&value) {
        return Err(Error::invalid(format!(
            "{} must be an integer between {} and {}, got {}",
            field,
            bounds.start(),
            bounds.end(),
            value
        )));
    }
    Ok(())
}

pub(crate) fn at_least(field: &str, value: u32, min: u32) -> Result<()> {
    if value < min {
        return Err(Error::invalid(format!(
            "{} must be at least {}, got {}",
            field, min, value
        )));
    }
    Ok(())
}

pub(crate) fn steps(values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::invalid("steps must be a non-empty list"));
    }
    if let Some(i) = values.iter().position(|s| s.trim().is_empty()) {
        return Err(Error::invalid(format!(
            "steps[{}] must be a non-empty string",
            i
        )));
    }
    Ok(())
}

pub(crate) fn object(field: &str, value: &Value) -> Result<()> {
    if !value.is_object() {
        return Err(Error::invalid(format!("{} must be a JSON object", field)));
    }
    Ok(())
}

pub(crate) fn cron(value: &str) -> Result<()> {
    if value.split_whitespace().count() != 5 {
        return Err(Error::invalid(
            "cron_expression must have exactly 5 fields",
        ));
    }
    Ok(())
}
