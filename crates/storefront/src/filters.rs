//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use bazaar_core::view::classify_status;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Badge CSS class for a status string.
///
/// Usage in templates: `<span class="{{ order.status|badge }}">`
#[askama::filter_fn]
pub fn badge(status: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(classify_status(&status.to_string()).badge_class())
}

/// Human label for a status word: `"SHIPPED"` and `"shipped"` both become
/// `"Shipped"`.
///
/// Usage in templates: `{{ item.status|status_label }}`
#[askama::filter_fn]
pub fn status_label(status: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let status = status.to_string().trim().replace(['_', '-'], " ").to_lowercase();
    let mut chars = status.chars();
    Ok(chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    }))
}
