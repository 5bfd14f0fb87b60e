//! Translation of loosely typed JS arguments into scroll options

use scrollease_core::{EasingType, Result, ScrollOptions};

/// Resolve an optional easing name such as `"cubic-in-out"` or `"CubicOut"`
pub fn easing_from_name(name: Option<&str>) -> Result<Option<EasingType>> {
    name.map(|name| camel_to_kebab(name).parse::<EasingType>()).transpose()
}

/// Build scroll options from the optional duration and easing a JS caller passed
pub fn scroll_options(duration_ms: Option<f64>, easing: Option<&str>) -> Result<ScrollOptions> {
    let mut options = ScrollOptions::new();
    options.duration_ms = duration_ms;
    if let Some(easing) = easing_from_name(easing)? {
        options = options.easing_type(easing);
    }
    Ok(options)
}

fn camel_to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.trim().chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('-') {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == '.' || c == '_' {
            out.push('-');
        } else {
            out.push(c);
        }
    }
    out
}
