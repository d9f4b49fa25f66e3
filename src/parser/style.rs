//! Inline `style` attribute helpers.

use crate::block::Align;

/// Iterate `name: value` declarations of an inline style, names lowercased.
pub(crate) fn declarations(style: &str) -> impl Iterator<Item = (String, &str)> {
    style.split(';').filter_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some((name.to_ascii_lowercase(), value.trim()))
    })
}

/// Value of the first declaration named `name`.
pub(crate) fn property<'a>(style: &'a str, name: &str) -> Option<&'a str> {
    declarations(style)
        .find(|(decl, _)| decl == name)
        .map(|(_, value)| value)
}

/// Leading unsigned integer of a CSS length such as `40px` or `50%`.
pub(crate) fn leading_number(value: &str) -> Option<u32> {
    let value = value.trim();
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

/// A length with the given unit suffix, e.g. `300px` with unit `px`.
pub(crate) fn length_in(value: &str, unit: &str) -> Option<u32> {
    let number = value.trim().strip_suffix(unit)?;
    number.trim().parse().ok()
}

/// Alignment from a `text-align` declaration, then an `align` attribute.
pub(crate) fn align_from(style: Option<&str>, align_attr: Option<&str>) -> Align {
    style
        .and_then(|style| property(style, "text-align"))
        .and_then(Align::from_css)
        .or_else(|| align_attr.and_then(Align::from_css))
        .unwrap_or_default()
}
