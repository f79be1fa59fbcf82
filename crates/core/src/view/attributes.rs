//! Attribute text for SKU variants and order lines.

/// Separator between `key: value` pairs.
pub const ATTRIBUTE_SEPARATOR: &str = " · ";

/// Placeholder shown when a variant has no attributes.
pub const EMPTY_ATTRIBUTES: &str = "—";

/// Render an attribute mapping as `"a: 1 · b: 2"`, sorted by key.
///
/// Accepts any key/value iterator so both ordered and hashed maps produce
/// the same stable output. Returns [`EMPTY_ATTRIBUTES`] for an empty map.
pub fn format_attributes<I, K, V>(attributes: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(K, V)> = attributes.into_iter().collect();
    if pairs.is_empty() {
        return EMPTY_ATTRIBUTES.to_string();
    }
    pairs.sort_by(|(a, _), (b, _)| a.as_ref().cmp(b.as_ref()));

    pairs
        .iter()
        .map(|(k, v)| format!("{}: {}", k.as_ref(), v.as_ref()))
        .collect::<Vec<_>>()
        .join(ATTRIBUTE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::*;

    #[test]
    fn test_empty_mapping_is_placeholder() {
        assert_eq!(format_attributes(BTreeMap::<String, String>::new()), "—");
    }

    #[test]
    fn test_keys_are_sorted() {
        let attrs = HashMap::from([("b", "2"), ("a", "1")]);
        assert_eq!(format_attributes(attrs), "a: 1 · b: 2");
    }

    #[test]
    fn test_borrowed_btree_map() {
        let attrs = BTreeMap::from([
            ("size".to_string(), "M".to_string()),
            ("color".to_string(), "indigo".to_string()),
        ]);
        assert_eq!(format_attributes(&attrs), "color: indigo · size: M");
    }
}
