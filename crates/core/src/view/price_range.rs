//! Price-range summary for product cards.

use crate::documents::SkuVariant;
use crate::types::Price;

/// Separator between the low and high end of a range (EN DASH).
pub const PRICE_RANGE_SEPARATOR: char = '\u{2013}';

/// Display summary of a product's variant prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRangeSummary {
    /// Number of variants, priced or not.
    pub variant_count: usize,
    /// Lowest effective price.
    pub min: Price,
    /// Highest effective price.
    pub max: Price,
    /// `"120.00"` or `"120.00–180.00"`.
    pub display: String,
}

impl PriceRangeSummary {
    /// Whether the variants span more than one price.
    #[must_use]
    pub fn is_range(&self) -> bool {
        self.min != self.max
    }
}

/// Summarize variant prices as a single price or a `min–max` range.
///
/// Variants without a price are ignored. When no variant carries a price
/// (including an empty list) the default price is shown on its own.
#[must_use]
pub fn summarize_price_range(variants: &[SkuVariant], default_price: Price) -> PriceRangeSummary {
    let priced = variants.iter().filter_map(|v| v.price);
    let (min, max) = priced.fold(None, |acc: Option<(Price, Price)>, p| match acc {
        None => Some((p, p)),
        Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
    })
    .unwrap_or((default_price, default_price));

    let display = if min == max {
        min.to_string()
    } else {
        format!("{min}{PRICE_RANGE_SEPARATOR}{max}")
    };

    PriceRangeSummary {
        variant_count: variants.len(),
        min,
        max,
        display,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sku(price: Option<&str>) -> SkuVariant {
        SkuVariant {
            price: price.and_then(Price::parse),
            ..SkuVariant::default()
        }
    }

    #[test]
    fn test_distinct_prices_render_range() {
        let variants = [sku(Some("180")), sku(Some("120.5")), sku(Some("150"))];
        let summary = summarize_price_range(&variants, Price::from(99));
        assert_eq!(summary.variant_count, 3);
        assert_eq!(summary.display, "120.50–180.00");
        assert!(summary.is_range());
    }

    #[test]
    fn test_equal_prices_render_single_value() {
        let variants = [sku(Some("75")), sku(Some("75.00"))];
        let summary = summarize_price_range(&variants, Price::from(10));
        assert_eq!(summary.display, "75.00");
        assert!(!summary.is_range());
    }

    #[test]
    fn test_single_variant() {
        let summary = summarize_price_range(&[sku(Some("42.1"))], Price::ZERO);
        assert_eq!(summary.variant_count, 1);
        assert_eq!(summary.display, "42.10");
    }

    #[test]
    fn test_no_variants_falls_back_to_default() {
        let summary = summarize_price_range(&[], Price::parse("250").unwrap());
        assert_eq!(summary.variant_count, 0);
        assert_eq!(summary.display, "250.00");
    }

    #[test]
    fn test_unpriced_variants_use_default_only_when_none_priced() {
        let summary = summarize_price_range(&[sku(None), sku(None)], Price::from(30));
        assert_eq!(summary.variant_count, 2);
        assert_eq!(summary.display, "30.00");

        let summary = summarize_price_range(&[sku(None), sku(Some("45"))], Price::from(30));
        assert_eq!(summary.display, "45.00");
    }
}
