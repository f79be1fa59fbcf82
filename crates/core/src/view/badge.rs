//! Status-to-badge classification.
//!
//! Statuses reach the UI as free text from several vocabularies (store
//! review, product listing, order, payment, item fulfillment). They are
//! folded into a handful of visual tones by membership tests.

/// Visual tone of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BadgeTone {
    Success,
    Warning,
    Info,
    Danger,
    #[default]
    Neutral,
}

const SUCCESS: &[&str] = &[
    "approved",
    "active",
    "delivered",
    "completed",
    "paid",
    "success",
    "fulfilled",
];

const WARNING: &[&str] = &[
    "pending",
    "processing",
    "packed",
    "unpaid",
    "awaiting_payment",
    "draft",
    "partially_shipped",
];

const INFO: &[&str] = &["shipped", "in_transit", "out_for_delivery", "confirmed"];

const DANGER: &[&str] = &[
    "rejected",
    "canceled",
    "cancelled",
    "failed",
    "refunded",
    "expired",
];

impl BadgeTone {
    /// CSS classes for the badge component.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Success => "badge badge-success",
            Self::Warning => "badge badge-warning",
            Self::Info => "badge badge-info",
            Self::Danger => "badge badge-destructive",
            Self::Neutral => "badge badge-neutral",
        }
    }
}

/// Classify a free-text status into a badge tone.
///
/// Matching ignores case and surrounding whitespace, and treats spaces and
/// hyphens as underscores (`"In Transit"`, `"in-transit"` and `"IN_TRANSIT"`
/// are the same). Anything unrecognized is [`BadgeTone::Neutral`].
#[must_use]
pub fn classify_status(status: &str) -> BadgeTone {
    let key: String = status
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect();

    [
        (SUCCESS, BadgeTone::Success),
        (WARNING, BadgeTone::Warning),
        (INFO, BadgeTone::Info),
        (DANGER, BadgeTone::Danger),
    ]
    .into_iter()
    .find(|(vocabulary, _)| vocabulary.contains(&key.as_str()))
    .map_or(BadgeTone::Neutral, |(_, tone)| tone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_membership() {
        assert_eq!(classify_status("DELIVERED"), BadgeTone::Success);
        assert_eq!(classify_status("Approved"), BadgeTone::Success);
        assert_eq!(classify_status("  pending "), BadgeTone::Warning);
        assert_eq!(classify_status("Shipped"), BadgeTone::Info);
        assert_eq!(classify_status("CANCELLED"), BadgeTone::Danger);
    }

    #[test]
    fn test_separators_are_normalized() {
        assert_eq!(classify_status("In Transit"), BadgeTone::Info);
        assert_eq!(classify_status("awaiting-payment"), BadgeTone::Warning);
    }

    #[test]
    fn test_unknown_is_neutral() {
        assert_eq!(classify_status(""), BadgeTone::Neutral);
        assert_eq!(classify_status("on the moon"), BadgeTone::Neutral);
        assert_eq!(
            classify_status("whatever").badge_class(),
            "badge badge-neutral"
        );
    }
}
