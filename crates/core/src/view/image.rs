//! Image CDN URL construction.

const CDN_HOST: &str = "https://res.cloudinary.com";

/// Delivery transformation applied by the CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTransform {
    /// Square crop for product cards.
    Thumbnail,
    /// Large image for product detail pages.
    Detail,
    /// Wide crop for store headers.
    Banner,
    /// Small square for store logos and avatars.
    Avatar,
    /// Format/quality negotiation only.
    Original,
}

impl ImageTransform {
    const fn segment(self) -> &'static str {
        match self {
            Self::Thumbnail => "c_fill,w_480,h_480,f_auto,q_auto",
            Self::Detail => "c_limit,w_1200,f_auto,q_auto",
            Self::Banner => "c_fill,w_1600,h_400,f_auto,q_auto",
            Self::Avatar => "c_fill,w_96,h_96,f_auto,q_auto",
            Self::Original => "f_auto,q_auto",
        }
    }
}

/// Builds delivery URLs for images stored on the CDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCdn {
    cloud_name: String,
}

impl ImageCdn {
    /// Create a builder for the given CDN cloud identifier.
    #[must_use]
    pub fn new(cloud_name: impl Into<String>) -> Self {
        Self {
            cloud_name: cloud_name.into(),
        }
    }

    /// URL for an image reference.
    ///
    /// Absolute `http(s)` URLs pass through untouched. Blank references
    /// yield `None` so templates can render a placeholder.
    #[must_use]
    pub fn url(&self, reference: Option<&str>, transform: ImageTransform) -> Option<String> {
        let reference = reference.map(str::trim).filter(|r| !r.is_empty())?;
        if reference.starts_with("https://") || reference.starts_with("http://") {
            return Some(reference.to_string());
        }
        Some(format!(
            "{CDN_HOST}/{}/image/upload/{}/{}",
            self.cloud_name,
            transform.segment(),
            reference.trim_start_matches('/')
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_public_id_becomes_cdn_url() {
        let cdn = ImageCdn::new("bazaar-demo");
        assert_eq!(
            cdn.url(Some("products/mug-01"), ImageTransform::Thumbnail).unwrap(),
            "https://res.cloudinary.com/bazaar-demo/image/upload/c_fill,w_480,h_480,f_auto,q_auto/products/mug-01"
        );
    }

    #[test]
    fn test_absolute_url_passes_through() {
        let cdn = ImageCdn::new("bazaar-demo");
        let url = "https://images.example.com/a.jpg";
        assert_eq!(cdn.url(Some(url), ImageTransform::Banner).unwrap(), url);
    }

    #[test]
    fn test_blank_reference_is_none() {
        let cdn = ImageCdn::new("bazaar-demo");
        assert!(cdn.url(None, ImageTransform::Original).is_none());
        assert!(cdn.url(Some("  "), ImageTransform::Original).is_none());
    }
}
