//! Navigation context shared by pages: header, breadcrumbs and tabs.

use super::{Cart, CurrentSession};

/// What the site header needs: who is signed in and the cart badge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nav {
    pub user_name: Option<String>,
    pub is_seller: bool,
    pub cart_count: u32,
}

impl Nav {
    #[must_use]
    pub fn new(current: Option<&CurrentSession>, cart: &Cart) -> Self {
        Self {
            user_name: current.map(|c| c.user.display_name().to_string()),
            is_seller: current.is_some_and(CurrentSession::is_seller),
            cart_count: cart.count(),
        }
    }

    #[must_use]
    pub const fn signed_in(&self) -> bool {
        self.user_name.is_some()
    }
}

/// One step in a breadcrumb trail. The last step has no link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub href: Option<String>,
}

impl Breadcrumb {
    #[must_use]
    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: Some(href.into()),
        }
    }

    #[must_use]
    pub fn current(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: None,
        }
    }
}

/// A tab in a tab strip; tabs are plain links to sibling pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Seller dashboard tabs, with `active` marking the current page.
#[must_use]
pub fn dashboard_tabs(active: &str) -> Vec<Tab> {
    [
        ("Orders", "/dashboard/orders"),
        ("Products", "/dashboard/products"),
        ("Store settings", "/dashboard/store"),
    ]
    .into_iter()
    .map(|(label, href)| Tab {
        label,
        href,
        active: href == active,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use bazaar_core::{Role, User};
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_nav_for_seller() {
        let current = CurrentSession {
            user: User {
                email: "mali@example.com".to_string(),
                role: Role::Seller,
                ..User::default()
            },
            token: SecretString::from("t"),
        };
        let nav = Nav::new(Some(&current), &Cart::default());
        assert_eq!(nav.user_name.as_deref(), Some("mali"));
        assert!(nav.is_seller);
        assert!(nav.signed_in());

        assert!(!Nav::new(None, &Cart::default()).signed_in());
    }

    #[test]
    fn test_dashboard_tabs_mark_active() {
        let tabs = dashboard_tabs("/dashboard/products");
        let active: Vec<_> = tabs.iter().filter(|t| t.active).map(|t| t.label).collect();
        assert_eq!(active, vec!["Products"]);
    }
}
