//! Empty cart message.

use crate::components::footer::SUPPORT_EMAIL;

#[derive(Debug, Clone)]
pub struct EmptyCartView {
    pub continue_url: String,
    pub support_email: &'static str,
}

impl EmptyCartView {
    /// `locale_prefix` is `""` or e.g. `/fr-ca`.
    #[must_use]
    pub fn new(locale_prefix: &str) -> Self {
        Self {
            continue_url: format!("{locale_prefix}/collections/all"),
            support_email: SUPPORT_EMAIL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_follow_locale() {
        assert_eq!(EmptyCartView::new("").continue_url, "/collections/all");
        assert_eq!(
            EmptyCartView::new("/fr-ca").continue_url,
            "/fr-ca/collections/all"
        );
    }
}
