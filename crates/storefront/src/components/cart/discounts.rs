//! Discount code form.
//!
//! Shopify replaces the whole code list on every update, so applying a code
//! sends it together with the codes already in effect and removing one sends
//! whatever is left.

use crate::shopify::CartDiscountCode;

/// Codes that currently apply to the cart.
#[must_use]
pub fn applicable_codes(codes: &[CartDiscountCode]) -> Vec<String> {
    codes
        .iter()
        .filter(|c| c.applicable)
        .map(|c| c.code.clone())
        .collect()
}

/// Codes to send when a shopper enters `new_code`.
///
/// A blank entry leaves the list unchanged.
#[must_use]
pub fn codes_after_apply(codes: &[CartDiscountCode], new_code: &str) -> Vec<String> {
    let existing = applicable_codes(codes);
    let new_code = new_code.trim();
    if new_code.is_empty() {
        return existing;
    }

    std::iter::once(new_code.to_string())
        .chain(
            existing
                .into_iter()
                .filter(|code| !code.eq_ignore_ascii_case(new_code)),
        )
        .collect()
}

/// Codes to send when a shopper removes `code`.
#[must_use]
pub fn codes_after_remove(codes: &[CartDiscountCode], code: &str) -> Vec<String> {
    applicable_codes(codes)
        .into_iter()
        .filter(|existing| !existing.eq_ignore_ascii_case(code.trim()))
        .collect()
}

/// Discount section of the cart summary.
#[derive(Debug, Clone, Default)]
pub struct DiscountsView {
    /// Applicable codes; the "Discounts" row is hidden when empty.
    pub codes: Vec<String>,
    /// Joined for display, e.g. `SPRING10, FERNS`.
    pub codes_label: String,
}

impl DiscountsView {
    #[must_use]
    pub fn new(codes: &[CartDiscountCode]) -> Self {
        let codes = applicable_codes(codes);
        let codes_label = codes.join(", ");
        Self { codes, codes_label }
    }

    #[must_use]
    pub fn has_codes(&self) -> bool {
        !self.codes.is_empty()
    }
}
