//! Gift card form.
//!
//! Shopify only echoes back the last four characters of an applied card, so
//! the full codes a shopper entered are kept in the session and re-sent with
//! each new one.

use crate::shopify::AppliedGiftCard;

/// Mask an applied card for display: `···· ABCD`.
#[must_use]
pub fn mask(last_characters: &str) -> String {
    format!("···· {last_characters}")
}

/// Strip all whitespace from an entered code.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Codes to send when a shopper enters `new_code`: the new one first, then
/// every code remembered from earlier submissions.
#[must_use]
pub fn codes_to_send(saved: &[String], new_code: &str) -> Vec<String> {
    let new_code = normalize_code(new_code);
    let mut codes = Vec::with_capacity(saved.len() + 1);
    if !new_code.is_empty() {
        codes.push(new_code);
    }
    for code in saved {
        if !codes.iter().any(|c| c.eq_ignore_ascii_case(code)) {
            codes.push(code.clone());
        }
    }
    codes
}

/// Add `code` to the remembered list if it isn't there already.
#[must_use]
pub fn remember_code(saved: &[String], code: &str) -> Vec<String> {
    let code = normalize_code(code);
    let mut codes = saved.to_vec();
    if !code.is_empty() && !codes.iter().any(|c| c.eq_ignore_ascii_case(&code)) {
        codes.push(code);
    }
    codes
}

/// Drop remembered codes that no longer match an applied card.
///
/// Cards are matched on their last four characters, the only part of the
/// code Shopify returns.
#[must_use]
pub fn prune_codes(saved: &[String], applied: &[AppliedGiftCard]) -> Vec<String> {
    saved
        .iter()
        .filter(|code| {
            applied.iter().any(|card| {
                !card.last_characters.is_empty()
                    && code
                        .to_ascii_uppercase()
                        .ends_with(&card.last_characters.to_ascii_uppercase())
            })
        })
        .cloned()
        .collect()
}

/// An applied card row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedGiftCardView {
    pub id: String,
    pub masked: String,
    pub amount_used: String,
}

/// Gift card section of the cart summary.
#[derive(Debug, Clone, Default)]
pub struct GiftCardsView {
    pub cards: Vec<AppliedGiftCardView>,
}

impl GiftCardsView {
    #[must_use]
    pub fn new(applied: &[AppliedGiftCard]) -> Self {
        Self {
            cards: applied
                .iter()
                .map(|card| AppliedGiftCardView {
                    id: card.id.clone(),
                    masked: mask(&card.last_characters),
                    amount_used: card.amount_used.display(),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn has_cards(&self) -> bool {
        !self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopify::Money;

    fn card(id: &str, last: &str) -> AppliedGiftCard {
        AppliedGiftCard {
            id: format!("gid://shopify/AppliedGiftCard/{id}"),
            last_characters: last.to_string(),
            amount_used: Money {
                amount: "25.0".to_string(),
                currency_code: "CAD".to_string(),
            },
        }
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("X7Q2"), "···· X7Q2");
    }

    #[test]
    fn test_normalize_strips_whitespace() {
        assert_eq!(normalize_code(" abcd efgh\tx7q2 "), "abcdefghx7q2");
    }

    #[test]
    fn test_codes_to_send_puts_new_first() {
        let saved = vec!["OLDCARD0001".to_string()];
        assert_eq!(
            codes_to_send(&saved, "NEW CARD 0002"),
            vec!["NEWCARD0002", "OLDCARD0001"]
        );
        assert_eq!(codes_to_send(&saved, "oldcard0001"), vec!["oldcard0001"]);
        assert_eq!(codes_to_send(&saved, "   "), saved);
    }

    #[test]
    fn test_remember_deduplicates() {
        let saved = remember_code(&[], "ABCD 1234");
        assert_eq!(saved, vec!["ABCD1234"]);
        assert_eq!(remember_code(&saved, "abcd1234"), saved);
        assert_eq!(remember_code(&saved, ""), saved);
    }

    #[test]
    fn test_prune_keeps_matching_suffix() {
        let saved = vec!["GIFTAAAA1111".to_string(), "GIFTBBBB2222".to_string()];
        let applied = vec![card("1", "2222")];
        assert_eq!(prune_codes(&saved, &applied), vec!["GIFTBBBB2222"]);
        assert!(prune_codes(&saved, &[]).is_empty());
    }

    #[test]
    fn test_view_masks_cards() {
        let view = GiftCardsView::new(&[card("9", "X7Q2")]);
        assert!(view.has_cards());
        assert_eq!(view.cards[0].masked, "···· X7Q2");
        assert_eq!(view.cards[0].amount_used, "$25.00");
    }
}
