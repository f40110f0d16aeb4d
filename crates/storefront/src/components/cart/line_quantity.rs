//! Quantity adjuster for a cart line.

/// Minus/plus buttons around the current quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineQuantity {
    pub quantity: i64,
    /// Quantity sent by the minus button.
    pub prev: i64,
    /// Quantity sent by the plus button.
    pub next: i64,
    /// One item left; removing goes through the remove button instead.
    pub decrease_disabled: bool,
}

impl LineQuantity {
    #[must_use]
    pub fn new(quantity: i64) -> Self {
        Self {
            quantity,
            prev: (quantity - 1).max(0),
            next: quantity + 1,
            decrease_disabled: quantity <= 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_quantities() {
        let q = LineQuantity::new(3);
        assert_eq!((q.prev, q.next), (2, 4));
        assert!(!q.decrease_disabled);
    }

    #[test]
    fn test_single_item_cannot_decrease() {
        let q = LineQuantity::new(1);
        assert_eq!(q.prev, 0);
        assert!(q.decrease_disabled);
    }

    #[test]
    fn test_never_goes_negative() {
        let q = LineQuantity::new(0);
        assert_eq!(q.prev, 0);
        assert_eq!(q.next, 1);
        assert!(q.decrease_disabled);
    }
}
