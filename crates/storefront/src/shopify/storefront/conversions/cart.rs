//! Cart type conversion functions.

use tracing::debug;

use crate::shopify::types::{
    AppliedGiftCard, Attribute, Cart, CartCost, CartDiscountCode, CartLine, CartLineCost,
    CartMerchandise, CartProduct, CartUserError, Image, Money, SelectedOption,
};

use super::super::queries::{
    cart as cart_query, cart_create, cart_discount_codes_update, cart_gift_card_codes_remove,
    cart_gift_card_codes_update, cart_lines_add, cart_lines_remove, cart_lines_update, enum_str,
};

macro_rules! cart_conversions {
    ($($module:ident),+ $(,)?) => {$(
        impl From<$module::CartLineFields> for CartLine {
            fn from(line: $module::CartLineFields) -> Self {
                let $module::CartLineFieldsMerchandise::ProductVariant(merchandise) =
                    line.merchandise;
                Self {
                    id: line.id,
                    quantity: line.quantity,
                    attributes: line
                        .attributes
                        .into_iter()
                        .map(|a| Attribute {
                            key: a.key,
                            value: a.value,
                        })
                        .collect(),
                    cost: CartLineCost {
                        amount_per_quantity: line.cost.amount_per_quantity.into(),
                        compare_at_amount_per_quantity: line
                            .cost
                            .compare_at_amount_per_quantity
                            .map(Money::from),
                        total_amount: line.cost.total_amount.into(),
                    },
                    merchandise: CartMerchandise {
                        id: merchandise.id,
                        title: merchandise.title,
                        available_for_sale: merchandise.available_for_sale,
                        requires_shipping: merchandise.requires_shipping,
                        price: merchandise.price.into(),
                        compare_at_price: merchandise.compare_at_price.map(Money::from),
                        image: merchandise.image.map(Image::from),
                        product: CartProduct {
                            id: merchandise.product.id,
                            handle: merchandise.product.handle,
                            title: merchandise.product.title,
                            vendor: Some(merchandise.product.vendor),
                        },
                        selected_options: merchandise
                            .selected_options
                            .into_iter()
                            .map(|o| SelectedOption {
                                name: o.name,
                                value: o.value,
                            })
                            .collect(),
                    },
                }
            }
        }

        impl From<$module::CartFields> for Cart {
            fn from(cart: $module::CartFields) -> Self {
                Self {
                    id: cart.id,
                    checkout_url: cart.checkout_url,
                    total_quantity: cart.total_quantity,
                    note: cart.note,
                    // Bundles (componentizable lines) are not sold here.
                    lines: cart
                        .lines
                        .nodes
                        .into_iter()
                        .filter_map(|node| match node {
                            $module::CartFieldsLinesNodes::CartLine(line) => {
                                Some(CartLine::from(line))
                            }
                            $module::CartFieldsLinesNodes::ComponentizableCartLine => None,
                        })
                        .collect(),
                    cost: CartCost {
                        subtotal: Some(cart.cost.subtotal_amount.into()),
                        total: Some(cart.cost.total_amount.into()),
                        total_tax: cart.cost.total_tax_amount.map(Money::from),
                        total_duty: cart.cost.total_duty_amount.map(Money::from),
                    },
                    discount_codes: cart
                        .discount_codes
                        .into_iter()
                        .map(|d| CartDiscountCode {
                            code: d.code,
                            applicable: d.applicable,
                        })
                        .collect(),
                    applied_gift_cards: cart
                        .applied_gift_cards
                        .into_iter()
                        .map(|g| AppliedGiftCard {
                            id: g.id,
                            last_characters: g.last_characters,
                            amount_used: g.amount_used.into(),
                        })
                        .collect(),
                }
            }
        }
    )+};
}

// `CartUserErrorFields` is only generated for mutations that select `userErrors`.
macro_rules! cart_user_error_conversions {
    ($($module:ident),+ $(,)?) => {$(
        impl From<$module::CartUserErrorFields> for CartUserError {
            fn from(error: $module::CartUserErrorFields) -> Self {
                Self {
                    code: error.code.as_ref().map(enum_str),
                    field: error.field,
                    message: error.message,
                }
            }
        }
    )+};
}

cart_conversions!(
    cart_query,
    cart_create,
    cart_lines_add,
    cart_lines_update,
    cart_lines_remove,
    cart_discount_codes_update,
    cart_gift_card_codes_update,
    cart_gift_card_codes_remove,
);

cart_user_error_conversions!(
    cart_create,
    cart_lines_add,
    cart_lines_update,
    cart_lines_remove,
    cart_discount_codes_update,
    cart_gift_card_codes_update,
    cart_gift_card_codes_remove,
);

/// Join `userErrors` into a single shopper-facing message.
pub fn join_user_errors(errors: Vec<CartUserError>) -> String {
    errors
        .into_iter()
        .map(|error| {
            debug!(
                code = error.code.as_deref().unwrap_or("-"),
                field = ?error.field,
                message = %error.message,
                "Cart user error"
            );
            error.message
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "__typename": "CartLine",
            "id": id,
            "quantity": 3,
            "attributes": [],
            "cost": {
                "amountPerQuantity": {"amount": "12.0", "currencyCode": "CAD"},
                "compareAtAmountPerQuantity": null,
                "totalAmount": {"amount": "36.0", "currencyCode": "CAD"}
            },
            "merchandise": {
                "__typename": "ProductVariant",
                "id": "gid://shopify/ProductVariant/9",
                "title": "Default Title",
                "availableForSale": true,
                "requiresShipping": true,
                "price": {"amount": "12.0", "currencyCode": "CAD"},
                "compareAtPrice": null,
                "image": null,
                "product": {"id": "gid://shopify/Product/4", "handle": "pothos", "title": "Pothos", "vendor": "Veridian Orchard"},
                "selectedOptions": [{"name": "Title", "value": "Default Title"}]
            }
        })
    }

    fn cart_json() -> serde_json::Value {
        serde_json::json!({
            "id": "gid://shopify/Cart/abc?key=1",
            "checkoutUrl": "https://veridian-orchard.myshopify.com/cart/c/abc",
            "totalQuantity": 3,
            "note": null,
            "lines": {"nodes": [
                line_json("gid://shopify/CartLine/1"),
                {"__typename": "ComponentizableCartLine"}
            ]},
            "cost": {
                "subtotalAmount": {"amount": "36.0", "currencyCode": "CAD"},
                "totalAmount": {"amount": "31.0", "currencyCode": "CAD"},
                "totalTaxAmount": null,
                "totalDutyAmount": null
            },
            "discountCodes": [{"code": "SPRING", "applicable": true}, {"code": "OLD", "applicable": false}],
            "appliedGiftCards": [{"id": "gid://shopify/AppliedGiftCard/5", "lastCharacters": "WXYZ", "amountUsed": {"amount": "5.0", "currencyCode": "CAD"}}]
        })
    }

    #[test]
    fn test_convert_cart() {
        let fields: cart_query::CartFields = serde_json::from_value(cart_json()).unwrap();
        let cart = Cart::from(fields);

        assert_eq!(cart.total_quantity, 3);
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].merchandise.product.handle, "pothos");
        assert_eq!(cart.lines[0].cost.total_amount.currency_code, "CAD");
        assert_eq!(cart.cost.subtotal.unwrap().amount, "36.0");
        assert!(cart.cost.total_tax.is_none());
        assert_eq!(cart.discount_codes.len(), 2);
        assert_eq!(cart.applied_gift_cards[0].last_characters, "WXYZ");
    }

    #[test]
    fn test_convert_user_error_keeps_code() {
        let error: cart_lines_add::CartUserErrorFields = serde_json::from_value(serde_json::json!({
            "code": "MERCHANDISE_OUT_OF_STOCK",
            "field": ["lines", "0", "quantity"],
            "message": "Out of stock"
        }))
        .unwrap();

        let error = CartUserError::from(error);
        assert_eq!(error.code.as_deref(), Some("MERCHANDISE_OUT_OF_STOCK"));
        assert_eq!(error.field.unwrap().len(), 3);
    }

    #[test]
    fn test_join_user_errors() {
        let errors = vec![
            CartUserError {
                code: Some("INVALID".to_string()),
                field: None,
                message: "Gift card code is invalid".to_string(),
            },
            CartUserError {
                code: None,
                field: Some(vec!["lines".to_string()]),
                message: "Quantity too high".to_string(),
            },
        ];
        assert_eq!(
            join_user_errors(errors),
            "Gift card code is invalid; Quantity too high"
        );
    }
}
