//! Type conversion functions for Shopify Storefront API responses.
//!
//! Every derived operation gets its own copy of the shared fragment types, so
//! the conversions are stamped out per operation module with small macros.

pub mod cart;
pub mod menu;
pub mod products;

pub use cart::join_user_errors;

use crate::shopify::types::{Image, Money};

use super::queries::{
    cart as cart_query, cart_create, cart_discount_codes_update, cart_gift_card_codes_remove,
    cart_gift_card_codes_update, cart_lines_add, cart_lines_remove, cart_lines_update, catalog,
    enum_str, product,
};

macro_rules! money_and_image_conversions {
    ($($module:ident),+ $(,)?) => {$(
        impl From<$module::MoneyFields> for Money {
            fn from(money: $module::MoneyFields) -> Self {
                Self {
                    amount: money.amount,
                    currency_code: enum_str(&money.currency_code),
                }
            }
        }

        impl From<$module::ImageFields> for Image {
            fn from(image: $module::ImageFields) -> Self {
                Self {
                    id: image.id,
                    url: image.url,
                    alt_text: image.alt_text,
                    width: image.width,
                    height: image.height,
                }
            }
        }
    )+};
}

money_and_image_conversions!(
    catalog,
    product,
    cart_query,
    cart_create,
    cart_lines_add,
    cart_lines_update,
    cart_lines_remove,
    cart_discount_codes_update,
    cart_gift_card_codes_update,
    cart_gift_card_codes_remove,
);
