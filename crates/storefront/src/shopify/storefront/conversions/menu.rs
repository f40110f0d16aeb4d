//! Shop and menu conversions.

use crate::shopify::types::{FooterData, HeaderData, Menu, MenuItem, Shop};

use super::super::queries::{enum_str, footer, header};

macro_rules! menu_conversions {
    ($($module:ident),+ $(,)?) => {$(
        impl From<$module::MenuItemFields> for MenuItem {
            fn from(item: $module::MenuItemFields) -> Self {
                Self {
                    id: item.id,
                    title: item.title,
                    url: item.url,
                    item_type: Some(enum_str(&item.type_)),
                    items: Vec::new(),
                }
            }
        }

        impl From<$module::MenuFieldsItems> for MenuItem {
            fn from(item: $module::MenuFieldsItems) -> Self {
                Self {
                    items: item.items.into_iter().map(MenuItem::from).collect(),
                    ..MenuItem::from(item.menu_item_fields)
                }
            }
        }

        impl From<$module::MenuFields> for Menu {
            fn from(menu: $module::MenuFields) -> Self {
                Self {
                    id: menu.id,
                    items: menu.items.into_iter().map(MenuItem::from).collect(),
                }
            }
        }
    )+};
}

menu_conversions!(header, footer);

impl From<header::ResponseData> for HeaderData {
    fn from(data: header::ResponseData) -> Self {
        Self {
            shop: Shop {
                id: data.shop.id,
                name: data.shop.name,
                description: data.shop.description,
                primary_domain_url: Some(data.shop.primary_domain.url),
            },
            menu: data.menu.map(Menu::from),
        }
    }
}

impl From<footer::ResponseData> for FooterData {
    fn from(data: footer::ResponseData) -> Self {
        Self {
            menu: data.menu.map(Menu::from),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_header_nested_items() {
        let data: header::ResponseData = serde_json::from_value(serde_json::json!({
            "shop": {
                "id": "gid://shopify/Shop/1",
                "name": "Veridian Orchard",
                "description": null,
                "primaryDomain": {"url": "https://veridian-orchard.com"}
            },
            "menu": {
                "id": "gid://shopify/Menu/1",
                "items": [{
                    "id": "gid://shopify/MenuItem/1",
                    "title": "Collections",
                    "type": "CATALOG",
                    "url": "https://veridian-orchard.com/collections",
                    "items": [{
                        "id": "gid://shopify/MenuItem/2",
                        "title": "Ferns",
                        "type": "COLLECTION",
                        "url": null
                    }]
                }]
            }
        }))
        .unwrap();

        let header = HeaderData::from(data);
        assert_eq!(
            header.shop.primary_domain_url.as_deref(),
            Some("https://veridian-orchard.com")
        );
        let menu = header.menu.unwrap();
        assert_eq!(menu.items[0].item_type.as_deref(), Some("CATALOG"));
        assert_eq!(menu.items[0].items[0].title, "Ferns");
        assert_eq!(menu.items[0].items[0].item_type.as_deref(), Some("COLLECTION"));
        assert!(menu.items[0].items[0].url.is_none());
    }

    #[test]
    fn test_unknown_menu_item_type_is_kept() {
        let data: footer::ResponseData = serde_json::from_value(serde_json::json!({
            "menu": {
                "id": "gid://shopify/Menu/2",
                "items": [{
                    "id": "gid://shopify/MenuItem/3",
                    "title": "Care guide",
                    "type": "ARTICLE_GUIDE",
                    "url": "/pages/care",
                    "items": []
                }]
            }
        }))
        .unwrap();

        let menu = FooterData::from(data).menu.unwrap();
        assert_eq!(menu.items[0].item_type.as_deref(), Some("ARTICLE_GUIDE"));
    }

    #[test]
    fn test_convert_footer_without_menu() {
        let data: footer::ResponseData =
            serde_json::from_value(serde_json::json!({"menu": null})).unwrap();
        assert!(FooterData::from(data).menu.is_none());
    }
}
