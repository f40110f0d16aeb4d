//! Shared harness for router tests.
//!
//! Spins up an in-process axum server that plays the Shopify Storefront API
//! (dispatching on `operationName`) and the Klaviyo API, then points the real
//! application at it.

#![allow(clippy::unwrap_used, dead_code)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request, StatusCode, header},
    routing::post,
};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use veridian_orchard_storefront::{
    app,
    config::{KlaviyoConfig, ShopifyStorefrontConfig, StorefrontConfig},
    services::KlaviyoClient,
    shopify::StorefrontClient,
    state::AppState,
};

pub const CART_ID: &str = "gid://shopify/Cart/c1-abc";
pub const CHECKOUT_URL: &str = "https://veridian-orchard.myshopify.com/cart/c/c1-abc";
pub const FERN_VARIANT: &str = "gid://shopify/ProductVariant/7";
pub const FERN_LINE: &str = "gid://shopify/CartLine/7";

/// Cart held by the mock Storefront API.
#[derive(Debug, Clone, Default)]
pub struct MockCart {
    /// `(variant id, quantity)`
    pub lines: Vec<(String, i64)>,
    pub discount_codes: Vec<String>,
    pub gift_cards: Vec<String>,
}

/// Everything the mock servers saw and will answer with.
#[derive(Debug, Default)]
pub struct MockState {
    /// `(operationName, variables)` for every Storefront request.
    pub requests: Vec<(String, Value)>,
    /// `(path, body)` for every Klaviyo request.
    pub klaviyo: Vec<(String, Value)>,
    pub cart: Option<MockCart>,
    pub header_fails: bool,
    pub footer_without_menu: bool,
    /// Start the app with no Klaviyo credentials.
    pub without_klaviyo: bool,
}

pub type SharedMock = Arc<Mutex<MockState>>;

fn money(amount: i64) -> Value {
    json!({"amount": format!("{amount}.0"), "currencyCode": "CAD"})
}

fn image(id: u32, alt: Option<&str>) -> Value {
    json!({
        "id": format!("gid://shopify/ProductImage/{id}"),
        "url": format!("https://cdn.shopify.com/s/files/1/plant-{id}.jpg"),
        "altText": alt,
        "width": 1024,
        "height": 1024,
    })
}

fn menu_item(id: u32, title: &str, item_type: &str, url: &str) -> Value {
    json!({
        "id": format!("gid://shopify/MenuItem/{id}"),
        "title": title,
        "type": item_type,
        "url": url,
        "items": [],
    })
}

fn header_json() -> Value {
    json!({
        "shop": {
            "id": "gid://shopify/Shop/1",
            "name": "Veridian Orchard",
            "description": "Plants, nurtured.",
            "primaryDomain": {"url": "https://veridian-orchard.com"},
        },
        "menu": {
            "id": "gid://shopify/Menu/1",
            "items": [
                menu_item(1, "Shop", "CATALOG", "https://veridian-orchard.myshopify.com/collections/all"),
                menu_item(2, "Contact", "PAGE", "https://veridian-orchard.com/contact"),
                menu_item(3, "Journal", "HTTP", "https://journal.example.org/ferns"),
            ],
        },
    })
}

fn footer_json(with_menu: bool) -> Value {
    if !with_menu {
        return json!({"menu": null});
    }
    json!({
        "menu": {
            "id": "gid://shopify/Menu/2",
            "items": [
                menu_item(10, "Privacy Policy", "SHOP_POLICY", "https://veridian-orchard.myshopify.com/policies/privacy-policy"),
                menu_item(11, "Refund Policy", "SHOP_POLICY", "https://veridian-orchard.myshopify.com/policies/refund-policy"),
            ],
        },
    })
}

fn catalog_json() -> Value {
    json!({
        "products": {
            "nodes": [
                {
                    "id": "gid://shopify/Product/3",
                    "handle": "boston-fern",
                    "title": "Boston Fern",
                    "featuredImage": image(1, None),
                    "images": {"nodes": [image(1, None), image(2, Some("Fern fronds up close"))]},
                    "priceRange": {"minVariantPrice": money(24), "maxVariantPrice": money(38)},
                },
                {
                    "id": "gid://shopify/Product/4",
                    "handle": "snake-plant",
                    "title": "Snake Plant",
                    "featuredImage": null,
                    "images": {"nodes": []},
                    "priceRange": {"minVariantPrice": money(31), "maxVariantPrice": money(31)},
                },
            ],
            "pageInfo": {
                "hasPreviousPage": false,
                "hasNextPage": true,
                "startCursor": "cursor-1",
                "endCursor": "cursor-2",
            },
        },
    })
}

fn product_json(available: bool) -> Value {
    json!({
        "product": {
            "id": "gid://shopify/Product/3",
            "title": "Boston Fern",
            "vendor": "Veridian Orchard",
            "handle": "boston-fern",
            "description": "A lush, forgiving fern.",
            "descriptionHtml": "<p>A <strong>lush</strong>, forgiving fern.</p>",
            "options": [
                {"name": "Size", "optionValues": [{"name": "Small"}, {"name": "Large"}]},
            ],
            "selectedOrFirstAvailableVariant": {
                "id": FERN_VARIANT,
                "title": "Small",
                "availableForSale": available,
                "sku": "FERN-S",
                "price": money(24),
                "compareAtPrice": null,
                "image": image(1, None),
                "selectedOptions": [{"name": "Size", "value": "Small"}],
            },
            "seo": {"title": null, "description": null},
        },
    })
}

fn line_json(variant: &str, quantity: i64) -> Value {
    json!({
        "__typename": "CartLine",
        "id": variant.replace("ProductVariant", "CartLine"),
        "quantity": quantity,
        "attributes": [],
        "cost": {
            "amountPerQuantity": money(24),
            "compareAtAmountPerQuantity": null,
            "totalAmount": money(24 * quantity),
        },
        "merchandise": {
            "__typename": "ProductVariant",
            "id": variant,
            "title": "Default Title",
            "availableForSale": true,
            "requiresShipping": true,
            "price": money(24),
            "compareAtPrice": null,
            "image": null,
            "product": {
                "id": "gid://shopify/Product/3",
                "handle": "boston-fern",
                "title": "Boston Fern",
                "vendor": "Veridian Orchard",
            },
            "selectedOptions": [{"name": "Title", "value": "Default Title"}],
        },
    })
}

pub fn cart_json(cart: &MockCart) -> Value {
    let total_quantity: i64 = cart.lines.iter().map(|(_, q)| q).sum();
    json!({
        "id": CART_ID,
        "checkoutUrl": CHECKOUT_URL,
        "totalQuantity": total_quantity,
        "note": null,
        "lines": {"nodes": cart.lines.iter().map(|(v, q)| line_json(v, *q)).collect::<Vec<_>>()},
        "cost": {
            "subtotalAmount": money(24 * total_quantity),
            "totalAmount": money(24 * total_quantity),
            "totalTaxAmount": null,
            "totalDutyAmount": null,
        },
        "discountCodes": cart
            .discount_codes
            .iter()
            .map(|code| json!({"code": code, "applicable": code != "EXPIRED"}))
            .collect::<Vec<_>>(),
        "appliedGiftCards": cart
            .gift_cards
            .iter()
            .enumerate()
            .map(|(i, code)| {
                json!({
                    "id": format!("gid://shopify/AppliedGiftCard/{}", i + 1),
                    "lastCharacters": &code[code.len().saturating_sub(4)..],
                    "amountUsed": money(10),
                })
            })
            .collect::<Vec<_>>(),
    })
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

fn mutation_payload(field: &str, cart: Option<&MockCart>, user_error: Option<&str>) -> Value {
    let user_errors = match (cart, user_error) {
        (_, Some(message)) => json!([{"code": "INVALID", "field": ["input"], "message": message}]),
        (None, None) => json!([{
            "code": "INVALID",
            "field": ["cartId"],
            "message": "The specified cart does not exist.",
        }]),
        (Some(_), None) => json!([]),
    };
    let cart = if user_error.is_some() { None } else { cart.map(cart_json) };
    let mut data = serde_json::Map::new();
    data.insert(
        field.to_string(),
        json!({"cart": cart, "userErrors": user_errors}),
    );
    Value::Object(data)
}

fn apply_mutation(state: &mut MockState, operation: &str, vars: &Value) -> Value {
    match operation {
        "CartCreate" => {
            let lines = vars["input"]["lines"]
                .as_array()
                .map(|lines| {
                    lines
                        .iter()
                        .map(|l| {
                            (
                                l["merchandiseId"].as_str().unwrap_or_default().to_string(),
                                l["quantity"].as_i64().unwrap_or(1),
                            )
                        })
                        .collect()
                })
                .unwrap_or_default();
            state.cart = Some(MockCart {
                lines,
                ..MockCart::default()
            });
            mutation_payload("cartCreate", state.cart.as_ref(), None)
        }
        "CartLinesAdd" => {
            if let Some(cart) = state.cart.as_mut() {
                for line in vars["lines"].as_array().into_iter().flatten() {
                    let variant = line["merchandiseId"].as_str().unwrap_or_default();
                    let quantity = line["quantity"].as_i64().unwrap_or(1);
                    match cart.lines.iter_mut().find(|(v, _)| v == variant) {
                        Some((_, q)) => *q += quantity,
                        None => cart.lines.push((variant.to_string(), quantity)),
                    }
                }
            }
            mutation_payload("cartLinesAdd", state.cart.as_ref(), None)
        }
        "CartLinesUpdate" => {
            if let Some(cart) = state.cart.as_mut() {
                for update in vars["lines"].as_array().into_iter().flatten() {
                    let line_id = update["id"].as_str().unwrap_or_default();
                    let quantity = update["quantity"].as_i64().unwrap_or(0);
                    let variant = line_id.replace("CartLine", "ProductVariant");
                    if let Some((_, q)) = cart.lines.iter_mut().find(|(v, _)| *v == variant) {
                        *q = quantity;
                    }
                }
                cart.lines.retain(|(_, q)| *q > 0);
            }
            mutation_payload("cartLinesUpdate", state.cart.as_ref(), None)
        }
        "CartLinesRemove" => {
            if let Some(cart) = state.cart.as_mut() {
                let removed: Vec<String> = string_list(&vars["lineIds"])
                    .iter()
                    .map(|id| id.replace("CartLine", "ProductVariant"))
                    .collect();
                cart.lines.retain(|(v, _)| !removed.contains(v));
            }
            mutation_payload("cartLinesRemove", state.cart.as_ref(), None)
        }
        "CartDiscountCodesUpdate" => {
            let codes = string_list(&vars["discountCodes"]);
            if codes.iter().any(|c| c == "BOGUS") {
                return mutation_payload(
                    "cartDiscountCodesUpdate",
                    state.cart.as_ref(),
                    Some("Discount code BOGUS is not valid"),
                );
            }
            if let Some(cart) = state.cart.as_mut() {
                cart.discount_codes = codes;
            }
            mutation_payload("cartDiscountCodesUpdate", state.cart.as_ref(), None)
        }
        "CartGiftCardCodesUpdate" => {
            if let Some(cart) = state.cart.as_mut() {
                cart.gift_cards = string_list(&vars["giftCardCodes"]);
            }
            mutation_payload("cartGiftCardCodesUpdate", state.cart.as_ref(), None)
        }
        "CartGiftCardCodesRemove" => {
            if let Some(cart) = state.cart.as_mut() {
                let ids = string_list(&vars["appliedGiftCardIds"]);
                let kept = cart
                    .gift_cards
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !ids.contains(&format!("gid://shopify/AppliedGiftCard/{}", i + 1)))
                    .map(|(_, code)| code.clone())
                    .collect();
                cart.gift_cards = kept;
            }
            mutation_payload("cartGiftCardCodesRemove", state.cart.as_ref(), None)
        }
        other => panic!("unexpected operation {other}"),
    }
}

async fn graphql(State(mock): State<SharedMock>, Json(body): Json<Value>) -> Json<Value> {
    let operation = body["operationName"].as_str().unwrap_or_default().to_string();
    let vars = body["variables"].clone();

    let mut state = mock.lock().unwrap();
    state.requests.push((operation.clone(), vars.clone()));

    let data = match operation.as_str() {
        "Header" if state.header_fails => {
            return Json(json!({"errors": [{"message": "Internal error. Looks like something went wrong on our end."}]}));
        }
        "Header" => header_json(),
        "Footer" => footer_json(!state.footer_without_menu),
        "Catalog" => catalog_json(),
        "Product" if vars["handle"] == "boston-fern" => product_json(true),
        "Product" if vars["handle"] == "sold-out-fern" => product_json(false),
        "Product" => json!({"product": null}),
        "Cart" => json!({"cart": state.cart.as_ref().map(cart_json)}),
        mutation => apply_mutation(&mut state, mutation, &vars),
    };

    Json(json!({"data": data}))
}

async fn klaviyo(
    State(mock): State<SharedMock>,
    Path(path): Path<String>,
    body: String,
) -> StatusCode {
    let body = serde_json::from_str(&body).unwrap_or(Value::Null);
    mock.lock().unwrap().klaviyo.push((path, body));
    StatusCode::ACCEPTED
}

/// The application wired to the mock APIs, with a cookie jar of one.
pub struct TestApp {
    pub router: Router,
    pub mock: SharedMock,
    cookie: Option<String>,
}

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(setup: impl FnOnce(&mut MockState)) -> Self {
        let mut state = MockState::default();
        setup(&mut state);
        let with_klaviyo = !state.without_klaviyo;
        let mock: SharedMock = Arc::new(Mutex::new(state));

        let mock_router = Router::new()
            .route("/graphql", post(graphql))
            .route("/klaviyo/{*path}", post(klaviyo))
            .with_state(mock.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, mock_router).await.unwrap();
        });

        let klaviyo_config = KlaviyoConfig {
            api_key: SecretString::from("pk_test_key".to_string()),
            list_id: "LIST123".to_string(),
        };
        let config = StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            public_store_domain: "veridian-orchard.com".to_string(),
            catalog_page_size: 8,
            shopify: ShopifyStorefrontConfig {
                store: "veridian-orchard.myshopify.com".to_string(),
                api_version: "2026-01".to_string(),
                storefront_public_token: "public-token".to_string(),
                storefront_private_token: SecretString::from("private-token".to_string()),
            },
            klaviyo: with_klaviyo.then(|| klaviyo_config.clone()),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let storefront =
            StorefrontClient::with_endpoint(format!("http://{addr}/graphql"), "private-token")
                .unwrap();
        let klaviyo = with_klaviyo.then(|| {
            KlaviyoClient::with_base_url(&klaviyo_config, format!("http://{addr}/klaviyo")).unwrap()
        });
        let state = AppState::from_parts(config, storefront, klaviyo);

        Self {
            router: app(state),
            mock,
            cookie: None,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", "203.0.113.7");
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// POST a urlencoded form, as htmx does when `htmx` is set.
    pub async fn post_form(&mut self, uri: &str, form: &[(&str, &str)], htmx: bool) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();
        let mut builder = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if htmx {
            builder = builder.header("HX-Request", "true");
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    /// Variables of every request for `operation`, oldest first.
    pub fn variables(&self, operation: &str) -> Vec<Value> {
        self.mock
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|(op, _)| op == operation)
            .map(|(_, vars)| vars.clone())
            .collect()
    }

    /// Every Klaviyo request as `(path, body)`.
    pub fn klaviyo_requests(&self) -> Vec<(String, Value)> {
        self.mock.lock().unwrap().klaviyo.clone()
    }

    pub fn set_cart(&self, cart: Option<MockCart>) {
        self.mock.lock().unwrap().cart = cart;
    }

    /// Put one fern line in the cart through the app, so the session holds its ID.
    pub async fn add_fern(&mut self, quantity: &str) -> TestResponse {
        self.post_form(
            "/cart/add",
            &[("variant_id", FERN_VARIANT), ("quantity", quantity)],
            true,
        )
        .await
    }
}
