//! Newsletter subscription route handlers.
//!
//! Handles the footer signup form by subscribing the address to the Klaviyo
//! newsletter list.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use serde::Deserialize;
use tracing::instrument;
use veridian_orchard_core::Email;

use crate::state::AppState;

/// Newsletter subscription form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    #[serde(default)]
    pub email: String,
}

/// Result fragment template (replaces the form via HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "newsletter/result.html")]
pub struct SubscribeResultTemplate {
    pub success: bool,
    pub message: String,
    pub email: String,
}

impl SubscribeResultTemplate {
    fn success(email: &Email) -> Self {
        Self {
            success: true,
            message: "Thanks for subscribing! Watch your inbox for seasonal care tips.".to_string(),
            email: email.to_string(),
        }
    }

    fn error(message: &str, email: String) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            email,
        }
    }
}

/// Subscribe to newsletter (HTMX).
#[instrument(skip(state, form))]
pub async fn subscribe(
    State(state): State<AppState>,
    Form(form): Form<SubscribeForm>,
) -> SubscribeResultTemplate {
    let Ok(email) = Email::parse(&form.email) else {
        return SubscribeResultTemplate::error(
            "Please enter a valid email address.",
            form.email.trim().to_string(),
        );
    };

    let Some(klaviyo) = state.klaviyo() else {
        tracing::error!("Klaviyo not configured");
        return SubscribeResultTemplate::error(
            "Service temporarily unavailable.",
            email.into_inner(),
        );
    };

    match klaviyo.subscribe_email(email.as_str()).await {
        Ok(()) => {
            tracing::info!(email_domain = email.domain(), "Newsletter subscription successful");
            SubscribeResultTemplate::success(&email)
        }
        Err(e) => {
            tracing::warn!(
                email_domain = email.domain(),
                error = %e,
                "Newsletter subscription failed"
            );
            SubscribeResultTemplate::error(
                "Something went wrong. Please try again.",
                email.into_inner(),
            )
        }
    }
}
