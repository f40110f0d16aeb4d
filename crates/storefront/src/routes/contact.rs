//! Contact form route handlers.
//!
//! Submissions are tracked as a Klaviyo event, which triggers a flow that
//! notifies the support team. Without Klaviyo configured they are only
//! logged.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;
use veridian_orchard_core::{Email, Locale};

use crate::components::{Layout, load_layout};
use crate::filters;
use crate::services::CONTACT_METRIC;
use crate::state::AppState;

use super::is_htmx;

/// Where a submission stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Success,
    Error,
}

/// What the shopper is writing about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InquiryType {
    #[default]
    General,
    Support,
    Sales,
}

impl InquiryType {
    pub const ALL: [Self; 3] = [Self::General, Self::Support, Self::Sales];

    /// Form value.
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Support => "support",
            Self::Sales => "sales",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General Inquiry",
            Self::Support => "Customer Support",
            Self::Sales => "Sales & Wholesale",
        }
    }

    /// Unknown values fall back to a general inquiry.
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.value() == value.trim())
            .unwrap_or_default()
    }
}

/// One `<option>` in the inquiry type select.
#[derive(Debug, Clone)]
pub struct InquiryOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Contact form data.
#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub inquiry_type: String,
    #[serde(default)]
    pub message: String,
}

/// Contact form view model, re-filled with the shopper's input on error.
#[derive(Debug, Clone, Default)]
pub struct ContactFormView {
    pub state: FormState,
    pub name: String,
    pub email: String,
    pub inquiry_type: InquiryType,
    pub message: String,
    pub error: Option<String>,
}

impl ContactFormView {
    fn from_form(form: &ContactForm) -> Self {
        Self {
            state: FormState::Idle,
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            inquiry_type: InquiryType::from_value(&form.inquiry_type),
            message: form.message.trim().to_string(),
            error: None,
        }
    }

    fn failed(mut self, message: &str) -> Self {
        self.state = FormState::Error;
        self.error = Some(message.to_string());
        self
    }

    fn succeeded() -> Self {
        Self {
            state: FormState::Success,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.state == FormState::Success
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.state == FormState::Error
    }

    #[must_use]
    pub fn inquiry_options(&self) -> Vec<InquiryOption> {
        InquiryType::ALL
            .into_iter()
            .map(|t| InquiryOption {
                value: t.value(),
                label: t.label(),
                selected: t == self.inquiry_type,
            })
            .collect()
    }
}

/// Validate a submission, returning the parsed e-mail.
fn validate(form: &ContactForm) -> Result<Email, &'static str> {
    if form.name.trim().is_empty() {
        return Err("Please enter your name.");
    }
    let email = Email::parse(&form.email).map_err(|_| "Please enter a valid email address.")?;
    if form.message.trim().is_empty() {
        return Err("Please enter a message.");
    }
    Ok(email)
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact/show.html")]
pub struct ContactShowTemplate {
    pub layout: Layout,
    pub form: ContactFormView,
}

/// Contact form fragment (replaces the form via HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "contact/form_fragment.html")]
pub struct ContactFormTemplate {
    pub form: ContactFormView,
}

/// Display the contact page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> ContactShowTemplate {
    ContactShowTemplate {
        layout: load_layout(&state, &Locale::default(), "/contact", "Contact").await,
        form: ContactFormView::default(),
    }
}

/// Submit the contact form.
#[instrument(skip(state, headers, form), fields(inquiry_type = %form.inquiry_type))]
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ContactForm>,
) -> Response {
    let view = ContactFormView::from_form(&form);

    let view = match validate(&form) {
        Err(message) => view.failed(message),
        Ok(email) => {
            let properties = serde_json::json!({
                "name": view.name,
                "inquiry_type": view.inquiry_type.label(),
                "message": view.message,
                "source": "Contact Page",
            });

            match state.klaviyo() {
                Some(klaviyo) => match klaviyo
                    .track_event(email.as_str(), CONTACT_METRIC, properties)
                    .await
                {
                    Ok(()) => {
                        tracing::info!(email_domain = email.domain(), "Contact form submitted");
                        ContactFormView::succeeded()
                    }
                    Err(e) => {
                        tracing::error!(
                            email_domain = email.domain(),
                            error = %e,
                            "Failed to track contact form"
                        );
                        view.failed("Something went wrong. Please try again.")
                    }
                },
                None => {
                    tracing::info!(
                        email_domain = email.domain(),
                        inquiry_type = view.inquiry_type.value(),
                        "Contact form submitted (Klaviyo not configured)"
                    );
                    ContactFormView::succeeded()
                }
            }
        }
    };

    if is_htmx(&headers) {
        ContactFormTemplate { form: view }.into_response()
    } else {
        ContactShowTemplate {
            layout: load_layout(&state, &Locale::default(), "/contact", "Contact").await,
            form: view,
        }
        .into_response()
    }
}
