//! Contact-notification email delivery.
//!
//! Two providers implement [`EmailProvider`]:
//!
//! - [`ResendMailer`] posts to the Resend HTTP API with `reqwest`.
//! - [`SmtpMailer`] relays through any SMTP server with `lettre`.
//!
//! [`EmailConfig::from_env`] picks one (Resend wins when both are configured)
//! and returns `None` when email is not configured at all.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use folio_core::content::ContactMessage;
use serde::Deserialize;

/// Default sender when `CONTACT_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "Portfolio Contact <onboarding@resend.dev>";

const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// HTTP request timeout for a single provider call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// The provider answered and refused the message. Its message is safe to
    /// show to the submitter.
    #[error("{0}")]
    Rejected(String),

    /// The HTTP call to the provider failed (network, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A configured sender or recipient address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

impl EmailError {
    /// Whether the failure was reported by the provider rather than caused
    /// by transport or configuration.
    pub fn is_rejection(&self) -> bool {
        matches!(self, EmailError::Rejected(_))
    }
}

// ---------------------------------------------------------------------------
// ContactEmail
// ---------------------------------------------------------------------------

/// A fully addressed notification ready for a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactEmail {
    pub from: String,
    pub to: String,
    /// The submitter, so the owner can answer directly.
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

impl ContactEmail {
    /// Address a contact submission from the fixed sender to the fixed
    /// recipient. User text is HTML-escaped.
    pub fn for_message(message: &ContactMessage, from: &str, to: &str) -> Self {
        let html = format!(
            "<h2>New Contact Form Message</h2>\
             <p><strong>Name:</strong> {}</p>\
             <p><strong>Email:</strong> {}</p>\
             <p><strong>Message:</strong></p>\
             <p>{}</p>",
            escape_html(&message.name),
            escape_html(&message.email),
            escape_html(&message.message),
        );
        Self {
            from: from.to_string(),
            to: to.to_string(),
            reply_to: message.email.clone(),
            subject: format!("New message from {}", message.name),
            html,
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// A transactional email provider. Single attempt, no retry.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Send the email and return the provider's message id.
    async fn send(&self, email: &ContactEmail) -> Result<String, EmailError>;
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum EmailTransport {
    Resend {
        api_key: String,
        api_url: String,
    },
    Smtp {
        host: String,
        port: u16,
        user: Option<String>,
        password: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub transport: EmailTransport,
    /// Fixed sender, `"Display Name <address>"` or a bare address.
    pub from_address: String,
    /// Fixed recipient: the site owner.
    pub to_address: String,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` when neither provider is configured or `CONTACT_TO` is
    /// missing.
    ///
    /// | Variable          | Required            | Default                                      |
    /// |-------------------|---------------------|----------------------------------------------|
    /// | `CONTACT_TO`      | yes                 | -                                            |
    /// | `CONTACT_FROM`    | no                  | `Portfolio Contact <onboarding@resend.dev>`  |
    /// | `RESEND_API_KEY`  | one of the two      | -                                            |
    /// | `RESEND_API_URL`  | no                  | `https://api.resend.com`                     |
    /// | `SMTP_HOST`       | one of the two      | -                                            |
    /// | `SMTP_PORT`       | no                  | `587`                                        |
    /// | `SMTP_USER`       | no                  | -                                            |
    /// | `SMTP_PASSWORD`   | no                  | -                                            |
    pub fn from_env() -> Option<Self> {
        let to_address = std::env::var("CONTACT_TO").ok()?;
        let transport = if let Ok(api_key) = std::env::var("RESEND_API_KEY") {
            EmailTransport::Resend {
                api_key,
                api_url: std::env::var("RESEND_API_URL")
                    .unwrap_or_else(|_| DEFAULT_RESEND_API_URL.to_string()),
            }
        } else {
            EmailTransport::Smtp {
                host: std::env::var("SMTP_HOST").ok()?,
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_SMTP_PORT),
                user: std::env::var("SMTP_USER").ok(),
                password: std::env::var("SMTP_PASSWORD").ok(),
            }
        };
        Some(Self {
            transport,
            from_address: std::env::var("CONTACT_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            to_address,
        })
    }

    /// Construct the configured provider.
    pub fn build_provider(&self) -> Result<Arc<dyn EmailProvider>, EmailError> {
        Ok(match &self.transport {
            EmailTransport::Resend { api_key, api_url } => {
                Arc::new(ResendMailer::new(api_key.clone(), api_url.clone())?)
            }
            EmailTransport::Smtp {
                host,
                port,
                user,
                password,
            } => Arc::new(SmtpMailer::new(host, *port, user.clone(), password.clone())?),
        })
    }
}

// ---------------------------------------------------------------------------
// ContactNotifier
// ---------------------------------------------------------------------------

/// Forwards contact submissions to the site owner through a provider, with
/// a fixed sender and recipient.
pub struct ContactNotifier {
    provider: Arc<dyn EmailProvider>,
    from: String,
    to: String,
}

impl ContactNotifier {
    pub fn new(provider: Arc<dyn EmailProvider>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            provider,
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn from_config(config: &EmailConfig) -> Result<Self, EmailError> {
        Ok(Self::new(
            config.build_provider()?,
            config.from_address.clone(),
            config.to_address.clone(),
        ))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Send one notification. Returns the provider's message id.
    pub async fn notify(&self, message: &ContactMessage) -> Result<String, EmailError> {
        let email = ContactEmail::for_message(message, &self.from, &self.to);
        self.provider.send(&email).await
    }
}

// ---------------------------------------------------------------------------
// ResendMailer
// ---------------------------------------------------------------------------

pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

#[derive(Deserialize)]
struct ResendSent {
    id: String,
}

#[derive(Deserialize)]
struct ResendFailure {
    message: String,
}

impl ResendMailer {
    pub fn new(api_key: String, api_url: String) -> Result<Self, EmailError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EmailProvider for ResendMailer {
    fn name(&self) -> &'static str {
        "resend"
    }

    async fn send(&self, email: &ContactEmail) -> Result<String, EmailError> {
        let body = serde_json::json!({
            "from": email.from,
            "to": [email.to],
            "subject": email.subject,
            "reply_to": email.reply_to,
            "html": email.html,
        });

        let response = self
            .client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ResendFailure>().await {
                Ok(failure) => failure.message,
                Err(_) => format!("Email provider returned HTTP {}", status.as_u16()),
            };
            tracing::warn!(status = status.as_u16(), %message, "Resend rejected email");
            return Err(EmailError::Rejected(message));
        }

        let sent: ResendSent = response.json().await?;
        tracing::info!(id = %sent.id, to = %email.to, "Contact email sent via Resend");
        Ok(sent.id)
    }
}

// ---------------------------------------------------------------------------
// SmtpMailer
// ---------------------------------------------------------------------------

pub struct SmtpMailer {
    transport: lettre::AsyncSmtpTransport<lettre::Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        port: u16,
        user: Option<String>,
        password: Option<String>,
    ) -> Result<Self, EmailError> {
        use lettre::transport::smtp::authentication::Credentials;
        use lettre::{AsyncSmtpTransport, Tokio1Executor};

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?.port(port);
        if let (Some(user), Some(pass)) = (user, password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }
        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl EmailProvider for SmtpMailer {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, email: &ContactEmail) -> Result<String, EmailError> {
        use lettre::message::{header::ContentType, Mailbox};
        use lettre::{AsyncTransport, Message};

        let reply_to: Mailbox = email
            .reply_to
            .parse()
            .map_err(|_| EmailError::Rejected(format!("Invalid reply-to address: {}", email.reply_to)))?;

        let id = uuid::Uuid::new_v4().to_string();
        let message = Message::builder()
            .message_id(Some(format!("<{id}@folio>")))
            .from(email.from.parse()?)
            .to(email.to.parse()?)
            .reply_to(reply_to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        match self.transport.send(message).await {
            Ok(_) => {
                tracing::info!(%id, to = %email.to, "Contact email sent via SMTP");
                Ok(id)
            }
            Err(e) if e.is_permanent() => Err(EmailError::Rejected(e.to_string())),
            Err(e) => Err(EmailError::Transport(e)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
