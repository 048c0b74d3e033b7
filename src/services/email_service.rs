use crate::error::{Error, Result};

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

const DEFAULT_FROM_ADDRESS: &str = "noreply@soundchart.local";

/// SMTP settings for the token notification channel. Absent `SMTP_HOST`
/// means email is not configured and issuance skips dispatch.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl MailConfig {
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Sends the upload access code to a freshly invited artist.
#[derive(Clone)]
pub struct Mailer {
    config: MailConfig,
}

impl Mailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    pub async fn send_upload_token(&self, to_email: &str, secret: &str) -> Result<()> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let body = format!(
            "You have been invited to submit a track.\n\n\
            Your single-use access code: {}\n\n\
            The code works exactly once, together with this email address.",
            secret
        );

        let email = Message::builder()
            .from(
                self.config
                    .from_address
                    .parse()
                    .map_err(|err| Error::MailError(format!("from address: {}", err)))?,
            )
            .to(to_email
                .parse()
                .map_err(|err| Error::MailError(format!("to address: {}", err)))?)
            .subject("Your track upload access code")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|err| Error::MailError(err.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
                .map_err(|err| Error::MailError(err.to_string()))?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer
            .send(email)
            .await
            .map_err(|err| Error::MailError(err.to_string()))?;

        tracing::info!(to = to_email, "upload token email sent");
        Ok(())
    }
}
