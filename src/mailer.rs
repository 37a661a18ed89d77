//! Outbound email over SMTP, used for the password-reset flow.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::config;
use crate::error::ApiError;

pub async fn send_text_email(to: &str, subject: &str, body: String) -> Result<(), ApiError> {
    let cfg = config();
    let message = Message::builder()
        .from(
            cfg.smtp
                .username
                .parse()
                .map_err(|_| ApiError::internal("Something went wrong"))?,
        )
        .to(to
            .parse()
            .map_err(|_| ApiError::bad_request("Invalid email address"))?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|err| {
            tracing::error!("failed to build email: {err}");
            ApiError::internal("Something went wrong")
        })?;

    let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp.host)
        .map_err(|err| {
            tracing::error!("failed to configure smtp transport: {err}");
            ApiError::internal("Something went wrong")
        })?
        .port(cfg.smtp.port)
        .credentials(Credentials::new(
            cfg.smtp.username.clone(),
            cfg.smtp.password.clone(),
        ))
        .build();

    transport.send(message).await.map_err(|err| {
        tracing::error!("failed to send email: {err}");
        ApiError::internal("Something went wrong")
    })?;
    Ok(())
}
