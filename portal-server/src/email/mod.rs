//! Outbound email via AWS SES

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SES-backed sender for portal notification emails
#[derive(Clone)]
pub struct EmailService {
    ses: SesClient,
    from: String,
}

impl EmailService {
    pub fn new(ses: SesClient, from: String) -> Self {
        Self { ses, from }
    }

    async fn send(&self, to: &str, subject: &str, body_text: String) -> Result<(), BoxError> {
        let subject = Content::builder().data(subject).build()?;

        let body = Body::builder()
            .text(Content::builder().data(body_text).build()?)
            .build();

        let message = Message::builder().subject(subject).body(body).build();

        self.ses
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await?;

        Ok(())
    }

    pub async fn send_verification_code(
        &self,
        to: &str,
        name: &str,
        code: &str,
    ) -> Result<(), BoxError> {
        let body_text = format!(
            "Olá {name},\n\n\
             O seu código de verificação é: {code}\n\
             Válido durante 5 minutos.\n\n\
             Hello {name},\n\n\
             Your verification code is: {code}\n\
             Valid for 5 minutes."
        );

        self.send(
            to,
            "O seu código de verificação / Your verification code",
            body_text,
        )
        .await?;

        tracing::info!(to = to, "Verification code sent");
        Ok(())
    }

    pub async fn send_partner_approved(&self, to: &str, name: &str) -> Result<(), BoxError> {
        let body_text = format!(
            "Olá {name},\n\n\
             A sua conta de parceiro foi aprovada.\n\
             Já pode iniciar sessão e aceder ao ficheiro de stock.\n\n\
             Hello {name},\n\n\
             Your partner account has been approved.\n\
             You can now log in and access the stock file."
        );

        self.send(to, "Conta aprovada / Account approved", body_text)
            .await?;

        tracing::info!(to = to, "Partner approved email sent");
        Ok(())
    }

    pub async fn send_partner_rejected(&self, to: &str, name: &str) -> Result<(), BoxError> {
        let body_text = format!(
            "Olá {name},\n\n\
             Lamentamos, mas o seu registo de parceiro não foi aprovado.\n\
             Para mais informações contacte o nosso suporte.\n\n\
             Hello {name},\n\n\
             We are sorry, but your partner registration was not approved.\n\
             For more information please contact our support."
        );

        self.send(to, "Registo não aprovado / Registration not approved", body_text)
            .await?;

        tracing::info!(to = to, "Partner rejected email sent");
        Ok(())
    }
}
