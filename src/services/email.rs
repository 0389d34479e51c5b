//! Transactional email: donor thanks, request status updates and contact forwards

use async_trait::async_trait;
use chrono::NaiveDate;
use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::{
        contact::CreateContactMessage, donation::Donation, enums::RequestStatus,
        school_request::SchoolRequestWithOwner,
    },
};

const SIGNATURE: &str = "Best Regards,\nComputer for Schools Kenya Team";

/// One outgoing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub reply_to: Option<String>,
}

impl Notification {
    /// Thank-you to a donor whose pledge was approved
    pub fn donation_approved(donation: &Donation, collection_date: Option<NaiveDate>) -> Self {
        let pickup = collection_date
            .or(donation.pickup_date)
            .map(|date| date.format("%A %-d %B %Y").to_string())
            .unwrap_or_else(|| "to be confirmed".to_string());

        let body = format!(
            "Dear {name},\n\n\
             Thank you for your generous donation of {quantity} {kind} computer(s).\n\
             Your donation has been approved and our team will collect it on: {pickup}.\n\n\
             Every computer you give helps a Kenyan student get digital skills.\n\n\
             {signature}\n",
            name = donation.donor_name,
            quantity = donation.quantity,
            kind = donation.computer_type,
            pickup = pickup,
            signature = SIGNATURE,
        );

        Self {
            to: donation.email.clone(),
            subject: "Your donation has been approved".to_string(),
            body,
            reply_to: None,
        }
    }

    /// Status update for the school behind a request. `None` when no address resolves.
    pub fn request_status_update(
        entry: &SchoolRequestWithOwner,
        status: RequestStatus,
        admin_comment: Option<&str>,
    ) -> Option<Self> {
        let to = entry.notification_address()?.to_string();
        let request = &entry.request;

        let subject = match status {
            RequestStatus::Approved => "Good News: Your Equipment Request is Approved!",
            RequestStatus::Rejected => "Update on your Equipment Request",
            _ => "Status Update: Equipment Request",
        };

        let mut body = format!(
            "Dear {},\n\nYour request for {} {}(s) has been updated to: {}.\n",
            entry.greeting_name(),
            request.quantity,
            request.computer_type,
            status.as_str().to_uppercase(),
        );
        if let Some(comment) = admin_comment.map(str::trim).filter(|c| !c.is_empty()) {
            body.push_str(&format!("\nAdmin Note: {}\n", comment));
        }
        match status {
            RequestStatus::Approved => body.push_str(
                "\nOur team will contact you shortly regarding delivery/pickup arrangements.\n",
            ),
            RequestStatus::Rejected => body.push_str(
                "\nYou may apply again in the future or contact us for more details.\n",
            ),
            _ => {}
        }
        body.push('\n');
        body.push_str(SIGNATURE);
        body.push('\n');

        Some(Self {
            to,
            subject: subject.to_string(),
            body,
            reply_to: None,
        })
    }

    /// Contact-form message forwarded to the organisation inbox
    pub fn contact_forward(inbox: &str, message: &CreateContactMessage) -> Self {
        let body = format!(
            "New contact message\n\nName: {}\nEmail: {}\nSubject: {}\n\n{}\n\n\
             This message was sent from the Computer for Schools Kenya website contact form.\n",
            message.name, message.email, message.subject, message.message,
        );
        Self {
            to: inbox.to_string(),
            subject: format!("[New Contact] {}", message.subject),
            body,
            reply_to: Some(message.email.clone()),
        }
    }
}

/// Escape text for an HTML body
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// HTML alternative of a plain-text notification body
fn html_body(body: &str) -> String {
    format!(
        r#"<html><body><div style="font-family: Arial, sans-serif">{}</div></body></html>"#,
        escape_html(body).replace('\n', "<br>")
    )
}

/// Best-effort message delivery. Callers log and swallow errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: Notification) -> AppResult<()>;
}

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, notification: &Notification) -> AppResult<Message> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Computers for Schools Kenya");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Notification(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(&notification.to)
            .map_err(|e| AppError::Notification(format!("Invalid to address: {}", e)))?;

        let mut builder = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(notification.subject.as_str());

        if let Some(reply_to) = &notification.reply_to {
            let reply_mailbox = Mailbox::from_str(reply_to)
                .map_err(|e| AppError::Notification(format!("Invalid reply-to address: {}", e)))?;
            builder = builder.reply_to(reply_mailbox);
        }

        builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(notification.body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body(&notification.body)),
                    ),
            )
            .map_err(|e| AppError::Notification(format!("Failed to build email: {}", e)))
    }

    fn transport(&self) -> AppResult<SmtpTransport> {
        let builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Notification(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let builder = match (&self.config.smtp_username, &self.config.smtp_password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(builder.build())
    }
}

#[async_trait]
impl Notifier for EmailService {
    async fn send(&self, notification: Notification) -> AppResult<()> {
        if !self.config.enabled {
            tracing::info!(
                to = %notification.to,
                subject = %notification.subject,
                "Email disabled, notification not sent"
            );
            return Ok(());
        }

        let message = self.build_message(&notification)?;
        let mailer = self.transport()?;

        // lettre's SmtpTransport is blocking
        tokio::task::spawn_blocking(move || mailer.send(&message))
            .await
            .map_err(|e| AppError::Notification(format!("Email task failed: {}", e)))?
            .map_err(|e| AppError::Notification(format!("Failed to send email: {}", e)))?;

        tracing::info!(to = %notification.to, subject = %notification.subject, "Email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        enums::{DonationComputerType, DonationCondition, DonationStatus, RequestComputerType},
        school_request::SchoolRequest,
    };
    use chrono::Utc;
    use uuid::Uuid;

    fn donation(pickup_date: Option<NaiveDate>) -> Donation {
        Donation {
            id: 7,
            user_id: None,
            donor_name: "Jane Wanjiru".to_string(),
            organization: None,
            email: "jane@example.com".to_string(),
            phone: "+254700000000".to_string(),
            address: "Nairobi".to_string(),
            computer_type: DonationComputerType::Laptop,
            quantity: 4,
            condition_status: DonationCondition::Working,
            pickup_date,
            message: None,
            status: DonationStatus::Approved,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request_entry(owner_email: Option<&str>, owner_name: Option<&str>) -> SchoolRequestWithOwner {
        SchoolRequestWithOwner {
            request: SchoolRequest {
                id: 3,
                user_id: Uuid::new_v4(),
                school_id: None,
                school_name: "Kisumu Day".to_string(),
                contact_person: "Head Teacher".to_string(),
                email: "office@kisumuday.ac.ke".to_string(),
                phone: "+254711111111".to_string(),
                location: "Kisumu".to_string(),
                computer_type: RequestComputerType::Desktop,
                quantity: 10,
                justification: "New lab".to_string(),
                status: RequestStatus::Pending,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            owner_email: owner_email.map(str::to_string),
            owner_name: owner_name.map(str::to_string),
        }
    }

    #[test]
    fn test_donation_pickup_date_resolution() {
        let collection = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let stored = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();

        let n = Notification::donation_approved(&donation(Some(stored)), Some(collection));
        assert!(n.body.contains("14 March 2025"));

        let n = Notification::donation_approved(&donation(Some(stored)), None);
        assert!(n.body.contains("1 February 2025"));

        let n = Notification::donation_approved(&donation(None), None);
        assert!(n.body.contains("to be confirmed"));
        assert_eq!(n.to, "jane@example.com");
        assert!(n.body.contains("4 laptop"));
    }

    #[test]
    fn test_request_update_subjects_and_note() {
        let entry = request_entry(Some("owner@kisumuday.ac.ke"), Some("Mary"));

        let n = Notification::request_status_update(&entry, RequestStatus::Approved, Some("Delivery in May"))
            .unwrap();
        assert_eq!(n.to, "owner@kisumuday.ac.ke");
        assert!(n.subject.contains("Approved"));
        assert!(n.body.starts_with("Dear Mary,"));
        assert!(n.body.contains("APPROVED"));
        assert!(n.body.contains("Admin Note: Delivery in May"));
        assert!(n.body.contains("delivery/pickup arrangements"));

        let n = Notification::request_status_update(&entry, RequestStatus::Rejected, None).unwrap();
        assert_eq!(n.subject, "Update on your Equipment Request");
        assert!(!n.body.contains("Admin Note"));
        assert!(n.body.contains("apply again"));

        let n = Notification::request_status_update(&entry, RequestStatus::Pending, Some("  ")).unwrap();
        assert_eq!(n.subject, "Status Update: Equipment Request");
        assert!(!n.body.contains("Admin Note"));
    }

    #[test]
    fn test_request_update_falls_back_to_request_contact() {
        let entry = request_entry(None, None);
        let n = Notification::request_status_update(&entry, RequestStatus::Approved, None).unwrap();
        assert_eq!(n.to, "office@kisumuday.ac.ke");
        assert!(n.body.starts_with("Dear Partner School,"));
    }

    #[test]
    fn test_contact_forward_sets_reply_to() {
        let message = CreateContactMessage {
            name: "Otieno".to_string(),
            email: "otieno@example.com".to_string(),
            subject: "Volunteering".to_string(),
            message: "How can I help?".to_string(),
        };
        let n = Notification::contact_forward("info@cfsk.org", &message);
        assert_eq!(n.to, "info@cfsk.org");
        assert_eq!(n.subject, "[New Contact] Volunteering");
        assert_eq!(n.reply_to.as_deref(), Some("otieno@example.com"));

        let message = CreateContactMessage {
            message: "<script>alert(1)</script>\n<a href=\"http://evil\">click</a>".to_string(),
            ..message
        };
        let html = html_body(&Notification::contact_forward("info@cfsk.org", &message).body);
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<a href"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;<br>&lt;a href=&quot;http://evil&quot;&gt;"));
    }

    #[test]
    fn test_owner_email_blank_falls_back_to_request_contact() {
        let entry = request_entry(Some(" "), Some("Mary"));
        let n = Notification::request_status_update(&entry, RequestStatus::Approved, None).unwrap();
        assert_eq!(n.to, "office@kisumuday.ac.ke");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[tokio::test]
    async fn test_disabled_email_is_logged_not_sent() {
        let service = EmailService::new(EmailConfig::default());
        let n = Notification::donation_approved(&donation(None), None);
        assert!(service.send(n).await.is_ok());
    }
}
