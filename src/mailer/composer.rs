use crate::core::config::RegistrationConfig;
use crate::models::submission::RegistrationSubmission;

/// A fully specified outbound email, ready for the transport.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Display name shown next to the configured sender address.
    pub from_name: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Structured view handed to the body renderer.
#[derive(Debug)]
pub struct MessageView<'a> {
    pub event_name: &'a str,
    pub name: &'a str,
    pub pass_id: &'a str,
    pub mobile: &'a str,
    pub city: &'a str,
    pub business: &'a str,
}

/// Render the shared HTML body from a view model.
pub fn render_body(view: &MessageView<'_>) -> String {
    format!(
        concat!(
            "<div style=\"font-family: Arial, sans-serif; background: #f9f9f9; ",
            "padding: 20px; border-radius: 10px; max-width: 600px; margin: auto;\">",
            "<h2 style=\"color: #007bff;\">Registration Confirmed</h2>",
            "<p>Hello <strong>{name}</strong>,</p>",
            "<p>Thank you for registering for the <strong>{event}</strong>. ",
            "Your unique Pass ID is:</p>",
            "<h3 style=\"color: #28a745;\">Pass ID: {pass_id}</h3>",
            "<p>Below are your details:</p>",
            "<ul>",
            "<li><strong>Mobile:</strong> {mobile}</li>",
            "<li><strong>City:</strong> {city}</li>",
            "<li><strong>Business:</strong> {business}</li>",
            "</ul>",
            "<p>We have received your payment screenshot.</p>",
            "<p style=\"margin-top: 20px;\">Best regards,<br>",
            "<strong>{event} Team</strong></p>",
            "</div>",
        ),
        name = view.name,
        event = view.event_name,
        pass_id = view.pass_id,
        mobile = view.mobile,
        city = view.city,
        business = view.business,
    )
}

/// Build the outbound message set for one validated submission.
///
/// Always produces the admin-directed message; adds a registrant-directed
/// confirmation when the configuration asks for it and an address exists.
/// Pure: no I/O, no failure modes beyond inputs the validator already
/// rejected.
pub fn compose(
    submission: &RegistrationSubmission,
    config: &RegistrationConfig,
) -> Vec<OutboundMessage> {
    let view = MessageView {
        event_name: &config.event_name,
        name: &submission.name,
        pass_id: &submission.pass_id,
        mobile: &submission.mobile,
        city: &submission.city,
        business: &submission.business,
    };

    let html_body = render_body(&view);
    let attachments = build_attachments(submission, &config.event_name);

    let mut messages = vec![OutboundMessage {
        from_name: format!("{} Notification", config.event_name),
        to: config.admin_email.clone(),
        subject: format!(
            "New Registration from {} (Pass ID: {})",
            submission.name, submission.pass_id
        ),
        html_body: html_body.clone(),
        attachments: attachments.clone(),
    }];

    if config.notify_registrant {
        if let Some(email) = &submission.email {
            messages.push(OutboundMessage {
                from_name: config.event_name.clone(),
                to: email.clone(),
                subject: format!(
                    "Registration Confirmed - {} (Pass ID: {})",
                    config.event_name, submission.pass_id
                ),
                html_body,
                attachments,
            });
        }
    }

    messages
}

fn build_attachments(submission: &RegistrationSubmission, event_name: &str) -> Vec<Attachment> {
    let mut attachments = vec![Attachment {
        filename: submission.payment.filename.clone(),
        content_type: submission.payment.content_type.clone(),
        bytes: submission.payment.bytes.clone(),
    }];

    if let Some(pass_image) = &submission.pass_image {
        let event_slug: String = event_name.split_whitespace().collect();

        attachments.push(Attachment {
            filename: format!(
                "{}_Pass_{}_{}.png",
                event_slug, submission.name, submission.pass_id
            ),
            content_type: "image/png".to_string(),
            bytes: pass_image.bytes.clone(),
        });
    }

    attachments
}
