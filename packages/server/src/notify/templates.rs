//! Subject, plain-text and HTML bodies for outgoing mail.
//!
//! Draft fields arrive entity-escaped. HTML bodies embed them as-is; text
//! bodies unescape them first.

use super::Notice;
use crate::intake::html;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Notification for the staff inbox.
pub fn staff_notification(notice: &Notice<'_>) -> RenderedEmail {
    let draft = notice.draft;
    let received = notice.submitted_at.format(TIMESTAMP_FORMAT).to_string();

    let mut rows: Vec<(&str, String)> = vec![
        ("Name", draft.name.clone()),
        ("Email", draft.email.clone()),
    ];
    if let Some(phone) = &draft.phone {
        rows.push(("Phone", phone.clone()));
    }
    if let Some(company) = &draft.company {
        rows.push(("Company", company.clone()));
    }
    rows.push(("Service Interest", draft.service_interest.to_string()));
    rows.push(("Priority", draft.priority.to_string()));
    rows.push(("Received", received));
    if let Some(id) = notice.contact_id {
        rows.push(("Contact ID", id.to_string()));
    }

    let mut text = String::from("New contact form submission\n\n");
    for (label, value) in &rows {
        text.push_str(&format!("{label}: {}\n", html::unescape(value)));
    }
    text.push_str(&format!("\nMessage:\n{}\n", html::unescape(&draft.message)));

    let mut table = String::new();
    for (label, value) in &rows {
        table.push_str(&format!(
            "<tr><td style=\"padding:4px 12px 4px 0;font-weight:bold\">{label}</td><td>{value}</td></tr>"
        ));
    }
    let body = format!(
        "<h2>New contact form submission</h2>\
         <table>{table}</table>\
         <h3>Message</h3>\
         <p style=\"white-space:pre-wrap\">{}</p>",
        draft.message
    );

    RenderedEmail {
        subject: format!(
            "New Contact Form Submission - {}",
            html::unescape(&draft.name)
        ),
        text,
        html: wrap(&body),
    }
}

/// Confirmation for the submitter. `support` is quoted as an alternate channel.
pub fn user_confirmation(notice: &Notice<'_>, support: &str) -> RenderedEmail {
    let draft = notice.draft;
    let name = html::unescape(&draft.name);
    let interest = draft.service_interest.to_string();

    let text = format!(
        "Hi {name},\n\n\
         Thank you for reaching out. We have received your message about {interest} \
         and a member of our team will get back to you within one business day.\n\n\
         If your inquiry is urgent, write to {support}.\n\n\
         Your message:\n{}\n",
        html::unescape(&draft.message)
    );

    let body = format!(
        "<p>Hi {},</p>\
         <p>Thank you for reaching out. We have received your message about <strong>{interest}</strong> \
         and a member of our team will get back to you within one business day.</p>\
         <p>If your inquiry is urgent, write to <a href=\"mailto:{support}\">{support}</a>.</p>\
         <blockquote style=\"white-space:pre-wrap\">{}</blockquote>",
        draft.name, draft.message
    );

    RenderedEmail {
        subject: "Thank you for contacting us".to_string(),
        text,
        html: wrap(&body),
    }
}

fn wrap(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><body style=\"font-family:Arial,sans-serif;line-height:1.5\">{body}</body></html>"
    )
}
