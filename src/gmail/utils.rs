//! Gmail utility functions
//!
//! Message construction, base64url encoding and header extraction.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::Value;

use crate::gmail::types::EmailSummary;

/// Line separator for RFC 2822 messages
const CRLF: &str = "\r\n";

/// An outgoing HTML email
#[derive(Debug, Clone, Default)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub cc: Option<String>,
    pub bcc: Option<String>,
}

/// Build the RFC 2822 text of an outgoing email.
///
/// Header order is fixed; `Cc`/`Bcc` lines appear only when a non-empty value
/// was supplied. The body follows a single blank line, verbatim.
pub fn create_email_message(email: &OutgoingEmail) -> String {
    let mut lines = vec![
        "Content-Type: text/html; charset=utf-8".to_string(),
        "MIME-Version: 1.0".to_string(),
        format!("To: {}", email.to),
    ];

    if let Some(cc) = email.cc.as_deref().filter(|cc| !cc.is_empty()) {
        lines.push(format!("Cc: {}", cc));
    }
    if let Some(bcc) = email.bcc.as_deref().filter(|bcc| !bcc.is_empty()) {
        lines.push(format!("Bcc: {}", bcc));
    }

    lines.push(format!("Subject: {}", email.subject));
    lines.push(String::new());
    lines.push(email.body.clone());

    lines.join(CRLF)
}

/// Encode a raw email message for Gmail API (base64url, no padding)
pub fn encode_raw_message(message: &str) -> String {
    URL_SAFE_NO_PAD.encode(message.as_bytes())
}

/// Find a header value in a message detail by exact, case-sensitive name.
///
/// `payload.headers` is read leniently: a missing or non-array list means no
/// headers, and entries whose `name` or `value` is not a string are skipped.
/// The first remaining match wins.
pub fn find_header<'a>(message: &'a Value, name: &str) -> Option<&'a str> {
    message
        .get("payload")
        .and_then(|p| p.get("headers"))
        .and_then(Value::as_array)?
        .iter()
        .filter_map(|h| Some((h.get("name")?.as_str()?, h.get("value")?.as_str()?)))
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v)
}

/// Summarize a fetched message detail under the id the list call reported
pub fn summarize(id: &str, message: &Value) -> EmailSummary {
    let header = |name: &str| find_header(message, name).unwrap_or("").to_string();

    EmailSummary {
        id: id.to_string(),
        subject: header("Subject"),
        from: header("From"),
        date: header("Date"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode_base64url(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
        URL_SAFE_NO_PAD.decode(data.trim_end_matches('='))
    }

    #[test]
    fn test_create_email_message_without_copies() {
        let email = OutgoingEmail {
            to: "a@example.com".to_string(),
            subject: "Hello".to_string(),
            body: "<p>Hi</p>".to_string(),
            ..Default::default()
        };
        let message = create_email_message(&email);
        assert_eq!(
            message,
            "Content-Type: text/html; charset=utf-8\r\nMIME-Version: 1.0\r\nTo: a@example.com\r\nSubject: Hello\r\n\r\n<p>Hi</p>"
        );
        assert!(!message.contains("Cc:"));
        assert!(!message.contains("Bcc:"));
    }

    #[test]
    fn test_create_email_message_with_copies() {
        let email = OutgoingEmail {
            to: "a@example.com".to_string(),
            subject: "Hello".to_string(),
            body: "Body".to_string(),
            cc: Some("c@example.com, d@example.com".to_string()),
            bcc: Some("b@example.com".to_string()),
        };
        let message = create_email_message(&email);
        let lines: Vec<&str> = message.split("\r\n").collect();
        assert_eq!(lines[3], "Cc: c@example.com, d@example.com");
        assert_eq!(lines[4], "Bcc: b@example.com");
        assert_eq!(lines[5], "Subject: Hello");
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "Body");
    }

    #[test]
    fn test_empty_cc_is_omitted() {
        let email = OutgoingEmail {
            to: "a@example.com".to_string(),
            cc: Some(String::new()),
            ..Default::default()
        };
        assert!(!create_email_message(&email).contains("Cc:"));
    }

    #[test]
    fn test_encode_raw_message_is_url_safe() {
        // "??>" encodes to "Pz8+" in standard base64
        let encoded = encode_raw_message("??>?");
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert!(!encoded.ends_with('='));
        assert_eq!(decode_base64url(&encoded).unwrap(), b"??>?");
    }

    #[test]
    fn test_decode_accepts_padding() {
        assert_eq!(decode_base64url("SGk=").unwrap(), b"Hi");
        assert!(decode_base64url("not base64!").is_err());
    }

    #[test]
    fn test_find_header_is_case_sensitive_first_wins() {
        let message = json!({"payload": {"headers": [
            {"name": "subject", "value": "lower"},
            {"name": "Subject", "value": "first"},
            {"name": "Subject", "value": "second"}
        ]}});
        assert_eq!(find_header(&message, "Subject"), Some("first"));
        assert_eq!(find_header(&message, "SUBJECT"), None);
    }

    #[test]
    fn test_summarize_defaults_missing_headers() {
        let message = json!({"payload": {"headers": [{"name": "From", "value": "x@example.com"}]}});
        let summary = summarize("m1", &message);
        assert_eq!(summary.id, "m1");
        assert_eq!(summary.from, "x@example.com");
        assert_eq!(summary.subject, "");
        assert_eq!(summary.date, "");

        let bare = summarize("m2", &json!({}));
        assert_eq!(bare.subject, "");
    }

    #[test]
    fn test_summarize_tolerates_null_and_mistyped_fields() {
        let null_headers = json!({"id": 7, "labelIds": "INBOX", "payload": {"headers": null}});
        let summary = summarize("a", &null_headers);
        assert_eq!((summary.subject.as_str(), summary.from.as_str()), ("", ""));

        let message = json!({"payload": {"headers": [
            {"name": "Subject", "value": null},
            {"name": "Subject", "value": "S2"},
            {"name": 3, "value": "odd"},
            {"name": "X-Empty", "value": null}
        ]}});
        let summary = summarize("b", &message);
        assert_eq!(summary.subject, "S2");
        assert_eq!(summary.from, "");

        assert_eq!(summarize("c", &json!({"payload": "text/plain"})).date, "");
    }
}
