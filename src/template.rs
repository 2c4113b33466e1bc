//! Message personalization
//!
//! The campaign template is plain HTML with two placeholders:
//! `{{INSTAHANDLE}}` for the recipient's display handle and `{{URL}}` for the
//! per-recipient unsubscribe link. Both may appear multiple times.

/// Build the per-recipient unsubscribe URL
///
/// The recipient address is percent-encoded and appended as an `email` query
/// parameter to the configured base URL.
#[must_use]
pub fn unsubscribe_url(base_url: &str, email: &str) -> String {
    format!("{}?email={}", base_url, urlencoding::encode(email))
}

/// Render the message template for one recipient
///
/// Substitutes every occurrence of `{{INSTAHANDLE}}` with the recipient's
/// handle and `{{URL}}` with the unsubscribe link. Unknown placeholders are
/// left untouched.
#[must_use]
pub fn render(template: &str, handle: &str, unsubscribe_url: &str) -> String {
    template
        .replace("{{INSTAHANDLE}}", handle)
        .replace("{{URL}}", unsubscribe_url)
}
