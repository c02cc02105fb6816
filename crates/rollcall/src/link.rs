//! Outbound deep-link composition.
//!
//! A link is the only contract rollcall has with the messaging application:
//!
//! ```text
//! https://wa.me/<digits>?text=<percent-encoded message>
//! ```
//!
//! The phone is reduced to ASCII digits and the message is encoded with the
//! URI-component rule (everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`).
//!
//! # Example
//!
//! ```
//! use rollcall::link::compose_link;
//!
//! let url = compose_link("+964 770 123 4567", "Hello world");
//! assert_eq!(url, "https://wa.me/9647701234567?text=Hello%20world");
//! ```

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Default deep-link host.
pub const DEFAULT_BASE_URL: &str = "https://wa.me";

/// Characters escaped when encoding a URI component.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Shortest digit count treated as a plausible international number.
const MIN_PHONE_DIGITS: usize = 7;

/// Longest number allowed by E.164.
const MAX_PHONE_DIGITS: usize = 15;

/// Strip every character that is not an ASCII digit.
#[must_use]
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Percent-encode a message as a URI component.
#[must_use]
pub fn encode_message(message: &str) -> String {
    utf8_percent_encode(message, URI_COMPONENT).to_string()
}

/// Compose a link against the default host.
#[must_use]
pub fn compose_link(phone: &str, message: &str) -> String {
    LinkComposer::default().compose(phone, message)
}

/// Builds outbound links against a configurable host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkComposer {
    base_url: String,
}

impl LinkComposer {
    /// Create a composer for the given base URL.
    ///
    /// Trailing slashes are dropped so `https://wa.me/` and `https://wa.me`
    /// produce the same links.
    #[must_use]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
        }
    }

    /// The base URL links are composed against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Compose the link for one recipient.
    ///
    /// Pure and deterministic. The digit string is not checked; a phone with
    /// no digits yields a link with an empty path segment.
    #[must_use]
    pub fn compose(&self, phone: &str, message: &str) -> String {
        format!(
            "{}/{}?text={}",
            self.base_url,
            normalize_phone(phone),
            encode_message(message)
        )
    }
}

impl Default for LinkComposer {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Advisory notes about a phone number.
///
/// Nothing is rejected on these grounds. They mirror the form hint "enter the
/// number with the country code, without `+` or leading zeros".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneAdvisory {
    /// The phone contains no digits at all.
    NoDigits,
    /// The digits start with `0`, so the country code is probably missing.
    LeadingZero,
    /// Digit count is outside the usual international range.
    UnusualLength(usize),
}

impl std::fmt::Display for PhoneAdvisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDigits => write!(f, "phone number contains no digits"),
            Self::LeadingZero => write!(
                f,
                "phone number starts with 0; enter it with the country code and no leading zeros"
            ),
            Self::UnusualLength(n) => write!(
                f,
                "phone number has {n} digits; international numbers usually have \
                 {MIN_PHONE_DIGITS} to {MAX_PHONE_DIGITS}"
            ),
        }
    }
}

/// Check a phone number against the advisory rules.
#[must_use]
pub fn phone_advisory(phone: &str) -> Option<PhoneAdvisory> {
    let digits = normalize_phone(phone);
    if digits.is_empty() {
        Some(PhoneAdvisory::NoDigits)
    } else if digits.starts_with('0') {
        Some(PhoneAdvisory::LeadingZero)
    } else if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
        Some(PhoneAdvisory::UnusualLength(digits.len()))
    } else {
        None
    }
}
