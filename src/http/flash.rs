//! Flash notices
//!
//! A `Flash` is returned by a controller alongside its redirect. The router
//! stores it in a short-lived `flash` cookie; the next rendered page shows
//! it and clears the cookie.

use url::form_urlencoded;

pub const FLASH_COOKIE: &str = "flash";

/// Visual severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Danger,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Danger => "danger",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "info" => Some(Self::Info),
            "danger" => Some(Self::Danger),
            _ => None,
        }
    }
}

/// A one-time message shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub message: String,
    pub severity: Severity,
}

impl Flash {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(Severity::Danger, message)
    }

    /// `Set-Cookie` value carrying this notice
    pub fn to_set_cookie(&self) -> String {
        let value = form_urlencoded::Serializer::new(String::new())
            .append_pair("type", self.severity.as_str())
            .append_pair("message", &self.message)
            .finish();
        format!("{FLASH_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax")
    }

    /// Decode a cookie value written by `to_set_cookie`
    pub fn from_cookie(value: &str) -> Option<Self> {
        let mut severity = None;
        let mut message = None;
        for (key, val) in form_urlencoded::parse(value.as_bytes()) {
            match key.as_ref() {
                "type" => severity = Severity::parse(&val),
                "message" => message = Some(val.into_owned()),
                _ => {}
            }
        }
        Some(Self::new(severity?, message.filter(|m| !m.is_empty())?))
    }

    /// `Set-Cookie` value that removes a shown notice
    pub fn clear_cookie() -> String {
        format!("{FLASH_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie_payload(set_cookie: &str) -> &str {
        set_cookie
            .split(';')
            .next()
            .and_then(|pair| pair.strip_prefix("flash="))
            .unwrap()
    }

    #[test]
    fn test_cookie_carries_notice() {
        let flash = Flash::danger("Invalid URL; try again, \"please\"");
        let set_cookie = flash.to_set_cookie();
        let payload = cookie_payload(&set_cookie);

        // Cookie values must not contain separators or quotes
        assert!(!payload.contains([';', ',', ' ', '"']));
        assert_eq!(Flash::from_cookie(payload), Some(flash));
    }

    #[test]
    fn test_unicode_message() {
        let flash = Flash::success("Страница успешно добавлена");
        let set_cookie = flash.to_set_cookie();
        assert_eq!(Flash::from_cookie(cookie_payload(&set_cookie)), Some(flash));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(Flash::from_cookie(""), None);
        assert_eq!(Flash::from_cookie("type=bogus&message=hi"), None);
        assert_eq!(Flash::from_cookie("type=info"), None);
    }

    #[test]
    fn test_clear_cookie_expires() {
        assert!(Flash::clear_cookie().contains("Max-Age=0"));
    }
}
