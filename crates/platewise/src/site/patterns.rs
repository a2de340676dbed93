use regex::Regex;
use std::sync::OnceLock;

/// Pragmatic email shape check, not full RFC 5322.
pub(crate) fn email() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("email pattern compiles")
    })
}

/// Loose phone check: digits plus common separators, 7 to 24 chars.
pub(crate) fn phone() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[0-9 ().-]{7,24}$").expect("phone pattern compiles"))
}
