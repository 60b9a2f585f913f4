//! Inline validation for the account forms, run before anything is submitted.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+'-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 15;
pub const OTP_LENGTH: usize = 6;
pub const NAME_MIN: usize = 2;

/// First failing rule per field, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn check(&mut self, field: &'static str, rules: &[(bool, &str)]) {
        if let Some((_, message)) = rules.iter().find(|(failed, _)| *failed) {
            self.0.insert(field, message.to_string());
        }
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), FieldErrors> {
    let email = email.trim();
    let password = password.trim();
    let mut errors = FieldErrors::default();

    errors.check(
        "email",
        &[
            (email.is_empty(), "Email is required"),
            (!EMAIL_PATTERN.is_match(email), "Invalid email address"),
        ],
    );
    errors.check(
        "password",
        &[
            (password.is_empty(), "Password is required"),
            (
                password.chars().count() < PASSWORD_MIN,
                "Password must be at least 8 characters long",
            ),
            (
                password.chars().count() > PASSWORD_MAX,
                "Password must not exceed 15 characters",
            ),
        ],
    );

    errors.into_result()
}

/// One-time code from the verification email.
pub fn validate_otp(otp: &str) -> Result<(), FieldErrors> {
    let otp = otp.trim();
    let mut errors = FieldErrors::default();

    errors.check(
        "otp",
        &[
            (
                otp.chars().count() != OTP_LENGTH,
                "OTP must be exactly 6 digits",
            ),
            (
                !otp.chars().all(|c| c.is_ascii_digit()),
                "OTP must contain only numbers",
            ),
        ],
    );

    errors.into_result()
}

pub fn validate_password_change(current: &str, new_password: &str) -> Result<(), FieldErrors> {
    let current = current.trim();
    let new_password = new_password.trim();
    let length = new_password.chars().count();
    let mut errors = FieldErrors::default();

    errors.check(
        "currentPassword",
        &[(current.is_empty(), "Current password is required")],
    );
    errors.check(
        "newPassword",
        &[
            (new_password.is_empty(), "Password is required"),
            (length < PASSWORD_MIN, "Password must be at least 8 characters"),
            (length > PASSWORD_MAX, "Password must not exceed 15 characters"),
            (
                !new_password.chars().any(|c| c.is_ascii_lowercase()),
                "Password must contain a lowercase letter",
            ),
            (
                !new_password.chars().any(|c| c.is_ascii_uppercase()),
                "Password must contain an uppercase letter",
            ),
            (
                !new_password.chars().any(|c| c.is_ascii_digit()),
                "Password must contain a number",
            ),
        ],
    );

    errors.into_result()
}

pub fn validate_profile(first_name: &str, last_name: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    for (field, value, label) in [
        ("firstName", first_name.trim(), "First name"),
        ("lastName", last_name.trim(), "Last name"),
    ] {
        errors.check(
            field,
            &[
                (value.is_empty(), format!("{} is required", label).as_str()),
                (
                    value.chars().count() < NAME_MIN,
                    format!("{} must be at least 2 characters", label).as_str(),
                ),
            ],
        );
    }

    errors.into_result()
}
