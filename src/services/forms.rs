// Input forms for the auth workflows
// Each form validates into a typed command; services only accept the command

use serde::Deserialize;

use crate::domain::company::CompanyUpdate;
use crate::domain::user::{Email, MetadataPatch};
use crate::domain::validation::{optional, required, ValidationErrors};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Raw sign-up input
///
/// Missing fields deserialize as blank so that `validate` reports them
/// per field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignUpData {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub company_address: Option<String>,
}

/// Validated sign-up command
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: Email,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub company_address: Option<String>,
}

impl SignUpData {
    /// Checks every field and reports all failures at once
    ///
    /// # Example
    /// ```
    /// use stockdesk_api::services::forms::SignUpData;
    ///
    /// let data = SignUpData {
    ///     email: "a@b.com".into(),
    ///     password: "secret1".into(),
    ///     first_name: "Jan".into(),
    ///     last_name: "Kowalski".into(),
    ///     company_name: "ABC".into(),
    ///     company_address: None,
    /// };
    /// assert!(data.validate().is_ok());
    /// ```
    pub fn validate(self) -> Result<NewAccount, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let email = validate_email(&mut errors, &self.email);
        validate_password(&mut errors, &self.password);
        let first_name = required(&mut errors, "firstName", &self.first_name, "First name is required");
        let last_name = required(&mut errors, "lastName", &self.last_name, "Last name is required");
        let company_name = required(
            &mut errors,
            "companyName",
            &self.company_name,
            "Company name is required",
        );

        errors.into_result()?;

        Ok(NewAccount {
            // validate_email recorded an error if this were None
            email: email.ok_or_else(|| ValidationErrors::single("email", "Invalid email address"))?,
            password: self.password,
            first_name,
            last_name,
            company_name,
            company_address: optional(self.company_address),
        })
    }
}

/// Raw sign-in input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignInData {
    pub email: String,
    pub password: String,
}

/// Validated sign-in command
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: Email,
    pub password: String,
}

impl SignInData {
    pub fn validate(self) -> Result<Credentials, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let email = validate_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }

        errors.into_result()?;

        Ok(Credentials {
            email: email.ok_or_else(|| ValidationErrors::single("email", "Invalid email address"))?,
            password: self.password,
        })
    }
}

/// Raw profile update; blank strings count as absent
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_address: Option<String>,
}

impl ProfileUpdate {
    /// Splits the update into the identity part and the company part
    pub fn into_parts(self) -> (MetadataPatch, CompanyUpdate) {
        (
            MetadataPatch {
                first_name: optional(self.first_name),
                last_name: optional(self.last_name),
            },
            CompanyUpdate {
                name: optional(self.company_name),
                address: optional(self.company_address),
            },
        )
    }
}

fn validate_email(errors: &mut ValidationErrors, raw: &str) -> Option<Email> {
    if raw.trim().is_empty() {
        errors.add("email", "Email is required");
        return None;
    }
    match Email::new(raw) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.add("email", "Invalid email address");
            None
        }
    }
}

fn validate_password(errors: &mut ValidationErrors, password: &str) {
    if password.is_empty() {
        errors.add("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add("password", "Password must be at least 6 characters");
    }
}
