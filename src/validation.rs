//! Form validation.
//!
//! Each form is checked field by field and every failure is collected, so the caller
//! gets one message per offending field instead of the first error only.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{
    ContactForm, FeedbackForm, NewContactSubmission, NewFeedbackSubmission, ResetPasswordForm,
    SignInForm, SignUpForm,
};

/// Field name → message, ordered so responses are stable.
pub type FieldErrors = BTreeMap<String, String>;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const EMAIL_MAX: usize = 254;
pub const SUBJECT_MAX: usize = 200;
pub const MESSAGE_MIN: usize = 10;
pub const MESSAGE_MAX: usize = 5000;
pub const COMMENTS_MIN: usize = 10;
pub const COMMENTS_MAX: usize = 2000;
pub const PAGE_URL_MAX: usize = 500;
pub const PASSWORD_MIN: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    email.chars().count() <= EMAIL_MAX && EMAIL_RE.is_match(email)
}

/// Collects field errors while a form is being checked.
#[derive(Default)]
struct Checker {
    errors: FieldErrors,
}

impl Checker {
    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Required text with an inclusive character-count range. Returns the trimmed value.
    fn text(&mut self, field: &str, label: &str, value: &str, min: usize, max: usize) -> String {
        let value = value.trim();
        let len = value.chars().count();
        if len == 0 {
            self.fail(field, format!("{label} is required"));
        } else if len < min {
            self.fail(field, format!("{label} must be at least {min} characters"));
        } else if len > max {
            self.fail(field, format!("{label} must be at most {max} characters"));
        }
        value.to_string()
    }

    /// Optional text; empty input becomes `None`.
    fn optional_text(&mut self, field: &str, label: &str, value: &str, max: usize) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if value.chars().count() > max {
            self.fail(field, format!("{label} must be at most {max} characters"));
        }
        Some(value.to_string())
    }

    fn email(&mut self, field: &str, value: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.fail(field, "Email is required");
        } else if !is_valid_email(value) {
            self.fail(field, "Please enter a valid email address");
        }
        value.to_string()
    }

    fn optional_email(&mut self, field: &str, value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if !is_valid_email(value) {
            self.fail(field, "Please enter a valid email address");
        }
        Some(value.to_string())
    }

    /// Optional 1..=5 rating. A skipped question stays `None`, never zero.
    fn rating(&mut self, field: &str, value: &str) -> Option<i32> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        match value.parse::<i32>() {
            Ok(rating) if (1..=5).contains(&rating) => Some(rating),
            _ => {
                self.fail(field, "Rating must be a whole number from 1 to 5");
                None
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            tracing::debug!(fields = ?self.errors.keys().collect::<Vec<_>>(), "form rejected");
            Err(self.errors)
        }
    }
}

/// validate_contact
///
/// Checks a contact form and produces the row to insert.
pub fn validate_contact(form: &ContactForm) -> Result<NewContactSubmission, FieldErrors> {
    let mut check = Checker::default();

    let submission = NewContactSubmission {
        name: check.text("name", "Name", &form.name, NAME_MIN, NAME_MAX),
        email: check.email("email", &form.email),
        subject: check.optional_text("subject", "Subject", &form.subject, SUBJECT_MAX),
        message: check.text("message", "Message", &form.message, MESSAGE_MIN, MESSAGE_MAX),
    };

    check.finish(submission)
}

/// validate_feedback
///
/// Checks a feedback form. Only `comments` is mandatory.
pub fn validate_feedback(form: &FeedbackForm) -> Result<NewFeedbackSubmission, FieldErrors> {
    let mut check = Checker::default();

    let submission = NewFeedbackSubmission {
        name: check.optional_text("name", "Name", &form.name, NAME_MAX),
        email: check.optional_email("email", &form.email),
        overall_rating: check.rating("overall_rating", &form.overall_rating),
        design_rating: check.rating("design_rating", &form.design_rating),
        usability_rating: check.rating("usability_rating", &form.usability_rating),
        content_rating: check.rating("content_rating", &form.content_rating),
        comments: check.text("comments", "Comments", &form.comments, COMMENTS_MIN, COMMENTS_MAX),
        page_url: check.optional_text("page_url", "Page URL", &form.page_url, PAGE_URL_MAX),
    };

    check.finish(submission)
}

/// Email and password presence for sign-in; the provider judges the credentials.
pub fn validate_sign_in(form: &SignInForm) -> Result<(), FieldErrors> {
    let mut check = Checker::default();
    check.email("email", &form.email);
    if form.password.is_empty() {
        check.fail("password", "Password is required");
    }
    check.finish(())
}

pub fn validate_sign_up(form: &SignUpForm) -> Result<(), FieldErrors> {
    let mut check = Checker::default();
    check.email("email", &form.email);
    password(&mut check, "password", &form.password);
    check.finish(())
}

/// Both passwords are required, long enough, and identical.
pub fn validate_reset_password(form: &ResetPasswordForm) -> Result<(), FieldErrors> {
    let mut check = Checker::default();
    password(&mut check, "password", &form.password);
    if form.confirm_password.is_empty() {
        check.fail("confirm_password", "Please confirm your password");
    } else if form.password != form.confirm_password {
        check.fail("confirm_password", "Passwords do not match");
    }
    check.finish(())
}

fn password(check: &mut Checker, field: &str, value: &str) {
    if value.is_empty() {
        check.fail(field, "Password is required");
    } else if value.chars().count() < PASSWORD_MIN {
        check.fail(field, format!("Password must be at least {PASSWORD_MIN} characters"));
    }
}

/// Returns the first message of a failed validation, for flash-style redirects.
pub fn first_message(errors: &FieldErrors) -> String {
    errors
        .values()
        .next()
        .cloned()
        .unwrap_or_else(|| "Invalid input".to_string())
}
