use folio_site::{
    content::{PageContent, PageKind, PageRecord},
    error::SubmissionError,
    models::{ActionResult, Page, ResetPasswordForm, SignInForm},
    validation::{self, first_message, is_valid_email},
};
use serde_json::json;

// --- Page content ---

#[test]
fn test_page_kind_from_slug() {
    assert_eq!(PageKind::from_slug("home"), PageKind::Home);
    assert_eq!(PageKind::from_slug("faq"), PageKind::Faq);
    assert_eq!(PageKind::from_slug("privacy"), PageKind::Other);
}

#[test]
fn test_listing_pages_share_one_shape() {
    for kind in [PageKind::Services, PageKind::Projects, PageKind::Blog] {
        let content = PageContent::parse(kind, Some(json!({ "intro": "Hi" })));
        match content {
            PageContent::Listing(listing) => assert_eq!(listing.intro.as_deref(), Some("Hi")),
            other => panic!("expected listing for {kind:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_null_content_parses_to_empty_shape() {
    assert!(matches!(
        PageContent::parse(PageKind::Home, None),
        PageContent::Home(_)
    ));
    assert!(matches!(
        PageContent::parse(PageKind::Faq, Some(serde_json::Value::Null)),
        PageContent::Faq(_)
    ));
}

#[test]
fn test_mismatched_and_unknown_content_is_kept_raw() {
    let raw = json!({ "hero": "should be an object" });
    assert_eq!(
        PageContent::parse(PageKind::About, Some(raw.clone())),
        PageContent::Unknown(raw)
    );

    let other = json!({ "anything": 1 });
    assert_eq!(
        PageContent::parse(PageKind::Other, Some(other.clone())),
        PageContent::Unknown(other)
    );
}

#[test]
fn test_page_record_from_row_parses_content_by_slug() {
    let record = PageRecord::from(Page {
        slug: "contact".to_string(),
        title: "Contact".to_string(),
        content: Some(json!({ "email": "hi@example.com" })),
        ..Page::default()
    });

    match record.content {
        PageContent::Contact(contact) => {
            assert_eq!(contact.email.as_deref(), Some("hi@example.com"))
        }
        other => panic!("expected contact content, got {other:?}"),
    }
}

// --- Validation ---

#[test]
fn test_email_pattern() {
    assert!(is_valid_email("ada@example.com"));
    assert!(is_valid_email("first.last+tag@sub.example.org"));
    assert!(!is_valid_email("ada@example"));
    assert!(!is_valid_email("ada example@x.com"));
    assert!(!is_valid_email("@example.com"));

    let long_local = "a".repeat(250);
    assert!(!is_valid_email(&format!("{long_local}@example.com")));
}

#[test]
fn test_reset_password_rules() {
    let short = ResetPasswordForm {
        password: "abc".to_string(),
        confirm_password: "abc".to_string(),
    };
    let errors = validation::validate_reset_password(&short).unwrap_err();
    assert_eq!(errors["password"], "Password must be at least 6 characters");

    let ok = ResetPasswordForm {
        password: "abcdef".to_string(),
        confirm_password: "abcdef".to_string(),
    };
    assert!(validation::validate_reset_password(&ok).is_ok());
}

#[test]
fn test_first_message_follows_field_order() {
    let errors = validation::validate_sign_in(&SignInForm::default()).unwrap_err();
    assert_eq!(first_message(&errors), "Email is required");
    assert_eq!(errors["password"], "Password is required");
}

#[test]
fn test_validation_error_counts_fields() {
    let errors = validation::validate_sign_in(&SignInForm::default()).unwrap_err();
    let error = SubmissionError::Validation(errors);
    assert_eq!(error.to_string(), "submission failed validation on 2 field(s)");
}

#[test]
fn test_action_result_omits_empty_errors() {
    let result = ActionResult {
        success: true,
        message: "ok".to_string(),
        errors: Default::default(),
    };
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({ "success": true, "message": "ok" })
    );
}
