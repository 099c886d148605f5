//! Ordered instruction templates, most specific first.

use crate::{dictionary, normalizer};
use regex::{Captures, Regex};
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    UrlContains,
    ContainsText,
    EnterValue,
    EnterTestData,
    LoginWithCredentials,
    VerifyDisplayed,
    VerifyAvailable,
    VerifyPresent,
    Logout,
    Click,
}

impl TemplateKind {
    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::UrlContains => "url_contains",
            TemplateKind::ContainsText => "contains_text",
            TemplateKind::EnterValue => "enter_value",
            TemplateKind::EnterTestData => "enter_test_data",
            TemplateKind::LoginWithCredentials => "login_with_credentials",
            TemplateKind::VerifyDisplayed => "verify_displayed",
            TemplateKind::VerifyAvailable => "verify_available",
            TemplateKind::VerifyPresent => "verify_present",
            TemplateKind::Logout => "logout",
            TemplateKind::Click => "click",
        }
    }
}

pub struct Template {
    pub kind: TemplateKind,
    pattern: Regex,
    /// Extra check on the captures; the template is skipped when it fails.
    accept: Option<fn(&Captures<'_>) -> bool>,
}

const VERIFY: &str = r"(?:verify|check|assert|confirm|ensure)(?: that)?(?: the)?";
const ENTER: &str = r"(?:enter|type|input|fill in|fill)";
/// Quoted literals and test-data references are taken whole before a bare
/// fragment, so separators inside quotes never split the value.
const VALUE: &str = r#"(?:"[^"]*"|'[^']*'|\$\{[^}]*\}|\{\{[^}]*\}\}|.+?)"#;

fn template(kind: TemplateKind, pattern: &str) -> Template {
    Template {
        kind,
        pattern: Regex::new(&format!("(?i)^{}$", pattern)).unwrap(),
        accept: None,
    }
}

fn guarded(kind: TemplateKind, pattern: &str, accept: fn(&Captures<'_>) -> bool) -> Template {
    Template {
        accept: Some(accept),
        ..template(kind, pattern)
    }
}

/// The target names a dictionary element rather than free text.
fn names_known_element(captures: &Captures<'_>) -> bool {
    captures
        .name("target")
        .is_some_and(|m| dictionary::is_known_element(&normalizer::phrase(m.as_str())))
}

static TEMPLATES: LazyLock<Vec<Template>> = LazyLock::new(|| {
    vec![
        template(
            TemplateKind::UrlContains,
            &format!(r"{VERIFY}(?: page)? url (?:contains|includes) (?P<value>.+)"),
        ),
        template(
            TemplateKind::ContainsText,
            &format!(r"{VERIFY} (?P<target>.+?) (?:contains|shows text|has text) (?P<value>.+)"),
        ),
        template(
            TemplateKind::EnterValue,
            &format!(r"{ENTER} (?P<value>{VALUE}) (?:in|into) (?:the )?(?P<field>.+)"),
        ),
        template(
            TemplateKind::EnterTestData,
            &format!(r"{ENTER} (?:(?P<validity>valid|invalid) )?(?P<field>.+)"),
        ),
        template(
            TemplateKind::LoginWithCredentials,
            r"(?:login|log in|sign in) with (?:(?P<validity>valid|invalid) )?credentials",
        ),
        template(
            TemplateKind::VerifyDisplayed,
            &format!(r"{VERIFY} (?P<target>.+?) (?:is |are )?(?:displayed|visible|shown)"),
        ),
        template(
            TemplateKind::VerifyAvailable,
            &format!(
                r"{VERIFY} (?P<target>.+?)(?: option| button| link)? (?:is |are )?(?:available|present|exists?|enabled)"
            ),
        ),
        guarded(
            TemplateKind::VerifyPresent,
            &format!(r"{VERIFY} (?P<target>.+?)(?: (?:is|are) (?:displayed|visible|shown)\b.*)?"),
            names_known_element,
        ),
        template(TemplateKind::Logout, r"(?:logout|log out|sign out)"),
        template(
            TemplateKind::Click,
            r"(?:click|tap|press|select)(?: on)?(?: the)? (?P<target>.+)",
        ),
    ]
});

/// A matched template and its named captures.
#[derive(Debug)]
pub struct TemplateMatch<'t> {
    pub kind: TemplateKind,
    captures: Captures<'t>,
}

impl<'t> TemplateMatch<'t> {
    pub fn get(&self, name: &str) -> Option<&'t str> {
        self.captures
            .name(name)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
    }
}

/// First template matching the normalized instruction, if any.
pub fn match_instruction(text: &str) -> Option<TemplateMatch<'_>> {
    TEMPLATES.iter().find_map(|t| {
        let captures = t.pattern.captures(text)?;
        if t.accept.is_some_and(|accept| !accept(&captures)) {
            return None;
        }
        Some(TemplateMatch {
            kind: t.kind,
            captures,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(text: &str) -> Option<TemplateKind> {
        match_instruction(text).map(|m| m.kind)
    }

    #[test]
    fn test_most_specific_template_wins() {
        assert_eq!(kind("Verify URL contains \"dashboard\""), Some(TemplateKind::UrlContains));
        assert_eq!(
            kind("Verify heading contains \"Dashboard\""),
            Some(TemplateKind::ContainsText)
        );
        assert_eq!(kind("Enter \"Admin\" in username"), Some(TemplateKind::EnterValue));
        assert_eq!(kind("Enter valid password"), Some(TemplateKind::EnterTestData));
        assert_eq!(
            kind("Login with valid credentials"),
            Some(TemplateKind::LoginWithCredentials)
        );
        assert_eq!(kind("Verify dashboard is displayed"), Some(TemplateKind::VerifyDisplayed));
        assert_eq!(kind("Verify logout option available"), Some(TemplateKind::VerifyAvailable));
        assert_eq!(kind("Log out"), Some(TemplateKind::Logout));
        assert_eq!(kind("Click on Admin"), Some(TemplateKind::Click));
        assert_eq!(kind("Wait for the page to settle"), None);
    }

    #[test]
    fn test_captures() {
        let m = match_instruction("Verify logout option available").unwrap();
        assert_eq!(m.get("target"), Some("logout"));

        let m = match_instruction("Enter invalid password").unwrap();
        assert_eq!(m.get("validity"), Some("invalid"));
        assert_eq!(m.get("field"), Some("password"));

        let m = match_instruction("Type ${new_user} into the username field").unwrap();
        assert_eq!(m.get("value"), Some("${new_user}"));
        assert_eq!(m.get("field"), Some("username field"));
    }

    #[test]
    fn test_quoted_value_is_not_split() {
        let m = match_instruction("Enter \"Log in now\" into the search field").unwrap();
        assert_eq!(m.kind, TemplateKind::EnterValue);
        assert_eq!(m.get("value"), Some("\"Log in now\""));
        assert_eq!(m.get("field"), Some("search field"));

        let m = match_instruction("Type 'in stock' in search").unwrap();
        assert_eq!(m.get("value"), Some("'in stock'"));
        assert_eq!(m.get("field"), Some("search"));
    }

    #[test]
    fn test_bare_verification_needs_known_element() {
        assert_eq!(kind("Verify error message"), Some(TemplateKind::VerifyPresent));
        assert_eq!(
            kind("Verify error message is displayed for invalid credentials"),
            Some(TemplateKind::VerifyPresent)
        );
        let m = match_instruction("Verify error message is shown for empty fields").unwrap();
        assert_eq!(m.get("target"), Some("error message"));
        assert_eq!(kind("Verify everything went fine"), None);
    }
}
