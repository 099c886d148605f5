//! Application-agnostic default selector table.

use super::SelectorRegistry;
use ferret_common::{SelectorCandidate, Tier};
use tracing::warn;

/// (semantic type, high, medium, low)
type Entry = (
    &'static str,
    &'static [&'static str],
    &'static [&'static str],
    &'static [&'static str],
);

const TABLE: &[Entry] = &[
    // Authentication
    (
        "username_field",
        &[
            "[data-testid*='username']",
            "[data-testid*='email']",
            "#username",
            "#email",
            "input[name='username']",
            "input[name='email']",
        ],
        &[
            "input[type='text'][placeholder*='username' i]",
            "input[type='text'][placeholder*='email' i]",
            "input[type='email']",
            ".username-input",
            ".email-input",
        ],
        &["input[type='text']:first-of-type", ".form-control:first-of-type", "input:first-of-type"],
    ),
    (
        "email_field",
        &["[data-testid*='email']", "#email", "input[name='email']"],
        &["input[type='email']", "input[placeholder*='email' i]", ".email-input"],
        &["input[autocomplete='email']"],
    ),
    (
        "password_field",
        &["[data-testid*='password']", "#password", "input[name='password']"],
        &["input[type='password']", ".password-input", ".form-password"],
        &["input[placeholder*='password' i]"],
    ),
    (
        "login_button",
        &[
            "[data-testid*='login']",
            "[data-testid*='signin']",
            "#login-button",
            "#signin-button",
            "button[name='login']",
            "input[name='login']",
        ],
        &[
            "button[type='submit']",
            "input[type='submit']",
            "button:has-text('Login')",
            "button:has-text('Sign in')",
            "button:has-text('Log in')",
        ],
        &[".login-btn", ".btn-login", ".signin-btn", ".submit-btn"],
    ),
    (
        "logout_button",
        &[
            "[data-testid*='logout']",
            "[data-testid*='signout']",
            "#logout",
            "button[name='logout']",
        ],
        &[
            "button:has-text('Logout')",
            "button:has-text('Log out')",
            "button:has-text('Sign out')",
            "a:has-text('Logout')",
            "a:has-text('Log out')",
        ],
        &["[aria-label*='logout' i]", ".logout", ".signout"],
    ),
    // User and account
    (
        "user_display",
        &["[data-testid*='user']", "[data-testid*='profile']", "[data-testid*='account']"],
        &[".user-name", ".username", ".profile-name", ".account-name"],
        &[
            "[class*='user']",
            "[class*='profile']",
            "[class*='account']",
            "[aria-label*='user' i]",
            "[title*='user' i]",
        ],
    ),
    (
        "settings_link",
        &["[data-testid*='settings']", "#settings", "a[href*='settings']"],
        &[
            "a:has-text('Settings')",
            "a:has-text('Profile')",
            "[role='menuitem']:has-text('Settings')",
        ],
        &["[class*='settings']", "[aria-label*='settings' i]"],
    ),
    (
        "dashboard_content",
        &["[data-testid*='dashboard']", "#dashboard", ".dashboard"],
        &[".main-content", ".content-area", "[role='main']"],
        &[".page-content", "main"],
    ),
    // Generic text
    (
        "heading_generic",
        &[
            "h1",
            "h2",
            "h3",
            "h4",
            "h5",
            "h6",
            "[role='heading']",
            ".heading",
            ".title",
            ".header-text",
        ],
        &[".page-title", ".section-title", ".card-title"],
        &["[class*='heading']", "[class*='title']"],
    ),
    (
        "text_generic",
        &["p", "span", "div[class*='text']", ".text", ".content", ".description"],
        &["[role='text']", ".message", ".info"],
        &["div:not([class]):not([id])", "span:not([class]):not([id])"],
    ),
    (
        "label_generic",
        &["label", "[role='label']", ".label", ".caption", ".field-label"],
        &[".form-label", ".input-label"],
        &["[class*='label']", "[for]"],
    ),
    // Navigation
    (
        "navigation_item",
        &["[role='menuitem']", "nav a", ".nav-item", ".menu-item", ".navigation-item"],
        &[".nav-link", ".menu-link", ".sidebar-nav a", ".main-nav a", ".navbar-nav a"],
        &[".nav li a", ".menu li a", "ul.nav a", "ul.menu a"],
    ),
    (
        "navigation_menu",
        &["[role='navigation']", "nav", ".navigation", ".main-menu", ".primary-nav"],
        &[".navbar", ".nav-container", ".menu-container"],
        &[".nav", ".menu"],
    ),
    (
        "primary_navigation",
        &[
            "[role='navigation'][aria-label*='main' i]",
            ".main-navigation",
            ".primary-navigation",
            ".main-nav",
        ],
        &["nav.primary", ".navbar-main", ".header-nav"],
        &["nav:first-of-type", ".nav:first-of-type"],
    ),
    (
        "secondary_navigation",
        &[
            "[role='navigation'][aria-label*='secondary' i]",
            ".secondary-navigation",
            ".sub-navigation",
            ".sidebar-nav",
        ],
        &[".side-nav", ".left-nav", ".right-nav"],
        &["nav:not(.primary):not(.main)", ".nav:not(.primary):not(.main)"],
    ),
    (
        "menu_toggle",
        &[
            "[data-testid*='menu-toggle']",
            "[aria-label*='menu' i][aria-expanded]",
            ".navbar-toggler",
        ],
        &[".hamburger", ".menu-toggle", "button[aria-controls*='nav']"],
        &["[class*='toggle']", "[aria-expanded]"],
    ),
    (
        "breadcrumb_item",
        &["[role='breadcrumb'] a", ".breadcrumb a", ".breadcrumbs a"],
        &[".breadcrumb-item", ".crumb"],
        &[".path a", ".trail a"],
    ),
    (
        "tab_item",
        &["[role='tab']", ".tab", ".tab-item", ".nav-tab"],
        &[".tabs a", ".tab-link", ".tab-button"],
        &[".tabbed-nav a", "ul.tabs a"],
    ),
    (
        "dropdown_item",
        &["[role='menuitem']", ".dropdown-item", ".menu-item"],
        &[".dropdown a", ".menu a", ".submenu a"],
        &[".dropdown li a", ".menu li a"],
    ),
    (
        "button_generic",
        &["button", "[role='button']", "input[type='button']"],
        &[".btn", ".button", ".action-button"],
        &["a.btn", ".clickable"],
    ),
    (
        "link_generic",
        &["a[href]", "[role='link']"],
        &[".link", ".action-link"],
        &["a"],
    ),
    (
        "content_area",
        &["[role='main']", "main", ".main-content"],
        &[".content", ".page-content", ".content-area"],
        &["#content", ".main"],
    ),
    // Search
    (
        "search_field",
        &["[data-testid*='search']", "input[type='search']", "input[name='q']", "#search"],
        &["input[placeholder*='search' i]", "[role='searchbox']", ".search-input"],
        &["[class*='search'] input"],
    ),
    (
        "search_button",
        &["[data-testid*='search-button']", "button[aria-label*='search' i]", "#search-button"],
        &["button:has-text('Search')", "form[role='search'] button[type='submit']"],
        &[".search-btn", ".search-button"],
    ),
    // Validation
    (
        "error_message",
        &["[role='alert']", "[data-testid*='error']", ".error", ".alert-danger", ".alert-error"],
        &[".error-message", ".invalid-feedback", ".field-error", ".validation-error"],
        &["[class*='error']", ".alert"],
    ),
    (
        "success_message",
        &["[data-testid*='success']", ".success", ".alert-success"],
        &[".success-message", ".confirmation"],
        &["[class*='success']"],
    ),
    (
        "validation_message",
        &[".invalid-feedback", ".field-error", ".validation-error"],
        &["[role='alert']", ".error"],
        &["[class*='error']", "[class*='invalid']"],
    ),
];

pub(super) fn builtin_registry() -> SelectorRegistry {
    let mut registry = SelectorRegistry::new();
    for (semantic_type, high, medium, low) in TABLE {
        for (tier, expressions) in [(Tier::High, high), (Tier::Medium, medium), (Tier::Low, low)] {
            for expression in expressions.iter() {
                match SelectorCandidate::inferred(*expression, tier) {
                    Ok(candidate) => registry.register(*semantic_type, candidate),
                    Err(e) => {
                        warn!(semantic_type, expression, "skipping built-in candidate: {}", e)
                    }
                }
            }
        }
    }
    registry
}

/// Semantic types present in the default table.
pub fn builtin_types() -> impl Iterator<Item = &'static str> {
    TABLE.iter().map(|(name, ..)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_candidate_is_valid() {
        let registry = builtin_registry();
        for (semantic_type, high, medium, low) in TABLE {
            assert_eq!(
                registry.candidate_count(&(*semantic_type).into()),
                high.len() + medium.len() + low.len(),
                "{} lost candidates during load",
                semantic_type
            );
        }
    }

    #[test]
    fn test_builtin_types_are_unique() {
        let mut names: Vec<&str> = builtin_types().collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
