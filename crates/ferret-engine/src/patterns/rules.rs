//! Pattern rules and the element clusters they reason about.
//!
//! Every rule is a pure function of the inventory. Cluster predicates look
//! at one descriptor at a time; nesting is decided from descriptor paths.

use ferret_common::{ElementDescriptor, Inventory, UiPatternFact};

pub type Rule = fn(&Inventory) -> Option<UiPatternFact>;

const LOGOUT_WORDS: &[&str] = &["logout", "log out", "log-out", "sign out", "signout", "sign-out"];
const SETTINGS_WORDS: &[&str] = &["settings", "preferences", "my profile", "my account"];

fn is_actionable(el: &ElementDescriptor) -> bool {
    matches!(el.tag_lower().as_str(), "a" | "button" | "li")
        || matches!(el.role(), Some("menuitem" | "link" | "button"))
}

pub fn is_user_indicator(el: &ElementDescriptor) -> bool {
    if el.tag_lower() == "input" || is_logout(el) {
        return false;
    }
    el.has_class_fragment(&[
        "userdropdown-tab",
        "userdropdown-name",
        "user-menu",
        "usermenu",
        "user-avatar",
        "avatar",
        "user-name",
        "user-info",
        "account-menu",
        "profile-pic",
    ]) || el
        .attr("aria-label")
        .map(str::to_lowercase)
        .is_some_and(|l| l.contains("user menu") || l.contains("account"))
}

pub fn is_dropdown(el: &ElementDescriptor) -> bool {
    matches!(el.role(), Some("menu" | "listbox"))
        || el.has_class_fragment(&[
            "dropdown-menu",
            "dropdown-content",
            "dropdown-list",
            "menu-list",
            "submenu",
            "popover",
        ])
}

pub fn is_logout(el: &ElementDescriptor) -> bool {
    is_actionable(el) && el.mentions_any(LOGOUT_WORDS)
}

pub fn is_settings(el: &ElementDescriptor) -> bool {
    is_actionable(el) && !el.mentions_any(LOGOUT_WORDS) && el.mentions_any(SETTINGS_WORDS)
}

pub fn is_menu_toggle(el: &ElementDescriptor) -> bool {
    if el.has_class_fragment(&[
        "hamburger",
        "navbar-toggler",
        "menu-toggle",
        "nav-toggle",
        "sidebar-toggle",
    ]) {
        return true;
    }
    let collapsed_control =
        el.attr("aria-expanded") == Some("false") && el.attr("aria-controls").is_some();
    let labelled = el.attr("aria-label").is_some_and(|l| {
        let l = l.to_lowercase();
        l.contains("toggle navigation") || l.contains("open menu")
    });
    collapsed_control || labelled
}

pub fn is_navigation_item(el: &ElementDescriptor) -> bool {
    if !matches!(el.tag_lower().as_str(), "a" | "li") {
        return false;
    }
    el.has_class_fragment(&["nav-item", "nav-link", "main-menu", "sidebar-item", "menu-item"])
        || el.path.split('/').any(|seg| seg.starts_with("nav"))
}

/// A container that starts hidden until something expands it.
pub fn is_collapsed_container(el: &ElementDescriptor) -> bool {
    if is_menu_toggle(el) || el.tag_lower() == "button" {
        return false;
    }
    el.has_class_fragment(&["collapse", "offcanvas", "drawer"])
        || el.attr("aria-hidden") == Some("true")
        || el.attributes.contains_key("hidden")
}

fn all_nested(items: &[&ElementDescriptor], containers: &[&ElementDescriptor]) -> bool {
    items
        .iter()
        .all(|item| containers.iter().any(|c| item.is_nested_under(c)))
}

/// Logout only reachable through the user dropdown.
pub fn user_menu_logout(inventory: &Inventory) -> Option<UiPatternFact> {
    let users = inventory.filter(is_user_indicator);
    let dropdowns = inventory.filter(is_dropdown);
    let logouts = inventory.filter(is_logout);
    if users.is_empty() || dropdowns.is_empty() || logouts.is_empty() {
        return None;
    }
    all_nested(&logouts, &dropdowns)
        .then(|| UiPatternFact::new("user_menu_logout", "user_display", "logout_button"))
}

/// Navigation hidden behind a hamburger toggle.
pub fn collapsed_navigation(inventory: &Inventory) -> Option<UiPatternFact> {
    let toggles = inventory.filter(is_menu_toggle);
    let items = inventory.filter(is_navigation_item);
    let containers = inventory.filter(is_collapsed_container);
    if toggles.is_empty() || items.is_empty() || containers.is_empty() {
        return None;
    }
    all_nested(&items, &containers)
        .then(|| UiPatternFact::new("collapsed_navigation", "menu_toggle", "navigation_item"))
}

/// Settings/profile links only reachable through the user dropdown.
pub fn user_menu_settings(inventory: &Inventory) -> Option<UiPatternFact> {
    let users = inventory.filter(is_user_indicator);
    let dropdowns = inventory.filter(is_dropdown);
    let settings = inventory.filter(is_settings);
    if users.is_empty() || dropdowns.is_empty() || settings.is_empty() {
        return None;
    }
    all_nested(&settings, &dropdowns)
        .then(|| UiPatternFact::new("user_menu_settings", "user_display", "settings_link"))
}

/// Declared rule order. Earlier rules win conflicts.
pub const RULES: &[(&str, Rule)] = &[
    ("user_menu_logout", user_menu_logout),
    ("collapsed_navigation", collapsed_navigation),
    ("user_menu_settings", user_menu_settings),
];
