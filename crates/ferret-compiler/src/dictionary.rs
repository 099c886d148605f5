//! Keyword to semantic type mapping for instruction targets.
//!
//! Entries are checked in order and keywords match on whole words, so
//! "tab" does not match "table". Generic entries carry the rest of the
//! phrase as a text qualifier.

use ferret_common::SemanticType;

struct Entry {
    keywords: &'static [&'static str],
    semantic_type: &'static str,
    /// The remaining words of the phrase become the text qualifier.
    qualified: bool,
}

const fn entry(keywords: &'static [&'static str], semantic_type: &'static str) -> Entry {
    Entry {
        keywords,
        semantic_type,
        qualified: false,
    }
}

const fn qualified(keywords: &'static [&'static str], semantic_type: &'static str) -> Entry {
    Entry {
        keywords,
        semantic_type,
        qualified: true,
    }
}

const ELEMENTS: &[Entry] = &[
    entry(&["logout", "log out", "sign out", "signout", "log off"], "logout_button"),
    entry(&["username field", "username input", "user name field"], "username_field"),
    entry(&["password field", "password input", "password"], "password_field"),
    entry(&["email field", "email input", "email address field"], "email_field"),
    entry(&["successful login", "login successful", "logged in"], "user_display"),
    entry(&["login button", "log in button", "sign in button", "login", "sign in"], "login_button"),
    entry(
        &[
            "user menu",
            "user dropdown",
            "user name",
            "username display",
            "user profile",
            "avatar",
            "user display",
        ],
        "user_display",
    ),
    entry(&["settings", "preferences"], "settings_link"),
    entry(&["hamburger", "menu toggle", "navigation toggle"], "menu_toggle"),
    qualified(&["menu item", "menu option", "nav item", "navigation item"], "navigation_item"),
    entry(
        &["navigation menu", "navigation", "nav menu", "main menu", "sidebar"],
        "navigation_menu",
    ),
    qualified(&["breadcrumb"], "breadcrumb_item"),
    qualified(&["tab"], "tab_item"),
    qualified(&["dropdown option", "dropdown item", "dropdown"], "dropdown_item"),
    entry(&["validation message", "validation error", "required message"], "validation_message"),
    entry(&["error message", "error"], "error_message"),
    entry(&["success message", "confirmation message", "success"], "success_message"),
    entry(&["search button"], "search_button"),
    entry(&["search field", "search box", "search input", "search"], "search_field"),
    entry(&["dashboard"], "dashboard_content"),
    qualified(&["heading", "title", "header"], "heading_generic"),
    qualified(&["label"], "label_generic"),
    qualified(&["button", "btn"], "button_generic"),
    qualified(&["link"], "link_generic"),
    entry(&["main content", "page content", "content area", "content"], "content_area"),
];

const FIELDS: &[Entry] = &[
    entry(&["password", "passwd", "pass"], "password_field"),
    entry(&["email", "e-mail", "email address"], "email_field"),
    entry(&["username", "user name", "user id", "login", "user"], "username_field"),
    entry(&["search", "query"], "search_field"),
];

/// Types a click should never target directly; clicks on these fall back to
/// a qualified navigation item.
const PASSIVE_TYPES: &[&str] = &[
    "dashboard_content",
    "content_area",
    "heading_generic",
    "label_generic",
    "text_generic",
    "error_message",
    "success_message",
    "validation_message",
];

/// Words dropped when a phrase is turned into a qualifier.
const FILLER: &[&str] = &[
    "the", "a", "an", "on", "option", "item", "menu", "button", "link", "tab",
];

pub const CLICK_FALLBACK: &str = "navigation_item";
pub const VERIFY_FALLBACK: &str = "text_generic";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub semantic_type: SemanticType,
    pub qualifier: Option<String>,
}

fn padded(s: &str) -> String {
    format!(" {} ", s.to_lowercase())
}

fn find<'a>(entries: &'a [Entry], phrase: &str) -> Option<(&'a Entry, &'static str)> {
    let haystack = padded(phrase);
    entries.iter().find_map(|e| {
        e.keywords
            .iter()
            .find(|k| haystack.contains(&padded(k)))
            .map(|k| (e, *k))
    })
}

/// `phrase` minus `keyword` and filler words, keeping its casing.
fn remainder(phrase: &str, keyword: Option<&str>) -> Option<String> {
    let keyword_words: Vec<String> = keyword
        .map(|k| k.split_whitespace().map(str::to_lowercase).collect())
        .unwrap_or_default();
    let rest: Vec<&str> = phrase
        .split_whitespace()
        .filter(|w| {
            let lower = w.to_lowercase();
            !keyword_words.contains(&lower) && !FILLER.contains(&lower.as_str())
        })
        .collect();
    (!rest.is_empty()).then(|| rest.join(" "))
}

fn lookup(entry: &Entry, keyword: &str, phrase: &str) -> Lookup {
    Lookup {
        semantic_type: SemanticType::new(entry.semantic_type),
        qualifier: if entry.qualified {
            remainder(phrase, Some(keyword))
        } else {
            None
        },
    }
}

fn fallback(semantic_type: &str, phrase: &str) -> Lookup {
    Lookup {
        semantic_type: SemanticType::new(semantic_type),
        qualifier: remainder(phrase, None).or_else(|| Some(phrase.trim().to_string())),
    }
}

/// True when some dictionary element is named in `phrase`.
pub fn is_known_element(phrase: &str) -> bool {
    find(ELEMENTS, phrase).is_some()
}

/// Target of a verification. Unknown phrases become qualified generic text.
pub fn verify_target(phrase: &str) -> Lookup {
    match find(ELEMENTS, phrase) {
        Some((entry, keyword)) => lookup(entry, keyword, phrase),
        None => fallback(VERIFY_FALLBACK, phrase),
    }
}

/// Target of a click. Unknown phrases and passive elements become qualified
/// navigation items.
pub fn click_target(phrase: &str) -> Lookup {
    match find(ELEMENTS, phrase) {
        Some((entry, _)) if PASSIVE_TYPES.contains(&entry.semantic_type) => {
            fallback(CLICK_FALLBACK, phrase)
        }
        Some((entry, keyword)) => lookup(entry, keyword, phrase),
        None => fallback(CLICK_FALLBACK, phrase),
    }
}

/// Input field named in a fill instruction.
pub fn field_type(phrase: &str) -> Option<SemanticType> {
    find(FIELDS, phrase).map(|(entry, _)| SemanticType::new(entry.semantic_type))
}

/// Test-data key stem for a field type, e.g. `username` for `username_field`.
pub fn field_key(semantic_type: &SemanticType) -> &str {
    semantic_type
        .as_str()
        .strip_suffix("_field")
        .unwrap_or(semantic_type.as_str())
}

/// Every semantic type a compiled plan can name, excluding `page`.
pub fn all_types() -> Vec<&'static str> {
    let mut types: Vec<&'static str> = ELEMENTS
        .iter()
        .chain(FIELDS)
        .map(|e| e.semantic_type)
        .chain([
            CLICK_FALLBACK,
            VERIFY_FALLBACK,
            "login_button",
            "username_field",
            "password_field",
        ])
        .collect();
    types.sort_unstable();
    types.dedup();
    types
}
