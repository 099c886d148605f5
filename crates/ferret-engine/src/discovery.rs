//! Page-specific candidates from a discovered inventory.
//!
//! Classifies descriptors into semantic types, derives one concrete
//! selector per descriptor and merges it into the registry ahead of the
//! generic entries.

use crate::registry::{SelectorRegistry, SharedRegistry};
use ferret_common::{ElementDescriptor, Inventory, SemanticType};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::patterns::rules::{
    is_logout, is_menu_toggle, is_navigation_item, is_settings, is_user_indicator,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub semantic_type: SemanticType,
    pub expression: String,
    /// Path of the descriptor the proposal came from.
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub merged: usize,
    pub unchanged: usize,
    pub rejected: usize,
}

fn input_type(el: &ElementDescriptor) -> Option<String> {
    (el.tag_lower() == "input").then(|| el.attr("type").unwrap_or("text").to_lowercase())
}

fn is_button(el: &ElementDescriptor) -> bool {
    el.tag_lower() == "button"
        || el.role() == Some("button")
        || matches!(input_type(el).as_deref(), Some("submit" | "button"))
}

/// Most specific semantic type for a descriptor, or `None` when it is not
/// worth a page-specific candidate.
pub fn classify(el: &ElementDescriptor) -> Option<SemanticType> {
    let tag = el.tag_lower();
    let ty = if let Some(kind) = input_type(el) {
        match kind.as_str() {
            "password" => "password_field",
            "email" => "email_field",
            "search" => "search_field",
            "submit" | "button" if el.mentions_any(&["login", "log in", "sign in"]) => {
                "login_button"
            }
            "submit" | "button" if el.mentions_any(&["search"]) => "search_button",
            "submit" | "button" => "button_generic",
            "text" if el.mentions_any(&["user", "login"]) => "username_field",
            "text" if el.mentions_any(&["email", "e-mail"]) => "email_field",
            "text" if el.mentions_any(&["search"]) => "search_field",
            _ => return None,
        }
    } else if is_logout(el) {
        "logout_button"
    } else if is_button(el) && el.mentions_any(&["login", "log in", "sign in"]) {
        "login_button"
    } else if is_button(el) && el.mentions_any(&["search"]) {
        "search_button"
    } else if is_menu_toggle(el) {
        "menu_toggle"
    } else if is_user_indicator(el) {
        "user_display"
    } else if is_settings(el) {
        "settings_link"
    } else if el.role() == Some("tab") {
        "tab_item"
    } else if el.has_class_fragment(&["breadcrumb"]) {
        "breadcrumb_item"
    } else if is_navigation_item(el) {
        "navigation_item"
    } else if el.role() == Some("alert") || el.has_class_fragment(&["error", "alert-danger"]) {
        "error_message"
    } else if el.has_class_fragment(&["success", "alert-success", "toast"]) {
        "success_message"
    } else if matches!(tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6") {
        "heading_generic"
    } else if is_button(el) {
        "button_generic"
    } else {
        return None;
    };
    Some(SemanticType::new(ty))
}

fn is_css_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// One concrete selector that pins down this descriptor, preferring ids and
/// test attributes. Values containing quotes are not proposed.
pub fn propose_selector(el: &ElementDescriptor) -> Option<String> {
    if let Some(id) = el.attr("id")
        && is_css_identifier(id)
    {
        return Some(format!("#{}", id));
    }
    for attr in ["data-testid", "data-test", "data-qa"] {
        if let Some(value) = el.attr(attr)
            && !value.is_empty()
            && !value.contains('\'')
        {
            return Some(format!("[{}='{}']", attr, value));
        }
    }
    if let Some(name) = el.attr("name")
        && !name.is_empty()
        && !name.contains('\'')
    {
        return Some(format!("{}[name='{}']", el.tag_lower(), name));
    }
    None
}

#[derive(Debug, Clone, Default)]
pub struct CandidateDiscovery;

impl CandidateDiscovery {
    pub fn new() -> Self {
        Self
    }

    /// Proposals in inventory order, one per (type, expression).
    pub fn propose(&self, inventory: &Inventory) -> Vec<Proposal> {
        let mut seen = HashSet::new();
        let mut proposals = Vec::new();
        for el in inventory.elements() {
            let Some(semantic_type) = classify(el) else {
                continue;
            };
            let Some(expression) = propose_selector(el) else {
                debug!(%semantic_type, path = %el.path, "no stable selector for element");
                continue;
            };
            if seen.insert((semantic_type.clone(), expression.clone())) {
                proposals.push(Proposal {
                    semantic_type,
                    expression,
                    path: el.path.clone(),
                });
            }
        }
        proposals
    }

    /// Merge proposals so that, per type, the earliest proposal leads.
    pub fn apply(&self, registry: &mut SelectorRegistry, proposals: &[Proposal]) -> MergeSummary {
        self.apply_with(proposals, |ty, expr| registry.merge(ty, expr))
    }

    pub fn apply_shared(&self, registry: &SharedRegistry, proposals: &[Proposal]) -> MergeSummary {
        self.apply_with(proposals, |ty, expr| registry.merge(ty, expr))
    }

    fn apply_with<F>(&self, proposals: &[Proposal], mut merge: F) -> MergeSummary
    where
        F: FnMut(SemanticType, &str) -> Result<bool, crate::registry::RegistryError>,
    {
        let mut summary = MergeSummary::default();
        for proposal in proposals.iter().rev() {
            match merge(proposal.semantic_type.clone(), &proposal.expression) {
                Ok(true) => summary.merged += 1,
                Ok(false) => summary.unchanged += 1,
                Err(e) => {
                    warn!(path = %proposal.path, "rejected discovered candidate: {}", e);
                    summary.rejected += 1;
                }
            }
        }
        info!(
            merged = summary.merged,
            unchanged = summary.unchanged,
            rejected = summary.rejected,
            "applied discovered candidates"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_inputs() {
        let password = ElementDescriptor::new("input", "/f/i1").with_attr("type", "password");
        let user = ElementDescriptor::new("input", "/f/i0").with_attr("name", "username");
        let submit = ElementDescriptor::new("button", "/f/b")
            .with_attr("type", "submit")
            .with_text("Login");
        assert_eq!(classify(&password).unwrap().as_str(), "password_field");
        assert_eq!(classify(&user).unwrap().as_str(), "username_field");
        assert_eq!(classify(&submit).unwrap().as_str(), "login_button");
    }

    #[test]
    fn test_selector_preference() {
        let el = ElementDescriptor::new("input", "/i")
            .with_attr("id", "user-name")
            .with_attr("data-testid", "username");
        assert_eq!(propose_selector(&el).unwrap(), "#user-name");

        let el = ElementDescriptor::new("input", "/i")
            .with_attr("id", "2fa code")
            .with_attr("data-testid", "otp");
        assert_eq!(propose_selector(&el).unwrap(), "[data-testid='otp']");

        let el = ElementDescriptor::new("input", "/i").with_attr("name", "q");
        assert_eq!(propose_selector(&el).unwrap(), "input[name='q']");
    }

    #[test]
    fn test_earliest_proposal_leads_after_apply() {
        let inventory = Inventory::new(vec![
            ElementDescriptor::new("a", "/nav/a1")
                .with_attr("id", "logout-primary")
                .with_text("Logout"),
            ElementDescriptor::new("a", "/footer/a2")
                .with_attr("id", "logout-footer")
                .with_text("Sign out"),
        ]);
        let discovery = CandidateDiscovery::new();
        let proposals = discovery.propose(&inventory);
        assert_eq!(proposals.len(), 2);

        let mut registry = SelectorRegistry::builtin();
        let summary = discovery.apply(&mut registry, &proposals);
        assert_eq!(summary.merged, 2);
        let list = registry.lookup(&"logout_button".into()).unwrap();
        assert_eq!(list[0].expression(), "#logout-primary");
        assert_eq!(list[1].expression(), "#logout-footer");
    }
}
