use ferret_common::{ElementDescriptor, Inventory, UiPatternFact};
use ferret_engine::patterns::{PatternDetector, Rule, lint_conflicts};

fn el(tag: &str, path: &str) -> ElementDescriptor {
    ElementDescriptor::new(tag, path)
}

/// OrangeHRM-style header: the user name opens a dropdown holding logout.
fn user_menu_page(logout_path: &str) -> Inventory {
    Inventory::new(vec![
        el("span", "/html/body/header/div/ul/li/span")
            .with_attr("class", "oxd-userdropdown-tab")
            .with_text("Paul Collings"),
        el("ul", "/html/body/header/div/ul/li/ul")
            .with_attr("class", "oxd-dropdown-menu")
            .with_attr("role", "menu"),
        el("a", "/html/body/header/div/ul/li/ul/li[1]/a")
            .with_attr("class", "oxd-userdropdown-link")
            .with_text("About"),
        el("a", logout_path)
            .with_attr("class", "oxd-userdropdown-link")
            .with_attr("href", "/auth/logout")
            .with_text("Logout"),
    ])
}

#[test]
fn test_logout_inside_user_menu_is_detected() {
    let inventory = user_menu_page("/html/body/header/div/ul/li/ul/li[4]/a");
    let facts = PatternDetector::new().detect(&inventory);
    assert_eq!(
        facts,
        vec![UiPatternFact::new("user_menu_logout", "user_display", "logout_button")]
    );
}

#[test]
fn test_top_level_logout_yields_no_fact() {
    let inventory = user_menu_page("/html/body/header/div/a");
    assert!(PatternDetector::new().detect(&inventory).is_empty());
}

#[test]
fn test_empty_inventory_yields_no_fact() {
    assert!(PatternDetector::new().detect(&Inventory::default()).is_empty());
}

#[test]
fn test_collapsed_navigation_is_detected() {
    let inventory = Inventory::new(vec![
        el("button", "/html/body/header/button")
            .with_attr("class", "navbar-toggler")
            .with_attr("aria-expanded", "false")
            .with_attr("aria-controls", "mainNav"),
        el("div", "/html/body/header/div")
            .with_attr("id", "mainNav")
            .with_attr("class", "collapse navbar-collapse"),
        el("a", "/html/body/header/div/ul/li[1]/a")
            .with_attr("class", "nav-link")
            .with_text("Products"),
        el("a", "/html/body/header/div/ul/li[2]/a")
            .with_attr("class", "nav-link")
            .with_text("Pricing"),
    ]);
    let facts = PatternDetector::new().detect(&inventory);
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].trigger.as_str(), "menu_toggle");
    assert_eq!(facts[0].dependent_type.as_str(), "navigation_item");
}

#[test]
fn test_settings_and_logout_both_in_menu() {
    let mut elements = user_menu_page("/html/body/header/div/ul/li/ul/li[4]/a")
        .elements()
        .to_vec();
    elements.push(
        el("a", "/html/body/header/div/ul/li/ul/li[2]/a")
            .with_attr("class", "oxd-userdropdown-link")
            .with_text("Settings"),
    );
    let facts = PatternDetector::new().detect(&Inventory::new(elements));
    let names: Vec<&str> = facts.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["user_menu_logout", "user_menu_settings"]);
    assert!(lint_conflicts(&facts).is_empty());
}

fn always_sidebar_logout(_: &Inventory) -> Option<UiPatternFact> {
    Some(UiPatternFact::new("sidebar_logout", "menu_toggle", "logout_button"))
}

#[test]
fn test_custom_rule_conflict_first_wins() {
    let mut rules = ferret_engine::patterns::rules::RULES.to_vec();
    rules.push(("sidebar_logout", always_sidebar_logout as Rule));
    let detector = PatternDetector::with_rules(rules);

    let facts = detector.detect(&user_menu_page("/html/body/header/div/ul/li/ul/li[4]/a"));
    assert_eq!(facts[0].name, "user_menu_logout");
    let conflicts = lint_conflicts(&facts);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kept, "user_menu_logout");
    assert_eq!(conflicts[0].ignored, "sidebar_logout");
}
