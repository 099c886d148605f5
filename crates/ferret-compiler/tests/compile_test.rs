use ferret_common::config::schema::CompilerConfig;
use ferret_common::{ActionPlanStep, LiteralArg, Operation, UiPatternFact};
use ferret_compiler::{CompileError, ValidationCompiler, dictionary};
use ferret_engine::registry::SelectorRegistry;

fn user_menu_fact() -> UiPatternFact {
    UiPatternFact::new("user_menu_logout", "user_display", "logout_button")
}

fn with_facts(facts: Vec<UiPatternFact>) -> ValidationCompiler {
    ValidationCompiler::new(facts, CompilerConfig::default())
}

#[test]
fn test_fact_inserts_menu_click_before_logout_check() {
    let compiled = with_facts(vec![user_menu_fact()])
        .compile("Verify logout option available")
        .unwrap();

    let expected = ActionPlanStep::new("logout_button", Operation::IsVisible)
        .with_prerequisite(ActionPlanStep::new("user_display", Operation::Click));
    assert_eq!(compiled.plan, expected);
    assert_eq!(compiled.facts_applied, vec!["user_menu_logout"]);
    assert!(!compiled.generic_fallback);
}

#[test]
fn test_no_fact_means_no_prerequisite() {
    let compiled = with_facts(vec![])
        .compile("Verify logout option available")
        .unwrap();
    assert_eq!(compiled.plan.target_type.as_str(), "logout_button");
    assert_eq!(compiled.plan.operation, Operation::IsVisible);
    assert!(compiled.plan.prerequisites.is_empty());
}

#[test]
fn test_disabled_facts_are_ignored() {
    let compiler = ValidationCompiler::new(
        vec![user_menu_fact()],
        CompilerConfig {
            apply_pattern_facts: false,
        },
    );
    let compiled = compiler.compile("Click logout").unwrap();
    assert!(compiled.plan.prerequisites.is_empty());
}

#[test]
fn test_fact_applies_to_nested_prerequisites() {
    // The login button itself sits behind a toggle on this application.
    let compiler = with_facts(vec![UiPatternFact::new(
        "collapsed_login",
        "menu_toggle",
        "login_button",
    )]);
    let compiled = compiler.compile("Login with valid credentials").unwrap();
    let order: Vec<String> = compiled
        .plan
        .execution_order()
        .iter()
        .map(|s| s.describe())
        .collect();
    assert_eq!(
        order,
        vec![
            "click menu_toggle",
            "fill username_field ${valid_username}",
            "fill password_field ${valid_password}",
            "click login_button",
        ]
    );
}

#[test]
fn test_self_referential_fact_is_cyclic() {
    let compiler = with_facts(vec![UiPatternFact::new("loop", "logout_button", "logout_button")]);
    let err = compiler.compile("Click logout").unwrap_err();
    assert!(matches!(err, CompileError::CyclicPrerequisite { .. }));
}

#[test]
fn test_two_fact_cycle_is_cyclic() {
    let compiler = with_facts(vec![
        UiPatternFact::new("a", "user_display", "logout_button"),
        UiPatternFact::new("b", "logout_button", "user_display"),
    ]);
    match compiler.compile("Verify logout available").unwrap_err() {
        CompileError::CyclicPrerequisite { semantic_type, chain } => {
            assert_eq!(semantic_type.as_str(), "logout_button");
            assert_eq!(chain, "logout_button -> user_display -> logout_button");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_batch_isolates_failures() {
    let compiler = with_facts(vec![
        user_menu_fact(),
        UiPatternFact::new("settings_loop", "settings_link", "settings_link"),
    ]);
    let output = compiler.compile_batch([
        "Login with valid credentials",
        "Click Settings",
        "Verify logout option available",
        "Wait for animations to finish",
    ]);

    assert_eq!(output.compiled.len(), 3);
    assert_eq!(output.failed.len(), 1);
    assert_eq!(output.failed[0].index, 1);
    assert_eq!(output.report.total_steps, 4);
    assert_eq!(output.report.compile_errors, 1);
    assert_eq!(output.report.generic_fallback_count, 1);
    assert_eq!(output.report.pattern_facts_applied, 1);
}

#[test]
fn test_conflicts_are_reported_and_first_wins() {
    let compiler = with_facts(vec![
        user_menu_fact(),
        UiPatternFact::new("sidebar_logout", "menu_toggle", "logout_button"),
    ]);
    let output = compiler.compile_batch(["Click logout"]);
    assert_eq!(output.report.fact_conflicts.len(), 1);
    assert_eq!(
        output.compiled[0].plan.prerequisites[0].target_type.as_str(),
        "user_display"
    );
}

#[test]
fn test_every_dictionary_type_is_builtin() {
    let registry = SelectorRegistry::builtin();
    for ty in dictionary::all_types() {
        assert!(registry.contains(&ty.into()), "{} missing from builtin registry", ty);
    }
}

#[test]
fn test_bare_verification_of_known_element() {
    let compiler = ValidationCompiler::without_facts();
    for (text, target) in [
        ("Verify error message", "error_message"),
        ("Verify dashboard", "dashboard_content"),
        ("Verify successful login", "user_display"),
        ("Verify error message is displayed for invalid credentials", "error_message"),
    ] {
        let compiled = compiler.compile(text).unwrap();
        assert!(!compiled.generic_fallback, "{} fell back", text);
        assert_eq!(
            compiled.plan,
            ActionPlanStep::new(target, Operation::IsVisible),
            "{}",
            text
        );
    }

    let unknown = compiler.compile("Verify everything went fine").unwrap();
    assert!(unknown.generic_fallback);
}

#[test]
fn test_quoted_fill_value_kept_whole() {
    let compiled = ValidationCompiler::without_facts()
        .compile("Enter \"Log in now\" into the search field")
        .unwrap();
    assert_eq!(
        compiled.plan,
        ActionPlanStep::new("search_field", Operation::Fill)
            .with_arg(LiteralArg::Text("Log in now".into()))
    );
}

#[test]
fn test_quoted_target_words_lose_their_quotes() {
    let compiler = ValidationCompiler::without_facts();

    let compiled = compiler.compile("Click the 'Save' button").unwrap();
    assert_eq!(
        compiled.plan,
        ActionPlanStep::new("button_generic", Operation::Click).with_qualifier("Save")
    );

    let compiled = compiler.compile("Verify \"Logout\" link is displayed").unwrap();
    assert_eq!(
        compiled.plan,
        ActionPlanStep::new("logout_button", Operation::IsVisible)
    );
}
