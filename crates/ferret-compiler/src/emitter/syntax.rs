//! Per-framework spelling of each plan operation.
//!
//! Placeholders: `{type}` semantic type, `{q}` qualifier literal, `{value}`
//! argument literal. Literals are already quoted when substituted.

use ferret_common::config::schema::TargetFramework;

#[derive(Debug, Clone, Copy)]
pub struct Syntax {
    pub comment: &'static str,
    pub quote: char,
    /// Spelling of a test-data lookup; `{key}` is the quoted key.
    pub test_data: &'static str,
    pub click: &'static str,
    pub click_qualified: &'static str,
    pub fill: &'static str,
    pub is_visible: &'static str,
    pub is_visible_qualified: &'static str,
    pub contains_text: &'static str,
    pub contains_text_qualified: &'static str,
    pub url_contains: &'static str,
}

const PLAYWRIGHT_PYTHON: Syntax = Syntax {
    comment: "#",
    quote: '"',
    test_data: "test_data[{key}]",
    click: r#"assert resolver.click(page, "{type}"), "Could not click {type}""#,
    click_qualified: r#"assert resolver.click(page, "{type}", text={q}), "Could not click {type}""#,
    fill: r#"assert resolver.fill(page, "{type}", {value}), "Could not fill {type}""#,
    is_visible: r#"assert resolver.is_visible(page, "{type}"), "{type} is not visible""#,
    is_visible_qualified: r#"assert resolver.is_visible(page, "{type}", text={q}), "{type} is not visible""#,
    contains_text: r#"assert resolver.contains_text(page, "{type}", {value}), "{type} text mismatch""#,
    contains_text_qualified: r#"assert resolver.contains_text(page, "{type}", {value}, text={q}), "{type} text mismatch""#,
    url_contains: r#"assert {value}.lower() in page.url.lower(), "Unexpected url " + page.url"#,
};

const SELENIUM_PYTHON: Syntax = Syntax {
    comment: "#",
    quote: '"',
    test_data: "test_data[{key}]",
    click: r#"assert resolver.click(driver, "{type}"), "Could not click {type}""#,
    click_qualified: r#"assert resolver.click(driver, "{type}", text={q}), "Could not click {type}""#,
    fill: r#"assert resolver.fill(driver, "{type}", {value}), "Could not fill {type}""#,
    is_visible: r#"assert resolver.is_visible(driver, "{type}"), "{type} is not visible""#,
    is_visible_qualified: r#"assert resolver.is_visible(driver, "{type}", text={q}), "{type} is not visible""#,
    contains_text: r#"assert resolver.contains_text(driver, "{type}", {value}), "{type} text mismatch""#,
    contains_text_qualified: r#"assert resolver.contains_text(driver, "{type}", {value}, text={q}), "{type} text mismatch""#,
    url_contains: r#"assert {value}.lower() in driver.current_url.lower(), "Unexpected url " + driver.current_url"#,
};

const PLAYWRIGHT_TYPESCRIPT: Syntax = Syntax {
    comment: "//",
    quote: '\'',
    test_data: "testData[{key}]",
    click: "expect(await resolver.click(page, '{type}')).toBe(true);",
    click_qualified: "expect(await resolver.click(page, '{type}', { text: {q} })).toBe(true);",
    fill: "expect(await resolver.fill(page, '{type}', {value})).toBe(true);",
    is_visible: "expect(await resolver.isVisible(page, '{type}')).toBe(true);",
    is_visible_qualified: "expect(await resolver.isVisible(page, '{type}', { text: {q} })).toBe(true);",
    contains_text: "expect(await resolver.containsText(page, '{type}', {value})).toBe(true);",
    contains_text_qualified: "expect(await resolver.containsText(page, '{type}', {value}, { text: {q} })).toBe(true);",
    url_contains: "expect(page.url().toLowerCase()).toContain({value}.toLowerCase());",
};

pub fn syntax_for(framework: TargetFramework) -> &'static Syntax {
    match framework {
        TargetFramework::PlaywrightPython => &PLAYWRIGHT_PYTHON,
        TargetFramework::SeleniumPython => &SELENIUM_PYTHON,
        TargetFramework::PlaywrightTypescript => &PLAYWRIGHT_TYPESCRIPT,
    }
}

impl Syntax {
    /// Quote `text` as a string literal of the target language.
    pub fn quoted(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 2);
        out.push(self.quote);
        for c in text.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                c if c == self.quote => {
                    out.push('\\');
                    out.push(c);
                }
                c => out.push(c),
            }
        }
        out.push(self.quote);
        out
    }
}
