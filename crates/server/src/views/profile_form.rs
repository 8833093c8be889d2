use model::{Age, Profile};

use super::layout::{RenderedPage, escape_html};
use crate::api::PATH_PROFILE;

pub fn render(profile: &Profile) -> RenderedPage {
    let left = [
        age_input("age", "Your age", profile.age),
        age_input(
            "target_retirement_age",
            "Target retirement age",
            profile.target_retirement_age,
        ),
        text_input("income", "Annual household income (USD)", &profile.income, "0"),
        text_input(
            "cash_savings",
            "Cash / emergency savings (USD)",
            &profile.cash_savings,
            "0",
        ),
    ]
    .concat();

    let right = [
        text_input(
            "investments",
            "Brokerage / stocks / ETFs (USD)",
            &profile.investments,
            "0",
        ),
        text_input(
            "retirement_accounts",
            "Retirement accounts (401k, IRA, etc.) (USD)",
            &profile.retirement_accounts,
            "0",
        ),
        text_input(
            "kids_ages",
            "Kids' ages (e.g. '8, 15')",
            &profile.kids_ages,
            "8, 15",
        ),
    ]
    .concat();

    let body = format!(
        "<h3>Step 1 · Your basics</h3>\
        <h2>Tell AstraHeritage about your finances</h2>\
        <p>A few high-level numbers are enough for now. You can refine the details later.</p>\
        <form method=\"post\" action=\"{PATH_PROFILE}\" class=\"section-card\">\
        <div class=\"columns\"><div>{left}</div><div>{right}</div></div>\
        <button type=\"submit\" class=\"primary\">Continue</button>\
        </form>"
    );

    RenderedPage::new("Your basics · AstraHeritage", body)
}

fn age_input(name: &str, label: &str, value: Option<Age>) -> String {
    let value = value.map(|age| age.to_string()).unwrap_or_default();
    format!(
        "<label>{label}<input type=\"number\" name=\"{name}\" min=\"0\" max=\"{max}\" \
        step=\"1\" value=\"{value}\"></label>",
        label = escape_html(label),
        max = Age::MAX,
    )
}

fn text_input(name: &str, label: &str, value: &str, placeholder: &str) -> String {
    format!(
        "<label>{label}<input type=\"text\" name=\"{name}\" value=\"{value}\" \
        placeholder=\"{placeholder}\"></label>",
        label = escape_html(label),
        value = escape_html(value),
        placeholder = escape_html(placeholder),
    )
}
