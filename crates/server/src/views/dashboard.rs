use model::{Age, NavigationEvent, Profile, format_currency, format_currency_amount};

use super::{
    layout::{RenderedPage, escape_html, nav_button},
    markdown::markdown_to_html,
};
use crate::{api::PATH_ADVICE, session::Session};

/// Seconds between page reloads while advice is loading.
pub const LOADING_REFRESH_SECONDS: u32 = 2;

pub fn render(session: &Session) -> RenderedPage {
    let profile = session.profile();
    if !profile.has_dashboard_fields() {
        return missing_profile();
    }

    let age_target = format!(
        "{} → {}",
        age_text(profile.age),
        age_text(profile.target_retirement_age)
    );

    let cards = [
        metric_card("Age / Target", &age_target),
        metric_card("Annual income", &format_currency(&profile.income)),
        metric_card(
            "Total investable",
            &format_currency_amount(profile.total_investable()),
        ),
    ]
    .concat();

    let advice_button = if session.loading() {
        "<button type=\"submit\" class=\"primary\" disabled>Generating Advice...</button>"
    } else {
        "<button type=\"submit\" class=\"primary\">Get AI Financial Advice</button>"
    };

    let mut body = format!(
        "<h3>AstraHeritage · Dashboard</h3>\
        <h2>Your financial snapshot</h2>\
        <p>A high-level view based on the numbers you shared.</p>\
        <div class=\"columns\">{cards}</div>\
        <hr>\
        {details}\
        <hr>\
        <p>{edit} \
        <form class=\"inline\" method=\"post\" action=\"{PATH_ADVICE}\">{advice_button}</form></p>",
        details = details(profile),
        edit = nav_button(NavigationEvent::EditProfile, "Edit Profile", false),
    );

    if let Some(error) = session.advice_error() {
        body.push_str(&format!("<div class=\"error\">{}</div>", escape_html(error)));
    }

    if let Some(advice) = session.advice() {
        body.push_str(&format!(
            "<hr><section class=\"advice\"><h3>AI Financial Advice</h3>\
            <div class=\"advice-text\">{}</div></section>",
            markdown_to_html(advice)
        ));
    }

    let mut page = RenderedPage::new("Dashboard · AstraHeritage", body);
    if session.loading() {
        page.refresh_seconds = Some(LOADING_REFRESH_SECONDS);
    }
    page
}

fn missing_profile() -> RenderedPage {
    let body = format!(
        "<div class=\"warning\">No profile data found. Please fill out your profile first.</div>\
        <p>{}</p>",
        nav_button(NavigationEvent::CompleteProfile, "Go to Profile", true),
    );
    RenderedPage::new("Dashboard · AstraHeritage", body)
}

fn details(profile: &Profile) -> String {
    let kids_ages = profile
        .kids_ages()
        .map(|ages| detail("Kids' Ages", &escape_html(ages)))
        .unwrap_or_default();

    format!(
        "<h3>Financial Details</h3>\
        <div class=\"columns\">\
        <div>{cash}{brokerage}</div>\
        <div>{retirement}{kids_ages}</div>\
        </div>",
        cash = detail(
            "Cash / Emergency Savings",
            &format_currency(&profile.cash_savings)
        ),
        brokerage = detail(
            "Brokerage / Stocks / ETFs",
            &format_currency(&profile.investments)
        ),
        retirement = detail(
            "Retirement Accounts",
            &format_currency(&profile.retirement_accounts)
        ),
    )
}

fn metric_card(label: &str, value: &str) -> String {
    format!(
        "<div class=\"metric-card\">\
        <p class=\"metric-label\">{label}</p>\
        <p class=\"metric-value\">{value}</p>\
        </div>"
    )
}

fn detail(label: &str, value: &str) -> String {
    format!("<p><strong>{label}</strong><br>{value}</p>")
}

fn age_text(age: Option<Age>) -> String {
    age.map(|age| age.to_string())
        .unwrap_or_else(|| "--".to_string())
}
