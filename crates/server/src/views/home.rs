use model::NavigationEvent;

use super::layout::{RenderedPage, image_or_placeholder, nav_button};
use crate::assets::AvailableAssets;

const FEATURES: [&str; 4] = [
    "See if you're on track to retire on your terms.",
    "Understand how much house you can comfortably afford.",
    "Plan 529 and college savings for your kids.",
    "Spot if your portfolio is too concentrated in a few stocks.",
];

pub fn render(assets: &AvailableAssets) -> RenderedPage {
    let features: String = FEATURES
        .iter()
        .map(|feature| format!("<li>{feature}</li>"))
        .collect();

    let body = format!(
        "<header class=\"main-header\">\
        <div class=\"logo-container\">{logo}</div>\
        <div class=\"header-text\">\
        <h2>ASTRA HERITAGE</h2>\
        <p><strong>Advanced Intelligence. Enduring Heritage.</strong></p>\
        </div>\
        </header>\
        <p>An AI-powered financial guide that helps you make smarter decisions \
        about retirement, housing, college planning, and investments without \
        spreadsheets or analysis paralysis.</p>\
        <hr>\
        <h3>What AstraHeritage will help you with:</h3>\
        <ul>{features}</ul>\
        <p>{start}</p>\
        <hr>\
        <p><small>AstraHeritage provides educational guidance only and does not give \
        individualized financial, legal, or tax advice.</small></p>\
        <p>{about}</p>",
        logo = image_or_placeholder(assets.logo(), "AstraHeritage logo", 80),
        start = nav_button(NavigationEvent::StartCheckup, "Start free financial checkup", true),
        about = nav_button(NavigationEvent::OpenAbout, "About Us", false),
    );

    RenderedPage::new("AstraHeritage", body)
}
