use model::NavigationEvent;

use super::layout::{RenderedPage, escape_html, image_or_placeholder, nav_button};
use crate::assets::AvailableAssets;

struct Bio {
    name: &'static str,
    role: &'static str,
    text: &'static str,
}

/// Order matches the configured founder portraits.
const LEADERSHIP: [Bio; 2] = [
    Bio {
        name: "Harsan Singh",
        role: "Founder & CTO",
        text: "Harsan Singh heads the technology, architecture and development of our \
            AI-driven core, ensuring the engine behind your financial checkup is both \
            powerful and secure.",
    },
    Bio {
        name: "Andy Singh",
        role: "Product & UX Manager",
        text: "Andy Singh ensures the platform addresses real-world complexities like \
            529 college savings and sustainable retirement paths.",
    },
];

pub fn render(assets: &AvailableAssets) -> RenderedPage {
    let bios: String = LEADERSHIP
        .iter()
        .enumerate()
        .map(|(i, bio)| {
            format!(
                "<div class=\"section-card\">\
                <div class=\"portrait\">{portrait}</div>\
                <h3>{name}</h3>\
                <p class=\"role\">{role}</p>\
                <p>{text}</p>\
                </div>",
                portrait = image_or_placeholder(assets.founder_portrait(i), bio.name, 130),
                name = bio.name,
                role = escape_html(bio.role),
                text = bio.text,
            )
        })
        .collect();

    let body = format!(
        "<p>{back}</p>\
        <h1>Our Leadership</h1>\
        <div class=\"columns\">{bios}</div>",
        back = nav_button(NavigationEvent::Back, "← Back to main page", false),
    );

    RenderedPage::new("About AstraHeritage", body)
}
