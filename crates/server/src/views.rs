//! HTML rendering for the wizard pages.

pub mod about;
pub mod dashboard;
pub mod home;
pub mod layout;
pub mod markdown;
pub mod profile_form;

use model::Page;

pub use self::layout::{RenderedPage, escape_html};
use crate::{assets::AvailableAssets, session::Session};

/// Render the current page of the session.
pub fn render(session: &Session, assets: &AvailableAssets) -> RenderedPage {
    match session.page() {
        Page::Home => home::render(assets),
        Page::Profile => profile_form::render(session.profile()),
        Page::Dashboard => dashboard::render(session),
        Page::About => about::render(assets),
    }
}
