//! HTTP request handlers.
//!
//! Every POST handler answers with a redirect to the page route, so
//! reloading a page never repeats an action.

use std::sync::Arc;

use advice::{AdviceClient, AdviceError};
use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::TypedHeader;
use config::Config;
use headers::{ContentType, Cookie};
use http::{HeaderValue, StatusCode, header::SET_COOKIE};
use model::{NavigationEvent, ProfileForm};
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::{
    app::S,
    assets::{AssetError, AssetStore},
    session::{
        Action, ActionOutcome, AdviceTicket, SESSION_COOKIE_NAME, SessionEntry, SessionHandle,
        SessionId, SessionManager,
    },
    views,
};

// App state getters

pub trait GetConfig {
    fn config(&self) -> &Config;
}

pub trait GetSessions {
    fn sessions(&self) -> &SessionManager;
}

pub trait GetAdviceClient {
    fn advice_client(&self) -> &Arc<AdviceClient>;
}

pub trait GetAssets {
    fn assets(&self) -> &AssetStore;
}

type SessionCookie = Option<TypedHeader<Cookie>>;

pub const PATH_PAGE: &str = "/";

pub async fn get_page(State(state): State<S>, cookie: SessionCookie) -> Response {
    // File system access stays outside the session lock.
    let assets = state.assets().available().await;
    let handle = state.sessions().get_or_create(session_id(cookie)).await;
    let page = {
        let session = handle.entry.access().await;
        views::render(&session, &assets)
    };
    with_session_cookie(Html(page.into_html()).into_response(), &handle)
}

#[derive(Debug, Deserialize)]
pub struct NavigateForm {
    pub event: NavigationEvent,
}

pub const PATH_NAVIGATE: &str = "/navigate";

pub async fn post_navigate(
    State(state): State<S>,
    cookie: SessionCookie,
    Form(form): Form<NavigateForm>,
) -> Response {
    apply_action(&state, cookie, Action::Navigate(form.event)).await
}

pub const PATH_PROFILE: &str = "/profile";

pub async fn post_profile(
    State(state): State<S>,
    cookie: SessionCookie,
    Form(form): Form<ProfileForm>,
) -> Response {
    apply_action(&state, cookie, Action::SubmitProfile(form.into_profile())).await
}

pub const PATH_ADVICE: &str = "/advice";

pub async fn post_advice(State(state): State<S>, cookie: SessionCookie) -> Response {
    apply_action(&state, cookie, Action::RequestAdvice).await
}

pub const PATH_END_SESSION: &str = "/session/end";

/// Wipe the session and make the browser forget the cookie.
pub async fn post_end_session(State(state): State<S>, cookie: SessionCookie) -> Response {
    if let Some(id) = session_id(cookie) {
        if state.sessions().end_session(id).await {
            debug!("Session ended");
        }
    }

    let response = Redirect::to(PATH_PAGE).into_response();
    append_cookie(
        response,
        format!("{SESSION_COOKIE_NAME}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"),
    )
}

pub const PATH_ASSET: &str = "/assets/{name}";

pub async fn get_asset(
    State(state): State<S>,
    Path(name): Path<String>,
) -> Result<(TypedHeader<ContentType>, Vec<u8>), StatusCode> {
    match state.assets().read(&name).await {
        Ok(asset) => Ok((TypedHeader(ContentType::from(asset.content_type)), asset.data)),
        Err(e) => match e.current_context() {
            AssetError::NotFound => Err(StatusCode::NOT_FOUND),
            AssetError::Read => {
                error!("{:?}", e);
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        },
    }
}

async fn apply_action(state: &S, cookie: SessionCookie, action: Action) -> Response {
    let handle = state.sessions().get_or_create(session_id(cookie)).await;
    let action_name = action.name();
    let outcome = handle.entry.access().await.apply(action);

    match outcome {
        ActionOutcome::Updated => (),
        ActionOutcome::Ignored => debug!("Action {} ignored on current page", action_name),
        ActionOutcome::StartAdvice(ticket) => {
            spawn_advice_request(state.advice_client().clone(), handle.entry.clone(), ticket)
        }
    }

    with_session_cookie(Redirect::to(PATH_PAGE).into_response(), &handle)
}

/// Run the advice request outside the request handler. The browser
/// polls the page until the result is stored into the session.
fn spawn_advice_request(
    advice_client: Arc<AdviceClient>,
    entry: Arc<SessionEntry>,
    ticket: AdviceTicket,
) {
    tokio::spawn(async move {
        let result = match advice_client.request_advice(&ticket.profile).await {
            Ok(advice) => Ok(advice),
            Err(e) => {
                match e.current_context() {
                    AdviceError::CredentialNotConfigured => warn!("{:?}", e),
                    AdviceError::Generation(_) => error!("{:?}", e),
                }
                Err(AdviceError::user_message(&e))
            }
        };

        if !entry.lock().await.finish_advice(ticket.generation, result) {
            debug!("Outdated advice result discarded");
        }
    });
}

fn session_id(cookie: SessionCookie) -> Option<SessionId> {
    cookie
        .as_ref()
        .and_then(|TypedHeader(cookie)| cookie.get(SESSION_COOKIE_NAME))
        .and_then(SessionId::parse)
}

fn with_session_cookie(response: Response, handle: &SessionHandle) -> Response {
    if !handle.created {
        return response;
    }

    append_cookie(
        response,
        format!(
            "{SESSION_COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax",
            handle.id
        ),
    )
}

fn append_cookie(mut response: Response, cookie: String) -> Response {
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => error!("Creating session cookie failed. Error: {}", e),
    }
    response
}
