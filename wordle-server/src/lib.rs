use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;
use warp::reply::{Reply, Response};

use crate::auth::{AuthService, Identity};
use crate::events::TracingEventHandler;
use crate::session::{SESSION_COOKIE, SessionManager};
use wordle_core::{GameConfig, PuzzleEngine};
use wordle_persistence::{SeaOrmGameStore, UserRepository};
use wordle_types::{ApiError, GameError, GuessRequest};

pub mod auth;
pub mod config;
pub mod events;
pub mod session;

/// Everything a request handler needs
pub struct AppState {
    pub engine: PuzzleEngine,
    pub auth_service: AuthService,
    pub user_repository: UserRepository,
    pub sessions: SessionManager,
}

impl AppState {
    pub fn new(db: DatabaseConnection, game_config: GameConfig, auth_service: AuthService) -> Self {
        let store = Arc::new(SeaOrmGameStore::new(db.clone()));
        let engine = PuzzleEngine::new(store, game_config)
            .with_event_handler(Arc::new(TracingEventHandler));

        Self {
            engine,
            auth_service,
            user_repository: UserRepository::new(db),
            sessions: SessionManager::new(),
        }
    }

    /// Resolve the caller and make sure their user row exists
    async fn authenticate(&self, auth_header: Option<&str>) -> Result<Identity, Response> {
        let identity = AuthService::bearer_token(auth_header)
            .and_then(|token| self.auth_service.validate_token(token))
            .map_err(|e| {
                tracing::warn!("Rejected request: {}", e);
                plain_reply(
                    &ApiError::new("unauthorized", &e.to_string()),
                    StatusCode::UNAUTHORIZED,
                )
            })?;

        if let Err(e) = self
            .user_repository
            .ensure_user(identity.user_id, &identity.username)
            .await
        {
            tracing::error!("Failed to ensure user {}: {}", identity.user_id, e);
            return Err(plain_reply(
                &ApiError::new("storage", "Failed to load user"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }

        Ok(identity)
    }
}

pub fn create_routes(
    app: Arc<AppState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let app_filter = warp::any().map({
        let app = app.clone();
        move || app.clone()
    });

    let caller = warp::header::optional::<String>("authorization")
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(app_filter);

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let enter = warp::path!("game" / "enter")
        .and(warp::post())
        .and(caller.clone())
        .and_then(handle_enter_request);

    let guess = warp::path!("game" / "guess")
        .and(warp::post())
        .and(warp::body::content_length_limit(1024))
        .and(warp::body::json::<GuessRequest>())
        .and(caller.clone())
        .and_then(handle_guess_request);

    let state = warp::path!("game" / "state")
        .and(warp::get())
        .and(caller.clone())
        .and_then(handle_state_request);

    let tally = warp::path!("game" / "tally")
        .and(warp::get())
        .and(caller)
        .and_then(handle_tally_request);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST"]);

    health
        .or(enter)
        .or(guess)
        .or(state)
        .or(tally)
        .with(cors)
        .with(warp::log("wordle"))
}

/// HTTP status for each game error
pub fn status_for(error: &GameError) -> StatusCode {
    match error {
        GameError::GameNotInitialized => StatusCode::CONFLICT,
        GameError::DailyLimitReached { .. } => StatusCode::FORBIDDEN,
        GameError::InvalidGuessFormat { .. } => StatusCode::BAD_REQUEST,
        GameError::ConcurrentUpdateConflict => StatusCode::CONFLICT,
        GameError::UnknownUser { .. } => StatusCode::NOT_FOUND,
        GameError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn plain_reply<T: Serialize>(body: &T, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

/// JSON reply that also refreshes the session cookie
fn session_reply<T: Serialize>(body: &T, status: StatusCode, session_id: Uuid) -> Response {
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session_id
    );
    warp::reply::with_header(plain_reply(body, status), "set-cookie", cookie).into_response()
}

fn game_reply<T: Serialize>(result: Result<T, GameError>, session_id: Uuid) -> Response {
    match result {
        Ok(body) => session_reply(&body, StatusCode::OK, session_id),
        Err(err) => {
            if let GameError::Storage { message } = &err {
                tracing::error!("Storage failure: {}", message);
            }
            let status = status_for(&err);
            session_reply(&ApiError::from(err), status, session_id)
        }
    }
}

async fn handle_enter_request(
    auth_header: Option<String>,
    session_cookie: Option<String>,
    app: Arc<AppState>,
) -> Result<Response, warp::Rejection> {
    let identity = match app.authenticate(auth_header.as_deref()).await {
        Ok(identity) => identity,
        Err(reply) => return Ok(reply),
    };
    let session_id = app.sessions.open(session_cookie.as_deref());
    let session = app.sessions.session(session_id);

    let result = app
        .engine
        .enter_game(identity.user_id, &session, today())
        .await;
    Ok(game_reply(result, session_id))
}

async fn handle_guess_request(
    request: GuessRequest,
    auth_header: Option<String>,
    session_cookie: Option<String>,
    app: Arc<AppState>,
) -> Result<Response, warp::Rejection> {
    let identity = match app.authenticate(auth_header.as_deref()).await {
        Ok(identity) => identity,
        Err(reply) => return Ok(reply),
    };
    let session_id = app.sessions.open(session_cookie.as_deref());
    let session = app.sessions.session(session_id);

    let result = app
        .engine
        .submit_guess(identity.user_id, &session, &request.guess, today())
        .await;
    Ok(game_reply(result, session_id))
}

async fn handle_state_request(
    auth_header: Option<String>,
    session_cookie: Option<String>,
    app: Arc<AppState>,
) -> Result<Response, warp::Rejection> {
    let identity = match app.authenticate(auth_header.as_deref()).await {
        Ok(identity) => identity,
        Err(reply) => return Ok(reply),
    };
    let session_id = app.sessions.open(session_cookie.as_deref());
    let session = app.sessions.session(session_id);

    let result = app
        .engine
        .restore_state(identity.user_id, &session, today())
        .await;
    Ok(game_reply(result, session_id))
}

async fn handle_tally_request(
    auth_header: Option<String>,
    session_cookie: Option<String>,
    app: Arc<AppState>,
) -> Result<Response, warp::Rejection> {
    let identity = match app.authenticate(auth_header.as_deref()).await {
        Ok(identity) => identity,
        Err(reply) => return Ok(reply),
    };
    let session_id = app.sessions.open(session_cookie.as_deref());

    let result = app.engine.daily_tally(identity.user_id, today()).await;
    Ok(game_reply(result, session_id))
}
