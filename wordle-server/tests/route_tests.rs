
use std::time::Duration;

use test_helpers::*;
use wordle_core::GameConfig;
use wordle_server::auth::{AuthService, Identity};
use wordle_server::create_routes;
use wordle_types::{
    ApiError, DailyTally, GameEntry, GameStatus, GuessResponse, RestoredState, Verdict,
};

#[tokio::test]
async fn test_health_endpoint() {
    let test_app = TestApp::dev().await;
    let routes = create_routes(test_app.app.clone());

    let response = warp::test::request()
        .method("GET")
        .path("/health")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), "OK");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let test_app = TestApp::dev().await;
    let routes = create_routes(test_app.app.clone());

    let response = warp::test::request()
        .method("POST")
        .path("/game/enter")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 401);
    let error: ApiError = json(&response);
    assert_eq!(error.code, "unauthorized");
}

#[tokio::test]
async fn test_enter_creates_user_and_session() {
    let test_app = TestApp::dev().await;
    let routes = create_routes(test_app.app.clone());
    let (user_id, auth) = dev_user("alice");

    let response = warp::test::request()
        .method("POST")
        .path("/game/enter")
        .header("authorization", &auth)
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 200);
    let entry: GameEntry = json(&response);
    assert_eq!(entry.status, GameStatus::Active);
    assert_eq!(entry.max_attempts, 5);
    assert!(session_cookie(&response).starts_with("wordle_session="));

    let user = test_app.users.find_by_id(user_id).await.unwrap().unwrap();
    assert_eq!(user.username, "alice");
}

#[tokio::test]
async fn test_guess_before_enter_conflicts() {
    let test_app = TestApp::dev().await;
    let routes = create_routes(test_app.app.clone());
    let (_, auth) = dev_user("bob");

    let response = warp::test::request()
        .method("POST")
        .path("/game/guess")
        .header("authorization", &auth)
        .json(&serde_json::json!({ "guess": "crane" }))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 409);
    let error: ApiError = json(&response);
    assert_eq!(error.code, "game_not_initialized");
}

#[tokio::test]
async fn test_play_one_word() {
    let test_app = TestApp::dev().await;
    let routes = create_routes(test_app.app.clone());
    let (user_id, auth) = dev_user("carol");

    let response = warp::test::request()
        .method("POST")
        .path("/game/enter")
        .header("authorization", &auth)
        .reply(&routes)
        .await;
    let cookie = session_cookie(&response);
    let secret = test_app.bound_secret(user_id).await;

    let response = warp::test::request()
        .method("POST")
        .path("/game/guess")
        .header("authorization", &auth)
        .header("cookie", &cookie)
        .json(&serde_json::json!({ "guess": "zzzzz" }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200);
    let first: GuessResponse = json(&response);
    assert_eq!(first.results, vec![Verdict::Wrong; 5]);
    assert_eq!(first.attempts_remaining, 4);
    assert!(!first.game_over);

    let response = warp::test::request()
        .method("GET")
        .path("/game/state")
        .header("authorization", &auth)
        .header("cookie", &cookie)
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200);
    let state: RestoredState = json(&response);
    assert_eq!(
        state,
        RestoredState::Active {
            guesses: vec!["ZZZZZ".to_string()],
            results_history: vec![vec![Verdict::Wrong; 5]],
            is_solved: false,
            current_row: 1,
        }
    );

    let response = warp::test::request()
        .method("POST")
        .path("/game/guess")
        .header("authorization", &auth)
        .header("cookie", &cookie)
        .json(&serde_json::json!({ "guess": secret.to_lowercase() }))
        .reply(&routes)
        .await;
    let second: GuessResponse = json(&response);
    assert!(second.is_correct);
    assert!(second.game_over);
    assert_eq!(second.guesses, vec!["ZZZZZ".to_string(), secret]);

    let response = warp::test::request()
        .method("GET")
        .path("/game/tally")
        .header("authorization", &auth)
        .reply(&routes)
        .await;
    let tally: DailyTally = json(&response);
    assert_eq!(tally.user_id, user_id);
    assert_eq!(tally.words_tried, 2);
    assert_eq!(tally.words_solved, 1);
}

#[tokio::test]
async fn test_invalid_guess_is_bad_request() {
    let test_app = TestApp::dev().await;
    let routes = create_routes(test_app.app.clone());
    let (_, auth) = dev_user("dave");

    let response = warp::test::request()
        .method("POST")
        .path("/game/enter")
        .header("authorization", &auth)
        .reply(&routes)
        .await;
    let cookie = session_cookie(&response);

    let response = warp::test::request()
        .method("POST")
        .path("/game/guess")
        .header("authorization", &auth)
        .header("cookie", &cookie)
        .json(&serde_json::json!({ "guess": "toolong" }))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 400);
    let error: ApiError = json(&response);
    assert_eq!(error.code, "invalid_guess_format");
}

#[tokio::test]
async fn test_daily_limit_over_http() {
    let test_app = TestApp::dev().await;
    let routes = create_routes(test_app.app.clone());
    let (user_id, auth) = dev_user("erin");
    let response = warp::test::request()
        .method("POST")
        .path("/game/enter")
        .header("authorization", &auth)
        .reply(&routes)
        .await;
    let cookie = session_cookie(&response);

    for played in 0..3 {
        if played > 0 {
            let response = warp::test::request()
                .method("POST")
                .path("/game/enter")
                .header("authorization", &auth)
                .header("cookie", &cookie)
                .reply(&routes)
                .await;
            assert_eq!(session_cookie(&response), cookie);
        }
        let secret = test_app.bound_secret(user_id).await;

        let response = warp::test::request()
            .method("POST")
            .path("/game/guess")
            .header("authorization", &auth)
            .header("cookie", &cookie)
            .json(&serde_json::json!({ "guess": secret }))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), 200);
    }

    let response = warp::test::request()
        .method("POST")
        .path("/game/enter")
        .header("authorization", &auth)
        .header("cookie", &cookie)
        .reply(&routes)
        .await;
    let entry: GameEntry = json(&response);
    assert_eq!(entry.status, GameStatus::DailyLimitReached);
    assert_eq!(entry.words_played_today, 3);

    let response = warp::test::request()
        .method("POST")
        .path("/game/guess")
        .header("authorization", &auth)
        .header("cookie", &cookie)
        .json(&serde_json::json!({ "guess": "apple" }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 403);
    let error: ApiError = json(&response);
    assert_eq!(error.code, "daily_limit_reached");

    let response = warp::test::request()
        .method("GET")
        .path("/game/state")
        .header("authorization", &auth)
        .header("cookie", &cookie)
        .reply(&routes)
        .await;
    let state: RestoredState = json(&response);
    assert_eq!(state, RestoredState::DailyLimitReached);
}

#[tokio::test]
async fn test_state_survives_lost_cookie() {
    let test_app = TestApp::dev().await;
    let routes = create_routes(test_app.app.clone());
    let (_, auth) = dev_user("frank");

    let response = warp::test::request()
        .method("POST")
        .path("/game/enter")
        .header("authorization", &auth)
        .reply(&routes)
        .await;
    let cookie = session_cookie(&response);

    warp::test::request()
        .method("POST")
        .path("/game/guess")
        .header("authorization", &auth)
        .header("cookie", &cookie)
        .json(&serde_json::json!({ "guess": "zzzzz" }))
        .reply(&routes)
        .await;

    let response = warp::test::request()
        .method("GET")
        .path("/game/state")
        .header("authorization", &auth)
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 200);
    assert_ne!(session_cookie(&response), cookie);
    let state: RestoredState = json(&response);
    assert!(state.is_active());
}

#[tokio::test]
async fn test_signed_tokens() {
    let test_app = TestApp::with_auth(AuthService::new("test-secret")).await;
    let routes = create_routes(test_app.app.clone());

    let identity = Identity {
        user_id: uuid::Uuid::new_v4(),
        username: "grace".to_string(),
    };
    let token = test_app
        .app
        .auth_service
        .issue_token(&identity, Duration::from_secs(300))
        .unwrap();

    let response = warp::test::request()
        .method("POST")
        .path("/game/enter")
        .header("authorization", format!("Bearer {}", token))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200);

    let response = warp::test::request()
        .method("POST")
        .path("/game/enter")
        .header("authorization", format!("Bearer {}:grace", identity.user_id))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_pool_exhausted_is_a_status() {
    let test_app = TestApp::with_config(GameConfig::new(10, 5)).await;
    let routes = create_routes(test_app.app.clone());
    let (user_id, auth) = dev_user("heidi");

    let response = warp::test::request()
        .method("POST")
        .path("/game/enter")
        .header("authorization", &auth)
        .reply(&routes)
        .await;
    let cookie = session_cookie(&response);

    for _ in 0..TEST_WORDS.len() {
        let response = warp::test::request()
            .method("POST")
            .path("/game/enter")
            .header("authorization", &auth)
            .header("cookie", &cookie)
            .reply(&routes)
            .await;
        let entry: GameEntry = json(&response);
        assert_eq!(entry.status, GameStatus::Active);

        let secret = test_app.bound_secret(user_id).await;
        let response = warp::test::request()
            .method("POST")
            .path("/game/guess")
            .header("authorization", &auth)
            .header("cookie", &cookie)
            .json(&serde_json::json!({ "guess": secret }))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), 200);
    }

    let response = warp::test::request()
        .method("POST")
        .path("/game/enter")
        .header("authorization", &auth)
        .header("cookie", &cookie)
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200);
    let entry: GameEntry = json(&response);
    assert_eq!(entry.status, GameStatus::PoolExhausted);
    assert_eq!(entry.words_played_today, TEST_WORDS.len() as u32);
}
