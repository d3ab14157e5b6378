use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info, warn};

use wordle_core::WordList;
use wordle_persistence::{WordRepository, connect_and_migrate};
use wordle_server::{
    AppState,
    auth::AuthService,
    config::{AuthSettings, Config},
    create_routes,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Wordle server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize database connection and run migrations
    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };

    info!("Loading words from {}", config.words_file);
    let word_list = match std::fs::read_to_string(&config.words_file) {
        Ok(text) => WordList::from_word_list(&text),
        Err(e) => {
            error!("Failed to read word file '{}': {}", config.words_file, e);
            error!("Set WORDS_FILE to a file with one 5-letter word per line.");
            std::process::exit(1);
        }
    };

    let words = WordRepository::new(db.clone());
    match words.seed(&word_list).await {
        Ok(inserted) => info!(
            "Seeded {} new words ({} valid in file)",
            inserted,
            word_list.len()
        ),
        Err(e) => {
            error!("Failed to seed word pool: {}", e);
            std::process::exit(1);
        }
    }
    match words.count().await {
        Ok(0) => warn!("Word pool is empty; every player will see pool_exhausted"),
        Ok(count) => info!("Word pool holds {} words", count),
        Err(e) => warn!("Failed to count word pool: {}", e),
    }

    let auth_service = match &config.auth {
        AuthSettings::Dev => {
            info!("Starting in development authentication mode - JWT validation disabled");
            AuthService::new_dev_mode()
        }
        AuthSettings::Jwt { secret } => AuthService::new(secret),
    };

    let app = Arc::new(AppState::new(db, config.game_config(), auth_service));
    let routes = create_routes(app.clone());

    // Start session cleanup task
    let session_ttl = config.session_ttl();
    let cleanup_app = app.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let removed = cleanup_app.sessions.cleanup_expired(session_ttl);
            if removed > 0 {
                info!("Removed {} expired sessions", removed);
            }
        }
    });

    info!("Server starting on {}:{}", config.host, config.port);

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown((config.host, config.port), shutdown_signal());

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal as unix_signal};

        match (
            unix_signal(SignalKind::interrupt()),
            unix_signal(SignalKind::terminate()),
        ) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully...");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully...");
                    }
                }
            }
            _ => {
                warn!("Failed to install signal handlers, listening for Ctrl+C only");
                if signal::ctrl_c().await.is_ok() {
                    info!("Received Ctrl+C, shutting down gracefully...");
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down gracefully..."),
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }
}
