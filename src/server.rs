//! HTTP adapter over [`ActivityService`].
//!
//! Handlers only parse the request, call the service, and turn the outcome
//! into JSON. Request validation (language code, email syntax, body shape)
//! happens here so the service only sees well-formed input.

use crate::email::EmailAddress;
use crate::error::{ApiError, LocalizedError};
use crate::i18n::Language;
use crate::metrics::MetricsReport;
use crate::service::{ActivityBoard, ActivityService};
use anyhow::Result;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Query string accepted by every activity route.
#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    /// Language code of the request ("en" or "hu"); English when absent
    pub lang: Option<String>,
}

/// JSON body of the signup and unregister routes.
#[derive(Debug, Deserialize)]
pub struct EmailBody {
    /// Student email, validated into an `EmailAddress` by the handler
    pub email: String,
}

/// Success body of the signup and unregister routes.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Confirmation in the request language
    pub message: String,
}

/// Build the HTTP router over a shared service.
///
/// # Routes
/// * `GET /` - service name, version and supported languages
/// * `GET /health` - plain `OK`
/// * `GET /activities?lang=` - every activity in the requested language
/// * `POST /activities/:activity_name/signup?lang=` - body `{"email": ...}`
/// * `DELETE /activities/:activity_name/unregister?lang=` - body `{"email": ...}`
/// * `GET /metrics` - outcome counters
///
/// Failures are answered with `{"detail": ...}` in the request language
/// (see [`LocalizedError`]).
///
/// # Arguments
/// * `service` - The service every handler shares
pub fn router(service: Arc<ActivityService>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/activities", get(list_activities))
        .route("/activities/:activity_name/signup", post(signup))
        .route("/activities/:activity_name/unregister", delete(unregister))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve the router on `listener` until Ctrl-C or SIGTERM.
///
/// In-flight requests finish before this returns.
///
/// # Arguments
/// * `listener` - An already bound listener; tests bind port 0
/// * `service` - The service behind every route
///
/// # Returns
/// * `Ok(())` after a graceful shutdown
/// * `Err` if the listener has no local address or the server fails
pub async fn serve(listener: TcpListener, service: Arc<ActivityService>) -> Result<()> {
    let address = listener.local_addr()?;
    info!("✓ Listening on {}", address);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// ==================== Request Parsing ====================

/// Resolve the `lang` query parameter.
///
/// A missing `lang` means the canonical language. A query string that does
/// not deserialize (for example a repeated `lang`) or an unknown code is a
/// 422, reported in the canonical language since the caller's is unknown.
fn request_language(
    query: Result<Query<LangQuery>, QueryRejection>,
) -> Result<Language, LocalizedError> {
    let Query(query) = query.map_err(|rejection| {
        warn!("Rejected query string: {}", rejection.body_text());
        ApiError::InvalidRequest(rejection.body_text()).localized(Language::default())
    })?;

    match query.lang.as_deref() {
        None => Ok(Language::default()),
        Some(code) => Language::from_code(code).map_err(|e| {
            warn!("Rejected request: {}", e);
            ApiError::UnsupportedLanguage(code.to_string()).localized(Language::default())
        }),
    }
}

/// The activity name from the path, as the caller wrote it.
fn request_activity(
    path: Result<Path<String>, PathRejection>,
    language: Language,
) -> Result<String, LocalizedError> {
    let Path(activity_name) = path.map_err(|rejection| {
        warn!("Rejected path: {}", rejection.body_text());
        ApiError::InvalidRequest(rejection.body_text()).localized(language)
    })?;
    Ok(activity_name)
}

fn request_email(
    body: Result<Json<EmailBody>, JsonRejection>,
    language: Language,
) -> Result<EmailAddress, LocalizedError> {
    let Json(body) = body.map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        ApiError::InvalidRequest(rejection.body_text()).localized(language)
    })?;

    EmailAddress::parse(&body.email).map_err(|e| {
        warn!("Rejected email: {}", e);
        ApiError::InvalidEmail(e.to_string()).localized(language)
    })
}

// ==================== Handlers ====================

async fn index() -> Json<Value> {
    let languages: Vec<Value> = Language::all()
        .into_iter()
        .map(|lang| {
            json!({
                "code": lang.code(),
                "name": lang.name(),
                "native_name": lang.native_name(),
            })
        })
        .collect();

    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "languages": languages,
    }))
}

async fn health() -> &'static str {
    "OK"
}

async fn list_activities(
    State(service): State<Arc<ActivityService>>,
    query: Result<Query<LangQuery>, QueryRejection>,
) -> Result<Json<ActivityBoard>, LocalizedError> {
    let language = request_language(query)?;
    Ok(Json(service.list_activities(language)))
}

async fn signup(
    State(service): State<Arc<ActivityService>>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<LangQuery>, QueryRejection>,
    body: Result<Json<EmailBody>, JsonRejection>,
) -> Result<Json<MessageResponse>, LocalizedError> {
    let language = request_language(query)?;
    let activity_name = request_activity(path, language)?;
    let email = request_email(body, language)?;

    service
        .signup(&activity_name, &email, language)
        .map_err(|e| ApiError::from(e).localized(language))?;

    Ok(Json(MessageResponse {
        message: language
            .strings()
            .signed_up_message(email.as_str(), &activity_name),
    }))
}

async fn unregister(
    State(service): State<Arc<ActivityService>>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<LangQuery>, QueryRejection>,
    body: Result<Json<EmailBody>, JsonRejection>,
) -> Result<Json<MessageResponse>, LocalizedError> {
    let language = request_language(query)?;
    let activity_name = request_activity(path, language)?;
    let email = request_email(body, language)?;

    service
        .unregister(&activity_name, &email, language)
        .map_err(|e| ApiError::from(e).localized(language))?;

    Ok(Json(MessageResponse {
        message: language
            .strings()
            .unregistered_message(email.as_str(), &activity_name),
    }))
}

async fn metrics(State(service): State<Arc<ActivityService>>) -> Json<MetricsReport> {
    Json(service.metrics().report())
}
