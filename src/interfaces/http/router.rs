//! API router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::middleware::{auth_middleware, AuthState};
use super::modules::{cottages, health, metrics, request_id, reservations, stats};
use crate::application::AppServices;
use crate::domain::IdentityVerifier;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT issued by the marketplace user service"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::handlers::health_check,
        reservations::create_reservation,
        reservations::list_my_reservations,
        reservations::list_owner_reservations,
        reservations::get_reservation,
        reservations::approve_reservation,
        reservations::deny_reservation,
        reservations::cancel_reservation,
        reservations::mark_reservation_reviewed,
        cottages::create_cottage,
        cottages::list_my_cottages,
        cottages::get_cottage,
        cottages::check_availability,
        cottages::get_calendar,
        stats::general_stats,
        stats::owner_stats,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::handlers::HealthResponse,
            health::handlers::ComponentHealth,
            reservations::CreateReservationRequest,
            reservations::DenyReservationRequest,
            reservations::ReservationDto,
            cottages::CreateCottageRequest,
            cottages::CottageDto,
            cottages::AvailabilityDto,
            cottages::CalendarEntryDto,
            stats::GeneralStatsDto,
            stats::OwnerStatsDto,
            stats::CottageStatsDto,
            stats::MonthlyCountDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Reservations", description = "Booking requests and their approve / deny / cancel lifecycle"),
        (name = "Cottages", description = "Cottage listings, availability and occupancy calendar"),
        (name = "Statistics", description = "Reservation statistics for the marketplace and for owners"),
    ),
    info(
        title = "Cottage Rental Reservation API",
        version = "1.0.0",
        description = "Reservation lifecycle and availability engine for a mountain cottage marketplace",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the HTTP router. `/metrics` is mounted only when a Prometheus
/// handle is supplied.
pub fn create_api_router(
    services: AppServices,
    db: DatabaseConnection,
    verifier: Arc<dyn IdentityVerifier>,
    metrics_handle: Option<PrometheusHandle>,
) -> Router {
    let auth = AuthState::new(verifier);

    // All reservation routes require a caller.
    let reservation_routes = Router::new()
        .route("/", post(reservations::create_reservation))
        .route("/my", get(reservations::list_my_reservations))
        .route("/owner", get(reservations::list_owner_reservations))
        .route("/{id}", get(reservations::get_reservation))
        .route("/{id}/approve", post(reservations::approve_reservation))
        .route("/{id}/deny", post(reservations::deny_reservation))
        .route("/{id}/cancel", post(reservations::cancel_reservation))
        .route("/{id}/reviewed", post(reservations::mark_reservation_reviewed))
        .route_layer(middleware::from_fn_with_state(auth.clone(), auth_middleware))
        .with_state(reservations::ReservationHandlerState {
            service: services.reservations.clone(),
        });

    let cottage_public = Router::new()
        .route("/{id}", get(cottages::get_cottage))
        .route("/{id}/availability", get(cottages::check_availability))
        .route("/{id}/calendar", get(cottages::get_calendar));
    let cottage_protected = Router::new()
        .route("/", post(cottages::create_cottage))
        .route("/my", get(cottages::list_my_cottages))
        .route_layer(middleware::from_fn_with_state(auth.clone(), auth_middleware));
    let cottage_routes = cottage_public
        .merge(cottage_protected)
        .with_state(cottages::CottageHandlerState {
            cottages: services.cottages.clone(),
            reservations: services.reservations.clone(),
        });

    let stats_protected = Router::new()
        .route("/owner", get(stats::owner_stats))
        .route_layer(middleware::from_fn_with_state(auth, auth_middleware));
    let stats_routes = Router::new()
        .route("/general", get(stats::general_stats))
        .merge(stats_protected)
        .with_state(stats::StatsHandlerState {
            service: services.statistics.clone(),
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState::new(db));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .nest("/api/v1/reservations", reservation_routes)
        .nest("/api/v1/cottages", cottage_routes)
        .nest("/api/v1/stats", stats_routes);

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .route_layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    use crate::domain::{Role, StayPolicy};
    use crate::infrastructure::crypto::{create_token, JwtConfig, JwtIdentityVerifier};
    use crate::infrastructure::database::{test_database, SeaOrmRepositoryProvider};
    use crate::shared::FixedClock;

    struct TestApp {
        router: Router,
        jwt: JwtConfig,
    }

    impl TestApp {
        async fn new() -> Self {
            let db = test_database().await;
            let jwt = JwtConfig {
                secret: "router-test-secret".into(),
                expiration_hours: 1,
                issuer: "cottage-rental".into(),
            };
            let now = Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap();
            let services = AppServices::new(
                Arc::new(SeaOrmRepositoryProvider::new(db.clone())),
                StayPolicy::default(),
                Arc::new(FixedClock(now)),
            );
            let verifier = Arc::new(JwtIdentityVerifier::new(jwt.clone()));
            Self {
                router: create_api_router(services, db, verifier, None),
                jwt,
            }
        }

        fn token(&self, user_id: &str, role: Role) -> String {
            create_token(user_id, user_id, role, &self.jwt).unwrap()
        }

        async fn call(
            &self,
            method: &str,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            use tower::Service;

            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header("authorization", format!("Bearer {}", token));
            }
            let req = match body {
                Some(body) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let mut svc = self.router.clone().into_service();
            let resp = svc.call(req).await.unwrap();
            let status = resp.status();
            let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
                .await
                .unwrap();
            let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, json)
        }

        async fn register_cottage(&self, owner_token: &str) -> String {
            let (status, body) = self
                .call(
                    "POST",
                    "/api/v1/cottages",
                    Some(owner_token),
                    Some(json!({"name": "Pine Lodge", "location": "Kopaonik"})),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{}", body);
            body["data"]["id"].as_str().unwrap().to_string()
        }

        async fn book(&self, tourist_token: &str, cottage_id: &str, start: &str, end: &str) -> (StatusCode, Value) {
            self.call(
                "POST",
                "/api/v1/reservations",
                Some(tourist_token),
                Some(json!({"cottage_id": cottage_id, "start_date": start, "end_date": end})),
            )
            .await
        }
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = TestApp::new().await;
        let (status, body) = app.call("GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"]["status"], "ok");
    }

    #[tokio::test]
    async fn reservation_routes_require_a_bearer_token() {
        let app = TestApp::new().await;
        let (status, body) = app.call("GET", "/api/v1/reservations/my", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        let (status, _) = app
            .call("GET", "/api/v1/reservations/my", Some("garbage"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn booking_lifecycle_over_http() {
        let app = TestApp::new().await;
        let owner = app.token("owner-1", Role::Owner);
        let tourist = app.token("tourist-1", Role::Tourist);
        let rival = app.token("tourist-2", Role::Tourist);
        let cottage_id = app.register_cottage(&owner).await;

        let (status, body) = app.book(&tourist, &cottage_id, "2025-09-10", "2025-09-15").await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["data"]["status"], "unresolved");
        assert_eq!(body["data"]["start_date"], "2025-09-10T14:00:00Z");
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = app.book(&rival, &cottage_id, "2025-09-05", "2025-09-12").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("not available"));

        let (status, _) = app
            .call("POST", &format!("/api/v1/reservations/{}/approve", id), Some(&tourist), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app
            .call("POST", &format!("/api/v1/reservations/{}/approve", id), Some(&owner), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "approved");

        let (status, _) = app
            .call(
                "POST",
                &format!("/api/v1/reservations/{}/deny", id),
                Some(&owner),
                Some(json!({"deny_comment": "too late"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = app
            .call("GET", "/api/v1/reservations/my?scope=current", Some(&tourist), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, _) = app
            .call("GET", &format!("/api/v1/reservations/{}", id), Some(&rival), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app
            .call(
                "GET",
                &format!("/api/v1/cottages/{}/availability?start=2025-09-14&end=2025-09-16", cottage_id),
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["available"], false);

        let (status, body) = app
            .call(
                "GET",
                &format!(
                    "/api/v1/cottages/{}/availability?start=2025-09-14&end=2025-09-16&exclude={}",
                    cottage_id, id
                ),
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["available"], true);

        let (status, body) = app
            .call("GET", &format!("/api/v1/cottages/{}/calendar", cottage_id), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["status"], "approved");
        assert!(body["data"][0].get("tourist_id").is_none());

        let (status, body) = app
            .call("GET", "/api/v1/reservations/owner?status=approved", Some(&owner), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["id"], id.as_str());
    }

    #[tokio::test]
    async fn deny_without_comment_is_400() {
        let app = TestApp::new().await;
        let owner = app.token("owner-1", Role::Owner);
        let tourist = app.token("tourist-1", Role::Tourist);
        let cottage_id = app.register_cottage(&owner).await;
        let (_, body) = app.book(&tourist, &cottage_id, "2025-09-10", "2025-09-15").await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, _) = app
            .call(
                "POST",
                &format!("/api/v1/reservations/{}/deny", id),
                Some(&owner),
                Some(json!({})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .call(
                "POST",
                &format!("/api/v1/reservations/{}/deny", id),
                Some(&owner),
                Some(json!({"deny_comment": "closed for maintenance"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "denied");
        assert_eq!(body["data"]["deny_comment"], "closed for maintenance");
    }

    #[tokio::test]
    async fn input_errors_map_to_4xx() {
        let app = TestApp::new().await;
        let owner = app.token("owner-1", Role::Owner);
        let tourist = app.token("tourist-1", Role::Tourist);
        let cottage_id = app.register_cottage(&owner).await;

        let (status, _) = app.book(&tourist, &cottage_id, "2025-09-15", "2025-09-10").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app.book(&tourist, "", "2025-09-10", "2025-09-15").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = app.book(&tourist, "missing", "2025-09-10", "2025-09-15").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.book(&owner, &cottage_id, "2025-09-10", "2025-09-15").await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .call("GET", "/api/v1/reservations/my?scope=past", Some(&tourist), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .call("POST", "/api/v1/reservations/missing/cancel", Some(&tourist), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .call(
                "GET",
                &format!("/api/v1/cottages/{}/availability?start=2025-09-10", cottage_id),
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cancel_inside_window_is_409() {
        let app = TestApp::new().await;
        let owner = app.token("owner-1", Role::Owner);
        let tourist = app.token("tourist-1", Role::Tourist);
        let cottage_id = app.register_cottage(&owner).await;
        let (_, body) = app.book(&tourist, &cottage_id, "2025-08-01", "2025-08-04").await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, _) = app
            .call("POST", &format!("/api/v1/reservations/{}/cancel", id), Some(&tourist), None)
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn statistics_endpoints() {
        let app = TestApp::new().await;
        let owner = app.token("owner-1", Role::Owner);
        app.register_cottage(&owner).await;

        let (status, body) = app.call("GET", "/api/v1/stats/general", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["cottages"], 1);

        let (status, _) = app.call("GET", "/api/v1/stats/owner", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = app
            .call("GET", "/api/v1/stats/owner", Some(&owner), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["cottages"][0]["weekend"], 0);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = TestApp::new().await;
        let (status, body) = app.call("GET", "/api-doc/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/api/v1/reservations/{id}/approve").is_some());
    }
}
