//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{EnrollmentService, QuizResultService};
use crate::inbound::http;
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::state::HttpState;
use crate::middleware::Trace;
use crate::outbound::persistence::{
    MemoryEnrollmentRequestRepository, MemoryQuizRecordRepository, MemoryQuizRepository,
    MemoryUserRepository,
};

/// Wire the driven adapters into domain services and bundle them for
/// handler injection.
fn build_http_state() -> HttpState {
    let users = Arc::new(MemoryUserRepository::new());
    let enrollments = Arc::new(EnrollmentService::new(
        Arc::new(MemoryEnrollmentRequestRepository::new()),
        Arc::clone(&users),
    ));
    let quiz_results = Arc::new(QuizResultService::new(
        Arc::new(MemoryQuizRepository::new()),
        Arc::new(MemoryQuizRecordRepository::new()),
        users,
    ));
    HttpState::new(enrollments, quiz_results)
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1").configure(http::configure);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.route(
        "/api-docs/openapi.json",
        web::get().to(|| async { web::Json(ApiDoc::openapi()) }),
    );
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct the HTTP server from the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state());
    let server_health_state = health_state.clone();

    let mut server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }
    let server = server.bind(config.bind_addr())?.run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;

    #[actix_web::test]
    async fn built_app_serves_probes_and_api_routes() {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        let http_state = web::Data::new(build_http_state());
        let app =
            actix_test::init_service(build_app(health_state, http_state)).await;

        let probe = actix_test::TestRequest::get()
            .uri("/health/ready")
            .to_request();
        assert_eq!(
            actix_test::call_service(&app, probe).await.status(),
            StatusCode::OK
        );

        // Empty store, but the route is wired and responds.
        let unauthenticated = actix_test::TestRequest::get()
            .uri("/api/v1/enrollments")
            .to_request();
        assert_eq!(
            actix_test::call_service(&app, unauthenticated).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
