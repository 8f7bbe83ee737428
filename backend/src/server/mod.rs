//! Server construction and middleware wiring.

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use std::net::SocketAddr;

use crate::context::AppContext;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::{json_error_handler, users};
use crate::middleware::Trace;

/// Build the application with every route and middleware registered.
pub fn build_app(
    health_state: web::Data<HealthState>,
    context: web::Data<AppContext>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1").configure(users::configure);

    App::new()
        .app_data(health_state)
        .app_data(context)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live)
}

/// Bind an Actix HTTP server on `bind_addr` serving `context`.
///
/// Readiness is flagged once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    context: AppContext,
    bind_addr: SocketAddr,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let context = web::Data::new(context);

    let server = HttpServer::new(move || build_app(server_health_state.clone(), context.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
