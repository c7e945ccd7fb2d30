//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_states;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use dogspot::Trace;
#[cfg(debug_assertions)]
use dogspot::doc::ApiDoc;
use dogspot::inbound::http::favorites::{
    add_favorite, favorite_status, list_favorites, remove_favorite, toggle_favorite,
};
use dogspot::inbound::http::health::{HealthState, live, ready};
use dogspot::inbound::http::json_config;
use dogspot::inbound::http::routing::get_route;
use dogspot::inbound::http::site::{map_config, robots, sitemap};
use dogspot::inbound::http::spots::{find_spots, list_categories};
use dogspot::inbound::http::state::HttpState;
use dogspot::inbound::ws;
use dogspot::inbound::ws::state::WsState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        ws_state,
    } = deps;

    let api = web::scope("/api/v1")
        .app_data(json_config())
        .service(list_categories)
        .service(find_spots)
        .service(list_favorites)
        .service(add_favorite)
        .service(toggle_favorite)
        .service(favorite_status)
        .service(remove_favorite)
        .service(get_route)
        .service(map_config);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .wrap(Trace)
        .service(api)
        .service(ws::ws_entry)
        .service(robots)
        .service(sitemap)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// The readiness probe flips to ready once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when an adapter cannot be built, or when
/// binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let (http_state, ws_state) = build_states(config)?;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            ws_state: ws_state.clone(),
        })
    })
    .bind(config.bind_addr())?
    .run();

    health_state.mark_ready();
    Ok(server)
}
