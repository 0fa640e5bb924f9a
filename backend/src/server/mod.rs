//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{RosterSettings, ServerConfig};

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use roster::Trace;
#[cfg(debug_assertions)]
use roster::doc::ApiDoc;
use roster::inbound::http::auth::{current_session, login, logout};
use roster::inbound::http::calendar::{get_calendar, get_calendar_day};
use roster::inbound::http::employees::{
    employee_schedule, get_legend, list_coworkers, list_employees, search_employee,
};
use roster::inbound::http::health::{HealthState, live, ready};
use roster::inbound::http::imports::{configure_limits, parse_roster, save_roster};
use roster::inbound::http::session_config::SessionSettings;
use roster::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    ttl_hours: i64,
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
        key,
        cookie_secure,
        same_site,
        ttl_hours,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::hours(ttl_hours)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .configure(configure_limits)
        .service(login)
        .service(logout)
        .service(current_session)
        .service(get_calendar)
        .service(get_calendar_day)
        .service(list_employees)
        .service(search_employee)
        .service(employee_schedule)
        .service(list_coworkers)
        .service(get_legend)
        .service(parse_roster)
        .service(save_roster);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Build the HTTP state, bind the listener and mark the service ready.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when the parser adapter cannot be built or
/// the socket cannot be bound.
pub fn create_server(config: ServerConfig) -> std::io::Result<(Server, web::Data<HealthState>)> {
    let (http_state, backings) = build_http_state(&config)?;
    let health_state = web::Data::new(HealthState::new(backings.storage, backings.parser));
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(http_state);
    let ServerConfig {
        session:
            SessionSettings {
                key,
                cookie_secure,
                same_site,
                ttl_hours,
            },
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            ttl_hours,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok((server, health_state))
}
