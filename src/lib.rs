pub mod config;
mod database;
pub mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod service;

#[cfg(test)]
pub mod test_utils;

pub use config::{Config, LoggingConfig};

use crate::database::postgres_repository::PostgresRepository;
use crate::db::stage_db;
use crate::middleware::{RequestDeadline, RequestLogger};
use crate::routes as app_routes;
use crate::service::user::{SharedUserApi, UserService};
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use rocket_okapi::swagger_ui::{SwaggerUIConfig, make_swagger_ui};
use rocket_okapi::{get_openapi_route, okapi::merge::marge_spec_list};
use sqlx::PgPool;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub fn init_tracing(logging: &LoggingConfig) {
    // RUST_LOG takes precedence over the configured level, e.g.
    //   RUST_LOG=user_service::service=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(logging.with_caller)
        .with_line_number(logging.with_caller);

    if logging.json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn join_base_path(base_path: &str, path: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let suffix = path.trim_start_matches('/');

    if base.is_empty() {
        format!("/{}", suffix)
    } else {
        format!("{}/{}", base, suffix)
    }
}

struct RouteSpec {
    path: &'static str,
    routes: Vec<rocket::Route>,
    openapi: rocket_okapi::okapi::openapi3::OpenApi,
}

fn collect_route_specs() -> Vec<RouteSpec> {
    let (user_routes, user_openapi) = app_routes::user::routes();

    vec![RouteSpec {
        path: "/users",
        routes: user_routes,
        openapi: user_openapi,
    }]
}

fn mount_api_routes(mut rocket: Rocket<Build>, base_path: &str, enable_swagger: bool) -> Rocket<Build> {
    let route_specs = collect_route_specs();

    let mut openapi_list = Vec::new();
    for spec in route_specs {
        rocket = rocket.mount(join_base_path(base_path, spec.path), spec.routes);
        openapi_list.push((spec.path, spec.openapi));
    }

    if !enable_swagger {
        return rocket;
    }

    let openapi_docs = match marge_spec_list(&openapi_list) {
        Ok(docs) => docs,
        Err(err) => {
            tracing::error!(error = %err, "could not merge OpenAPI documents; API docs disabled");
            return rocket;
        }
    };

    let settings = rocket_okapi::settings::OpenApiSettings::default();
    rocket = rocket.mount(base_path, vec![get_openapi_route(openapi_docs, &settings)]);

    let swagger = SwaggerUIConfig {
        url: join_base_path(base_path, "openapi.json"),
        ..Default::default()
    };
    rocket.mount(join_base_path(base_path, "docs"), make_swagger_ui(&swagger))
}

/// Wires the Postgres-backed service once the pool from `stage_db` is managed.
fn stage_user_service() -> AdHoc {
    AdHoc::try_on_ignite("User service", |rocket| async move {
        let Some(pool) = rocket.state::<PgPool>().cloned() else {
            tracing::error!("database pool is not available; user service not started");
            return Err(rocket);
        };

        let service: SharedUserApi = Arc::new(UserService::new(PostgresRepository::new(pool)));
        Ok(rocket.manage(service))
    })
}

/// Routes, catchers and request-scoped state shared by every deployment.
fn assemble(rocket: Rocket<Build>, config: &Config) -> Rocket<Build> {
    let rocket = rocket
        .attach(RequestLogger)
        .manage(RequestDeadline::from_secs(config.api.request_timeout_secs))
        .mount("/health", app_routes::health::routes().0);

    mount_api_routes(rocket, config::DEFAULT_API_BASE_PATH, config.api.enable_swagger).register("/", app_routes::error::catchers())
}

pub fn build_rocket(config: Config) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port));

    let rocket = rocket::custom(figment)
        .attach(stage_db(config.database.clone()))
        .attach(stage_user_service());

    assemble(rocket, &config)
}
