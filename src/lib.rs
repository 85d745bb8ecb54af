use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod echo;
pub mod notify;
pub mod order;
pub mod printer;
pub mod report;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::order::handlers::service_info,
        crate::order::handlers::print_order,
        crate::order::handlers::excel_download,
        crate::order::handlers::test_download,
        crate::echo::handlers::agent_echo,
        crate::echo::handlers::print_echo
    ),
    components(
        schemas(
            report::OrderRequest,
            order::models::PrintResponse,
            order::models::ServiceInfo,
            echo::handlers::PrintEchoResponse,
            echo::handlers::BodyType,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Order Print", description = "Order sheet generation, printing and download."),
        (name = "Debug", description = "Request echo endpoints.")
    )
)]
pub struct ApiDoc;

/// All HTTP routes, shared by the server and the integration tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(order::config).configure(echo::config);
}

fn build_cors(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    if let Some(max_age) = config.retention {
        report::retention::spawn_sweeper(
            config.scratch_dir.clone(),
            report::ReportLabels::for_locale(config.locale)
                .file_prefix
                .to_string(),
            max_age,
        );
    }

    let (host, port) = config.bind_address();
    let cors_allowed_origins = config.cors_allowed_origins.clone();
    let app_state = web::Data::new(AppState::new(config));

    let prometheus = PrometheusMetricsBuilder::new("excel_print_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    log::info!("Starting server at http://{}:{}", host, port);
    log::info!(
        "Printers: {}",
        app_state.config.printers.keys().join(", ")
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(build_cors(&cors_allowed_origins))
            .app_data(app_state.clone())
            .configure(routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((host, port))?
    .run()
    .await
}
