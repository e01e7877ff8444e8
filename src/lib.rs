use actix_web::middleware::Compress;
use actix_web::{web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod document;
pub mod latex;
pub mod state;
pub mod storage;

pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

/// Registers the HTTP surface. Shared between [`run`] and the integration
/// tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(document::handlers::show_form)))
        .service(
            web::resource("/generate")
                .route(web::post().to(document::handlers::generate_document)),
        )
        .service(
            web::resource("/preview")
                .route(web::get().to(document::handlers::preview_document)),
        )
        .service(
            web::resource("/artifact/{id}")
                .route(web::get().to(document::handlers::serve_document)),
        )
        .service(
            web::resource("/artifact/{id}/download")
                .route(web::post().to(document::handlers::download_document)),
        );
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::document::handlers::show_form,
            crate::document::handlers::generate_document,
            crate::document::handlers::preview_document,
            crate::document::handlers::serve_document,
            crate::document::handlers::download_document
        ),
        components(
            schemas(
                document::models::SubmissionForm,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Document Service", description = "Form-to-PDF generation and serving endpoints.")
        )
    )]
    struct ApiDoc;

    dotenvy::dotenv().ok(); // Load .env file
    let config = match crate::config::ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };
    let bind = (config.bind_addr.clone(), config.bind_port);

    let app_state = match AppState::new(config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!(
                "Failed to prepare working directories. Check TEXFORM_WORK_DIR and TEXFORM_PDF_DIR. Error: {:#}",
                e
            );
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("texform_server")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus metrics middleware");

    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .app_data(app_state)
            .configure(routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(bind)?
    .run()
    .await
}
