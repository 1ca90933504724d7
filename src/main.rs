use actix_files::Files;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod api;
mod check;
mod config;
mod log;
mod models;
mod pagination;
mod routes;

use api::ApiClient;
use config::Config;

pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
}

async fn health_check() -> impl Responder {
    log::info!("Health check endpoint called");
    HttpResponse::Ok().json("VTube frontend is running!")
}

#[derive(OpenApi)]
#[openapi(
    paths(routes::comments::post_comment),
    components(schemas(models::Comment, routes::comments::CommentRequest))
)]
struct ApiDoc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    log::init_logger();
    check::perform_startup_checks();

    let config = Config::from_file("config.yml").expect("Failed to load config.yml");

    let port = config.server.port;
    let api_base_url = config.resolved_api_base_url();
    log::info!("Backend API: {}", api_base_url);

    let api = ApiClient::new(&api_base_url, config.api.request_timeout)
        .expect("Failed to build HTTP client");

    log::info!("Starting VTube frontend on port {}...", port);

    let app_state = web::Data::new(AppState { config, api });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(log::PageLogger)
            .service(Files::new("/assets", "assets"))
            .service(
                SwaggerUi::new("/docs/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .route("/", web::get().to(routes::frontend::page_home))
            .route("/video/{id}", web::get().to(routes::frontend::page_video))
            .route(
                "/api/videos/{video_id}/comments",
                web::post().to(routes::comments::post_comment),
            )
            .route("/health", web::get().to(health_check))
            .default_service(web::route().to(routes::frontend::page_not_found))
    })
    .bind(("127.0.0.1", port))?
    .run();

    log::info!("Server running at http://127.0.0.1:{}/", port);

    server.await
}
