//! Single binary web server: HTML from templates/, static from /static, API under /api.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, SCORING_MODE, STATIC_DIR.

use actix_files::Files;
use actix_web::{
    get,
    middleware::Logger,
    web::{self, Data},
    App, HttpResponse, HttpServer,
};
use competition_manager::{api, Config, Database};

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    log::info!(
        "Starting server at http://{}:{} (default scoring: {:?})",
        config.host,
        config.port,
        config.scoring_mode
    );

    let db = Data::new(Database::new());
    let bind = (config.host.clone(), config.port);
    let static_dir = config.static_dir.clone();
    let config = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(db.clone())
            .app_data(config.clone())
            .configure(api::configure)
            .route("/", web::get().to(serve_index_async))
            .service(favicon)
            .service(Files::new("/static", &static_dir))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
