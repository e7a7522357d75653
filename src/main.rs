use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quiz_distiller::{
    app_state::AppState, config::Config, handlers, middleware::RequestIdMiddleware,
};

fn cors(config: &Config) -> Cors {
    match &config.cors_allowed_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .expose_headers(["x-request-id"])
            .max_age(3600),
        None => Cors::permissive(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    config
        .validate_for_production()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let state = AppState::new(config.clone()).map_err(|e| std::io::Error::other(e.to_string()))?;
    let bind_address = (config.web_server_host.clone(), config.web_server_port);

    log::info!(
        "Starting HTTP server on {}:{} (model: {})",
        bind_address.0,
        bind_address.1,
        config.quiz_model
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(handlers::json_config(config.max_payload_bytes))
            .wrap(cors(&config))
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b %Dms request_id=%{x-request-id}o"#,
            ))
            .configure(handlers::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
