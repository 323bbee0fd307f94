use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use sentiment_backend::{build_state, config::Config, error::StartupError, handlers, logging};

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    logging::init()?;

    let config = Config::load()?;
    let state = web::Data::new(build_state(&config)?);

    let (host, port) = config.bind_address();
    tracing::info!("Server running at http://{}:{}", host, port);

    let mut server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind((host, port))?;

    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server.run().await?;
    Ok(())
}
