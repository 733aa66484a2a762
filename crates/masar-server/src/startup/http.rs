//! HTTP server setup module.

use std::sync::Arc;

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};

use crate::{api, middleware::Authentication, model::app_state::AppState};

/// Creates and binds the main HTTP server.
///
/// All routes live under the configured context path; the authentication
/// middleware decodes tokens into an `AuthContext` extension and the
/// `secured!` macro enforces per-endpoint role requirements.
pub fn main_server(
    app_state: Arc<AppState>,
    context_path: String,
    address: String,
    port: u16,
) -> Result<Server, std::io::Error> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Authentication)
            .app_data(web::Data::from(app_state.clone()))
            .service(web::scope(&context_path).service(api::v3::route::routes()))
    })
    .bind((address, port))?
    .run())
}
