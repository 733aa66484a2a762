//! Admin moderation endpoints

pub mod moderation;
pub mod operation_log;
pub mod track;

use actix_web::{Scope, web};

pub fn routes() -> Scope {
    web::scope("/admin")
        .service(moderation::routes())
        .service(track::routes())
        .service(operation_log::routes())
}
