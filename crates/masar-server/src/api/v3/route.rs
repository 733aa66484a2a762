//! V3 routing configuration

use actix_web::{Scope, web};

use super::{
    admin, auth, catalog, certificate, classroom, health, instructor, notification, student, user,
};

/// Create the v3 routes
pub fn routes() -> Scope {
    web::scope("/v3")
        .service(
            web::scope("/auth")
                .service(auth::login)
                .service(auth::register)
                .service(auth::update_password)
                .service(user::search_page)
                .service(user::set_enabled)
                .service(user::delete),
        )
        .service(health::routes())
        .service(catalog::routes())
        .service(classroom::routes())
        .service(student::routes())
        .service(notification::routes())
        .service(certificate::routes())
        .service(instructor::routes())
        .service(admin::routes())
}
