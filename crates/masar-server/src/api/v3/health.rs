//! Health check endpoints

use actix_web::{Responder, Scope, get, web};
use masar_persistence::sea_orm::{ConnectionTrait, Statement};

use crate::model::app_state::AppState;
use crate::model::response::Result;

#[get("/liveness")]
async fn liveness() -> web::Json<Result<String>> {
    web::Json(Result::<String>::success("ok".to_string()))
}

#[get("/readiness")]
async fn readiness(data: web::Data<AppState>) -> impl Responder {
    let ping = data
        .db()
        .execute(Statement::from_string(
            data.db().get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await;

    match ping {
        Ok(_) => Result::http_success("ok"),
        Err(e) => {
            tracing::warn!("readiness probe failed: {}", e);
            Result::<String>::http_response(
                503,
                30000,
                "database unavailable, please try again later!".to_string(),
                String::new(),
            )
        }
    }
}

pub fn routes() -> Scope {
    web::scope("/health").service(liveness).service(readiness)
}
