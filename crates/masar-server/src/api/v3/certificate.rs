//! Public certificate verification endpoint

use actix_web::{HttpRequest, Responder, Scope, get, web};
use serde::Deserialize;

use masar_learning::service::certificate;

use crate::model::common::{self, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyParam {
    serial_number: String,
}

/// Serial lookup for third parties checking a certificate's authenticity.
#[get("/verify")]
async fn verify(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<VerifyParam>,
) -> impl Responder {
    match certificate::verify(data.db(), &params.serial_number).await {
        Ok(Some(view)) => common::Result::http_success(view),
        Ok(None) => common::Result::<String>::http_response(
            404,
            masar_common::error::CERTIFICATE_NOT_FOUND.code,
            "certificate not found".to_string(),
            req.path().to_string(),
        ),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

pub fn routes() -> Scope {
    web::scope("/certificate").service(verify)
}
