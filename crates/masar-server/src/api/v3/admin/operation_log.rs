//! Audit trail listing endpoint

use actix_web::{HttpRequest, Responder, Scope, get, web};
use serde::Deserialize;

use masar_api::Page;
use masar_api::model::{DEFAULT_PAGE_NO, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, ROLE_ADMIN};
use masar_persistence::entity::operation_log;
use masar_persistence::sea_orm::sea_query::Asterisk;
use masar_persistence::sea_orm::*;

use crate::model::common::{self, AppState};
use crate::{Secured, secured};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogListParam {
    #[serde(default)]
    resource_type: Option<String>,
    #[serde(default)]
    operator: Option<String>,
    page_no: Option<u64>,
    page_size: Option<u64>,
}

#[get("/list")]
async fn list(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<LogListParam>,
) -> impl Responder {
    secured!(Secured::builder(&req, &data).role(ROLE_ADMIN).build());

    let page_no = params.page_no.unwrap_or(DEFAULT_PAGE_NO).max(1);
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let apply_filters = |mut select: Select<operation_log::Entity>| {
        if let Some(resource_type) = &params.resource_type
            && !resource_type.is_empty()
        {
            select = select.filter(operation_log::Column::ResourceType.eq(resource_type.as_str()));
        }
        if let Some(operator) = &params.operator
            && !operator.is_empty()
        {
            select = select.filter(operation_log::Column::Operator.eq(operator.as_str()));
        }
        select
    };

    let total_count = match apply_filters(operation_log::Entity::find())
        .select_only()
        .column_as(prelude::Expr::col(Asterisk).count(), "count")
        .into_tuple::<i64>()
        .one(data.db())
        .await
    {
        Ok(count) => count.unwrap_or_default() as u64,
        Err(e) => {
            tracing::error!("Failed to count operation log: {}", e);
            return common::Result::<String>::http_response(
                500,
                500,
                "Failed to query operation log".to_string(),
                String::new(),
            );
        }
    };

    if total_count == 0 {
        return common::Result::http_success(Page::<operation_log::Model>::default());
    }

    let offset = (page_no - 1) * page_size;
    match apply_filters(operation_log::Entity::find())
        .order_by_desc(operation_log::Column::GmtCreate)
        .offset(offset)
        .limit(page_size)
        .all(data.db())
        .await
    {
        Ok(rows) => common::Result::http_success(Page::new(total_count, page_no, page_size, rows)),
        Err(e) => {
            tracing::error!("Failed to list operation log: {}", e);
            common::Result::<String>::http_response(
                500,
                500,
                "Failed to query operation log".to_string(),
                String::new(),
            )
        }
    }
}

pub fn routes() -> Scope {
    web::scope("/operation-log").service(list)
}
