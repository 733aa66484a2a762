//! Notification service
//!
//! Notifications are persisted rows polled by clients; there is no push
//! transport.

use masar_api::Page;
use masar_api::learning::NotificationView;
use masar_common::now_timestamp;
use masar_persistence::entity::notifications;
use masar_persistence::sea_orm::sea_query::Asterisk;
use masar_persistence::sea_orm::*;

pub async fn push(
    db: &DatabaseConnection,
    user_id: i64,
    title: &str,
    body: &str,
) -> anyhow::Result<notifications::Model> {
    let row = notifications::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        title: Set(title.to_string()),
        body: Set(body.to_string()),
        is_read: Set(false),
        gmt_create: Set(now_timestamp()),
    }
    .insert(db)
    .await?;

    Ok(row)
}

pub async fn find_page_by_user(
    db: &DatabaseConnection,
    user_id: i64,
    page_no: u64,
    page_size: u64,
) -> anyhow::Result<Page<NotificationView>> {
    let total_count = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(user_id))
        .select_only()
        .column_as(prelude::Expr::col(Asterisk).count(), "count")
        .into_tuple::<i64>()
        .one(db)
        .await?
        .unwrap_or_default() as u64;

    if total_count == 0 {
        return Ok(Page::default());
    }

    let offset = (page_no - 1) * page_size;
    let page_items = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(user_id))
        .order_by_desc(notifications::Column::GmtCreate)
        .offset(offset)
        .limit(page_size)
        .all(db)
        .await?
        .into_iter()
        .map(|row| NotificationView {
            id: row.id,
            title: row.title,
            body: row.body,
            read: row.is_read,
            create_time: row.gmt_create.and_utc().timestamp_millis(),
        })
        .collect();

    Ok(Page::new(total_count, page_no, page_size, page_items))
}

pub async fn unread_count(db: &DatabaseConnection, user_id: i64) -> anyhow::Result<u64> {
    let count = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(user_id))
        .filter(notifications::Column::IsRead.eq(false))
        .select_only()
        .column_as(prelude::Expr::col(Asterisk).count(), "count")
        .into_tuple::<i64>()
        .one(db)
        .await?
        .unwrap_or_default() as u64;

    Ok(count)
}

/// Mark one of the user's notifications read. Ignores ids that belong to
/// someone else.
pub async fn mark_read(
    db: &DatabaseConnection,
    user_id: i64,
    notification_id: i64,
) -> anyhow::Result<()> {
    notifications::Entity::update_many()
        .col_expr(notifications::Column::IsRead, prelude::Expr::value(true))
        .filter(notifications::Column::Id.eq(notification_id))
        .filter(notifications::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(())
}

pub async fn mark_all_read(db: &DatabaseConnection, user_id: i64) -> anyhow::Result<()> {
    notifications::Entity::update_many()
        .col_expr(notifications::Column::IsRead, prelude::Expr::value(true))
        .filter(notifications::Column::UserId.eq(user_id))
        .filter(notifications::Column::IsRead.eq(false))
        .exec(db)
        .await?;

    Ok(())
}
