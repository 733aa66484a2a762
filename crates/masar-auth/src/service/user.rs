//! User service

use masar_api::Page;
use masar_api::model::{ROLE_ADMIN, ROLE_INSTRUCTOR, ROLE_STUDENT};
use masar_common::error::MasarError;
use masar_common::now_timestamp;
use masar_persistence::entity::{instructor_profiles, student_profiles, users};
use masar_persistence::sea_orm::sea_query::Asterisk;
use masar_persistence::sea_orm::*;

use crate::model::User;

pub async fn find_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> anyhow::Result<Option<users::Model>> {
    let user = users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db)
        .await?;

    Ok(user)
}

pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> anyhow::Result<Option<users::Model>> {
    let user = users::Entity::find_by_id(id).one(db).await?;

    Ok(user)
}

/// Verify a username/password pair against the stored bcrypt hash.
///
/// Disabled accounts fail authentication the same way unknown users do.
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> anyhow::Result<users::Model> {
    let user = find_by_username(db, username)
        .await?
        .ok_or_else(|| MasarError::UserNotExist(username.to_string()))?;

    if !user.enabled {
        return Err(MasarError::AuthError(format!("user '{}' is disabled", username)).into());
    }

    let matched = bcrypt::verify(password, &user.password)
        .map_err(|e| MasarError::AuthError(format!("password verification failed: {}", e)))?;

    if !matched {
        return Err(MasarError::AuthError("invalid credentials".to_string()).into());
    }

    Ok(user)
}

/// Create a user and its role-matching profile row in one transaction.
pub async fn create(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    email: &str,
    display_name: &str,
    role: &str,
) -> anyhow::Result<users::Model> {
    if find_by_username(db, username).await?.is_some() {
        return Err(MasarError::UserAlreadyExist(username.to_string()).into());
    }

    let email_taken = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await?
        .is_some();
    if email_taken {
        return Err(MasarError::UserAlreadyExist(email.to_string()).into());
    }

    let hashed_password = bcrypt::hash(password, 10u32)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let now = now_timestamp();
    let txn = db.begin().await?;

    let entity = users::ActiveModel {
        id: NotSet,
        username: Set(username.to_string()),
        password: Set(hashed_password),
        email: Set(email.to_string()),
        display_name: Set(display_name.to_string()),
        role: Set(role.to_string()),
        enabled: Set(true),
        gmt_create: Set(now),
        gmt_modified: Set(now),
    };

    let user = entity.insert(&txn).await?;

    match role {
        ROLE_STUDENT => {
            student_profiles::ActiveModel {
                user_id: Set(user.id),
                bio: Set(None),
                interests: Set(None),
            }
            .insert(&txn)
            .await?;
        }
        ROLE_INSTRUCTOR => {
            instructor_profiles::ActiveModel {
                user_id: Set(user.id),
                headline: Set(None),
                bio: Set(None),
                website: Set(None),
            }
            .insert(&txn)
            .await?;
        }
        _ => {}
    }

    txn.commit().await?;

    tracing::info!(username = %user.username, role = %user.role, "user created");

    Ok(user)
}

pub async fn search_page(
    db: &DatabaseConnection,
    username: &str,
    role: &str,
    page_no: u64,
    page_size: u64,
    accurate: bool,
) -> anyhow::Result<Page<User>> {
    let mut count_select = users::Entity::find();
    let mut query_select = users::Entity::find();

    if !username.is_empty() {
        if accurate {
            count_select = count_select.filter(users::Column::Username.eq(username));
            query_select = query_select.filter(users::Column::Username.eq(username));
        } else {
            count_select = count_select.filter(users::Column::Username.contains(username));
            query_select = query_select.filter(users::Column::Username.contains(username));
        }
    }

    if !role.is_empty() {
        count_select = count_select.filter(users::Column::Role.eq(role));
        query_select = query_select.filter(users::Column::Role.eq(role));
    }

    let total_count = count_select
        .select_only()
        .column_as(prelude::Expr::col(Asterisk).count(), "count")
        .into_tuple::<i64>()
        .one(db)
        .await?
        .unwrap_or_default() as u64;

    if total_count > 0 {
        let offset = (page_no - 1) * page_size;
        let page_items = query_select
            .order_by_asc(users::Column::Username)
            .offset(offset)
            .limit(page_size)
            .all(db)
            .await?
            .into_iter()
            .map(User::from)
            .collect();

        return Ok(Page::<User>::new(
            total_count,
            page_no,
            page_size,
            page_items,
        ));
    }

    Ok(Page::<User>::default())
}

pub async fn update_password(
    db: &DatabaseConnection,
    username: &str,
    new_password: &str,
) -> anyhow::Result<()> {
    match find_by_username(db, username).await? {
        Some(entity) => {
            let mut user: users::ActiveModel = entity.into();

            let hashed_password = bcrypt::hash(new_password, 10u32)
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
            user.password = Set(hashed_password);
            user.gmt_modified = Set(now_timestamp());

            user.update(db).await?;

            Ok(())
        }
        None => Err(MasarError::UserNotExist(username.to_string()).into()),
    }
}

/// Enable or disable an account.
///
/// Disabling the last enabled admin is refused so the platform cannot lock
/// itself out.
pub async fn set_enabled(
    db: &DatabaseConnection,
    username: &str,
    enabled: bool,
) -> anyhow::Result<()> {
    let user = find_by_username(db, username)
        .await?
        .ok_or_else(|| MasarError::UserNotExist(username.to_string()))?;

    if !enabled && user.role == ROLE_ADMIN && count_enabled_admins(db).await? <= 1 {
        return Err(
            MasarError::IllegalArgument("cannot disable the last enabled admin".to_string()).into(),
        );
    }

    let mut active: users::ActiveModel = user.into();
    active.enabled = Set(enabled);
    active.gmt_modified = Set(now_timestamp());
    active.update(db).await?;

    Ok(())
}

pub async fn delete(db: &DatabaseConnection, username: &str) -> anyhow::Result<()> {
    let user = find_by_username(db, username)
        .await?
        .ok_or_else(|| MasarError::UserNotExist(username.to_string()))?;

    if user.role == ROLE_ADMIN && count_enabled_admins(db).await? <= 1 {
        return Err(
            MasarError::IllegalArgument("cannot delete the last enabled admin".to_string()).into(),
        );
    }

    let user_id = user.id;
    let txn = db.begin().await?;

    student_profiles::Entity::delete_many()
        .filter(student_profiles::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    instructor_profiles::Entity::delete_many()
        .filter(instructor_profiles::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    users::Entity::delete_by_id(user_id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(username, "user deleted");

    Ok(())
}

async fn count_enabled_admins(db: &DatabaseConnection) -> anyhow::Result<u64> {
    let count = users::Entity::find()
        .filter(users::Column::Role.eq(ROLE_ADMIN))
        .filter(users::Column::Enabled.eq(true))
        .select_only()
        .column_as(prelude::Expr::col(Asterisk).count(), "count")
        .into_tuple::<i64>()
        .one(db)
        .await?
        .unwrap_or_default() as u64;

    Ok(count)
}
