use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub async fn get_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, full_name, avatar_url, created_at, updated_at
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(profile)
}

/// Upsert keyed on the account id; None fields leave the stored value alone.
pub async fn upsert(
    db: &PgPool,
    user_id: Uuid,
    full_name: Option<&str>,
    avatar_url: Option<&str>,
) -> anyhow::Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (id, full_name, avatar_url)
        VALUES ($1, $2, $3)
        ON CONFLICT (id) DO UPDATE SET
            full_name  = COALESCE(EXCLUDED.full_name, profiles.full_name),
            avatar_url = COALESCE(EXCLUDED.avatar_url, profiles.avatar_url),
            updated_at = now()
        RETURNING id, full_name, avatar_url, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(full_name)
    .bind(avatar_url)
    .fetch_one(db)
    .await?;
    Ok(profile)
}
