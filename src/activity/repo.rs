use time::Date;
use uuid::Uuid;

use sqlx::PgPool;

/// One row per (user, day); repeated logins bump the counter.
pub async fn record_login(db: &PgPool, user_id: Uuid, day: Date) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_activity (user_id, activity_date, login_count)
        VALUES ($1, $2, 1)
        ON CONFLICT (user_id, activity_date)
        DO UPDATE SET login_count = user_activity.login_count + 1, updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(day)
    .execute(db)
    .await?;
    Ok(())
}
