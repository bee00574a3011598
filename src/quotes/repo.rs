use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::Date;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DailyQuote {
    pub quote: String,
    pub author: Option<String>,
}

pub async fn find_by_date(db: &PgPool, day: Date) -> anyhow::Result<Option<DailyQuote>> {
    let quote = sqlx::query_as::<_, DailyQuote>(
        r#"
        SELECT quote, author
        FROM daily_quotes
        WHERE date = $1
        "#,
    )
    .bind(day)
    .fetch_optional(db)
    .await?;
    Ok(quote)
}

/// Fallback when no quote is scheduled for the day.
pub async fn find_any(db: &PgPool) -> anyhow::Result<Option<DailyQuote>> {
    let quote = sqlx::query_as::<_, DailyQuote>(
        r#"
        SELECT quote, author
        FROM daily_quotes
        ORDER BY date ASC
        LIMIT 1
        "#,
    )
    .fetch_optional(db)
    .await?;
    Ok(quote)
}
