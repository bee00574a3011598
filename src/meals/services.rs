use anyhow::Context;
use bytes::Bytes;
use uuid::Uuid;

use super::repo;
use crate::state::AppState;

pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
}

/// Store the photo and link it to the meal. Replaces any previous photo key
/// on the row; the old object is left for bucket lifecycle rules.
pub async fn upload_meal_photo(
    st: &AppState,
    user_id: Uuid,
    meal_id: Uuid,
    item: UploadItem,
) -> anyhow::Result<String> {
    let ext = ext_from_mime(&item.content_type).unwrap_or("bin");
    let key = format!("meals/{}/{}-{}.{}", user_id, meal_id, Uuid::new_v4(), ext);

    st.storage
        .put_object(&key, item.body, &item.content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;

    repo::set_photo_key(&st.db, user_id, meal_id, &key).await?;
    Ok(key)
}

pub async fn presign_photo(st: &AppState, photo_key: &str) -> anyhow::Result<String> {
    const TTL_SECS: u64 = 30 * 60;
    st.storage
        .presign_get(photo_key, TTL_SECS)
        .await
        .with_context(|| format!("presign url for key {}", photo_key))
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod photo_tests {
    use crate::state::AppState;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(super::ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(super::ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(super::ext_from_mime("image/png"), Some("png"));
        assert_eq!(super::ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(super::ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(super::ext_from_mime("application/octet-stream"), None);
        assert_eq!(super::ext_from_mime("whatever/else"), None);
    }

    #[tokio::test]
    async fn test_presign_photo() {
        let state = AppState::fake();
        let url = super::presign_photo(&state, "meals/u/m-p.jpg").await.unwrap();
        assert!(url.contains("meals/u/m-p.jpg"));
    }
}
