use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::{auth::AuthUser, dates, state::AppState};

use super::dto::{CreateMealRequest, ListQuery, MealDetails, MealListItem, PhotoUploadResponse};
use super::repo::{self, Meal};
use super::services::{presign_photo, upload_meal_photo, UploadItem};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/:id", get(get_meal))
        .route("/meals/:id/photo", get(get_presigned_photo)) // 302 to the photo
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal))
        .route("/meals/:id", delete(delete_meal))
        .route(
            "/meals/:id/photo",
            post(upload_photo).layer(DefaultBodyLimit::max(20 * 1024 * 1024)), // 20MB
        )
}

// --- handlers ---

#[instrument(skip(state, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateMealRequest>,
) -> Result<(StatusCode, HeaderMap, Json<MealDetails>), (StatusCode, String)> {
    let name = payload.meal_name.trim();
    if name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "meal_name is required".into()));
    }
    if payload.calories < 0 || payload.protein < 0 || payload.carbs < 0 || payload.fats < 0 {
        return Err((StatusCode::BAD_REQUEST, "macros must be non-negative".into()));
    }

    let meal_date = payload.meal_date.unwrap_or_else(dates::today_utc);
    let meal = repo::insert(
        &state.db,
        user_id,
        name,
        meal_date,
        payload.calories,
        payload.protein,
        payload.carbs,
        payload.fats,
        payload.meal_type.as_deref(),
    )
    .await
    .map_err(internal)?;

    let mut headers = HeaderMap::new();
    if let Ok(loc) = format!("/api/v1/meals/{}", meal.id).parse() {
        headers.insert(axum::http::header::LOCATION, loc);
    }

    Ok((StatusCode::CREATED, headers, Json(to_details(meal, None))))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<MealListItem>>, (StatusCode, String)> {
    let meals = match (q.date, q.from, q.to) {
        (Some(day), _, _) => repo::list_by_user_on(&state.db, user_id, day).await,
        (None, Some(from), Some(to)) => {
            if from > to {
                return Err((StatusCode::BAD_REQUEST, "from must not be after to".into()));
            }
            repo::list_by_user_between(&state.db, user_id, from, to, q.limit, q.offset).await
        }
        (None, None, None) => repo::list_by_user(&state.db, user_id, q.limit, q.offset).await,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "from and to must be given together".into(),
            ))
        }
    }
    .map_err(internal)?;

    let items = meals
        .into_iter()
        .map(|m| MealListItem {
            id: m.id,
            meal_name: m.meal_name,
            meal_date: m.meal_date,
            calories: m.calories,
            protein: m.protein,
            carbs: m.carbs,
            fats: m.fats,
            meal_type: m.meal_type,
            has_photo: m.photo_key.is_some(),
            created_at: m.created_at,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MealDetails>, (StatusCode, String)> {
    let meal = match repo::get_by_id(&state.db, user_id, id).await {
        Ok(Some(m)) => m,
        Ok(None) => return Err((StatusCode::NOT_FOUND, "Meal not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, %id, "get_meal failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let photo_url = match &meal.photo_key {
        Some(key) => match presign_photo(&state, key).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, %id, "presign failed; returning meal without photo url");
                None
            }
        },
        None => None,
    };

    Ok(Json(to_details(meal, photo_url)))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let meal = match repo::get_by_id(&state.db, user_id, id).await {
        Ok(Some(m)) => m,
        Ok(None) => return Err((StatusCode::NOT_FOUND, "Meal not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, %id, "delete_meal lookup failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    repo::delete(&state.db, user_id, id).await.map_err(internal)?;

    // Best effort; the row is already gone
    if let Some(key) = meal.photo_key {
        if let Err(e) = state.storage.delete_object(&key).await {
            warn!(error = %e, %id, key, "delete photo object failed");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /meals/:id/photo (multipart, single `file` field)
#[instrument(skip(state, mp))]
pub async fn upload_photo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<PhotoUploadResponse>), (StatusCode, String)> {
    match repo::get_by_id(&state.db, user_id, id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err((StatusCode::NOT_FOUND, "Meal not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, %id, "upload_photo lookup failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    }

    let mut file: Option<UploadItem> = None;
    while let Ok(Some(field)) = mp.next_field().await {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".into());
            let data = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
            file = Some(UploadItem { body: data, content_type });
            break;
        }
    }
    let Some(file) = file else {
        return Err((StatusCode::BAD_REQUEST, "file field is required".into()));
    };

    let key = upload_meal_photo(&state, user_id, id, file)
        .await
        .map_err(internal)?;
    let photo_url = presign_photo(&state, &key).await.map_err(internal)?;

    Ok((StatusCode::CREATED, Json(PhotoUploadResponse { photo_url })))
}

/// 302 → presigned url of the meal photo
#[instrument(skip(state))]
pub async fn get_presigned_photo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let meal = match repo::get_by_id(&state.db, user_id, id).await {
        Ok(Some(m)) => m,
        Ok(None) => return (StatusCode::NOT_FOUND, "Meal not found").into_response(),
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };

    let Some(key) = meal.photo_key else {
        return (StatusCode::NOT_FOUND, "Photo not found").into_response();
    };

    let Ok(url) = state.storage.presign_get(&key, 600).await else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "presign failed").into_response();
    };

    Redirect::temporary(&url).into_response()
}

fn to_details(meal: Meal, photo_url: Option<String>) -> MealDetails {
    MealDetails {
        id: meal.id,
        meal_name: meal.meal_name,
        meal_date: meal.meal_date,
        calories: meal.calories,
        protein: meal.protein,
        carbs: meal.carbs,
        fats: meal.fats,
        meal_type: meal.meal_type,
        photo_url,
        created_at: meal.created_at,
    }
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
