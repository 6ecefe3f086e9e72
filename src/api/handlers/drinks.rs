/*
 * Responsibility
 * - /drinks 系 CRUD handler
 * - 保護されたエンドポイントは Authorized<P> で必要な権限を宣言する (handler 本体の前に検証)
 * - Path の {id} は DrinkId extractor で i64 に変換して受け取る
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    api::{
        dto::drinks::{
            CreateDrinkRequest, DeleteResponse, DrinkLong, DrinkShort, DrinksResponse,
            UpdateDrinkRequest,
        },
        extractors::{
            Authorized, DrinkId,
            permission::{DeleteDrinks, GetDrinksDetail, PatchDrinks, PostDrinks},
        },
    },
    error::AppError,
    repos::RepoError,
    state::AppState,
};

// Body extraction stays in the handler so lookups can run before body parsing
// and malformed JSON ends up in the common error envelope.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::bad_request(rejection.body_text())
        }
    })
}

// Store failures while modifying a single drink are reported as 400.
fn modify_failed(e: RepoError) -> AppError {
    tracing::error!(error = ?e, "drink store failure during modification");
    AppError::bad_request("unable to modify the drink")
}

pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    let drinks = state.drinks.list().await?;
    if drinks.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(DrinksResponse::ok(
        drinks.into_iter().map(DrinkShort::from).collect(),
    )))
}

pub async fn list_drinks_detail(
    _auth: Authorized<GetDrinksDetail>,
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let drinks = state.drinks.list().await?;
    if drinks.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(DrinksResponse::ok(
        drinks.into_iter().map(DrinkLong::from).collect(),
    )))
}

pub async fn create_drink(
    auth: Authorized<PostDrinks>,
    State(state): State<AppState>,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let req = json_body(payload)?;
    req.validate().map_err(AppError::bad_request)?;

    let drink = state.drinks.insert(req.into_new_drink()).await?;
    tracing::info!(id = drink.id, title = %drink.title, sub = %auth.payload.sub, "drink created");

    Ok(Json(DrinksResponse::ok(vec![DrinkLong::from(drink)])))
}

pub async fn update_drink(
    auth: Authorized<PatchDrinks>,
    State(state): State<AppState>,
    DrinkId(id): DrinkId,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let mut drink = state
        .drinks
        .get(id)
        .await
        .map_err(modify_failed)?
        .ok_or(AppError::NotFound)?;

    let req = json_body(payload)?;
    req.validate().map_err(AppError::bad_request)?;
    req.apply(&mut drink);

    // Row may have been deleted between get and update.
    let drink = state
        .drinks
        .update(&drink)
        .await
        .map_err(modify_failed)?
        .ok_or(AppError::NotFound)?;
    tracing::info!(id = drink.id, sub = %auth.payload.sub, "drink updated");

    Ok(Json(DrinksResponse::ok(vec![DrinkLong::from(drink)])))
}

pub async fn delete_drink(
    auth: Authorized<DeleteDrinks>,
    State(state): State<AppState>,
    DrinkId(id): DrinkId,
) -> Result<Json<DeleteResponse>, AppError> {
    let drink = state
        .drinks
        .get(id)
        .await
        .map_err(modify_failed)?
        .ok_or(AppError::NotFound)?;

    if !state.drinks.delete(drink.id).await.map_err(modify_failed)? {
        return Err(AppError::NotFound);
    }
    tracing::info!(id, sub = %auth.payload.sub, "drink deleted");

    Ok(Json(DeleteResponse {
        success: true,
        delete: id,
    }))
}
