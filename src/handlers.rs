// region:    --- Imports
use crate::app::AppState;
use crate::bidding::commands::{handle_close_listing, handle_place_bid};
use crate::bidding::model::{BidForm, CategoryId, ListingId, NewListing};
use crate::error::AuctionError;
use crate::identity::Identity;
use crate::marketplace::commands::{
    handle_add_comment, handle_create_category, handle_create_listing, handle_register_user,
    handle_unwatch_listing, handle_watch_listing,
};
use crate::marketplace::model::{CommentForm, NewCategory, NewUser};
use crate::query;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

// endregion: --- Imports

/// 상품 상세 페이지로 302 리다이렉트
fn redirect_to_listing(listing_id: ListingId) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, format!("/listings/{listing_id}"))],
    )
        .into_response()
}

// region:    --- Command Handlers

/// 사용자 등록
pub async fn handle_register(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> Result<Response, AuctionError> {
    info!("{:<12} --> 사용자 등록 요청: {}", "HandlerCmd", new_user.username);
    let user = handle_register_user(new_user, state.store.as_ref()).await?;
    Ok(Json(user).into_response())
}

/// 카테고리 생성
pub async fn handle_new_category(
    State(state): State<AppState>,
    identity: Identity,
    Json(new_category): Json<NewCategory>,
) -> Result<Response, AuctionError> {
    info!("{:<12} --> 카테고리 생성 요청", "HandlerCmd");
    let category = handle_create_category(&identity, new_category, state.store.as_ref()).await?;
    Ok(Json(category).into_response())
}

/// 상품 등록
pub async fn handle_new_listing(
    State(state): State<AppState>,
    identity: Identity,
    Json(new_listing): Json<NewListing>,
) -> Result<Response, AuctionError> {
    info!("{:<12} --> 상품 등록 요청", "HandlerCmd");
    let listing = handle_create_listing(&identity, new_listing, state.store.as_ref()).await?;
    Ok(redirect_to_listing(listing.id))
}

/// 입찰 요청 처리
pub async fn handle_bid(
    State(state): State<AppState>,
    identity: Identity,
    Path(listing_id): Path<ListingId>,
    Json(form): Json<BidForm>,
) -> Result<Response, AuctionError> {
    info!("{:<12} --> 입찰 요청 id: {}", "HandlerCmd", listing_id);
    let placed = handle_place_bid(&identity, listing_id, form, state.store.as_ref()).await?;
    Ok((StatusCode::OK, Json(placed)).into_response())
}

/// 경매 종료(낙찰) 요청 처리
pub async fn handle_close(
    State(state): State<AppState>,
    identity: Identity,
    Path(listing_id): Path<ListingId>,
) -> Result<Response, AuctionError> {
    info!("{:<12} --> 경매 종료 요청 id: {}", "HandlerCmd", listing_id);
    handle_close_listing(&identity, listing_id, state.store.as_ref()).await?;
    Ok(redirect_to_listing(listing_id))
}

/// 댓글 작성 요청 처리
pub async fn handle_comment(
    State(state): State<AppState>,
    identity: Identity,
    Path(listing_id): Path<ListingId>,
    Json(form): Json<CommentForm>,
) -> Result<Response, AuctionError> {
    info!("{:<12} --> 댓글 작성 요청 id: {}", "HandlerCmd", listing_id);
    handle_add_comment(&identity, listing_id, form, state.store.as_ref()).await?;
    Ok(redirect_to_listing(listing_id))
}

/// 관심목록 추가 요청 처리
pub async fn handle_watch(
    State(state): State<AppState>,
    identity: Identity,
    Path(listing_id): Path<ListingId>,
) -> Result<Response, AuctionError> {
    info!("{:<12} --> 관심목록 추가 요청 id: {}", "HandlerCmd", listing_id);
    handle_watch_listing(&identity, listing_id, state.store.as_ref()).await?;
    Ok(redirect_to_listing(listing_id))
}

/// 관심목록 제거 요청 처리
pub async fn handle_unwatch(
    State(state): State<AppState>,
    identity: Identity,
    Path(listing_id): Path<ListingId>,
) -> Result<Response, AuctionError> {
    info!("{:<12} --> 관심목록 제거 요청 id: {}", "HandlerCmd", listing_id);
    handle_unwatch_listing(&identity, listing_id, state.store.as_ref()).await?;
    Ok(redirect_to_listing(listing_id))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 모든 상품 조회
pub async fn handle_get_listings(
    State(state): State<AppState>,
) -> Result<Response, AuctionError> {
    info!("{:<12} --> 모든 상품 조회", "HandlerQuery");
    let listings = query::handlers::get_all_listings(state.store.as_ref()).await?;
    Ok(Json(listings).into_response())
}

/// 상품 상세 조회
pub async fn handle_get_listing(
    State(state): State<AppState>,
    identity: Identity,
    Path(listing_id): Path<ListingId>,
) -> Result<Response, AuctionError> {
    info!("{:<12} --> 상품 상세 조회 id: {}", "HandlerQuery", listing_id);
    let detail =
        query::handlers::get_listing_detail(state.store.as_ref(), &identity, listing_id).await?;
    Ok(Json(detail).into_response())
}

/// 관심목록 조회
pub async fn handle_get_watchlist(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Response, AuctionError> {
    info!("{:<12} --> 관심목록 조회", "HandlerQuery");
    let listings = query::handlers::get_watchlist(state.store.as_ref(), &identity).await?;
    Ok(Json(listings).into_response())
}

/// 사용자 프로필 조회
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response, AuctionError> {
    info!("{:<12} --> 사용자 프로필 조회: {}", "HandlerQuery", username);
    let profile = query::handlers::get_user_profile(state.store.as_ref(), &username).await?;
    Ok(Json(profile).into_response())
}

/// 모든 카테고리 조회
pub async fn handle_get_categories(
    State(state): State<AppState>,
) -> Result<Response, AuctionError> {
    info!("{:<12} --> 모든 카테고리 조회", "HandlerQuery");
    let categories = query::handlers::get_all_categories(state.store.as_ref()).await?;
    Ok(Json(categories).into_response())
}

/// 카테고리 상품 조회
pub async fn handle_get_category(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
) -> Result<Response, AuctionError> {
    info!("{:<12} --> 카테고리 상품 조회 id: {}", "HandlerQuery", category_id);
    let listings =
        query::handlers::get_category_listings(state.store.as_ref(), category_id).await?;
    Ok(Json(listings).into_response())
}

// endregion: --- Query Handlers
