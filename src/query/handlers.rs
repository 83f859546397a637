// region:    --- Imports
use crate::bidding::model::{Bid, CategoryId, Listing, ListingId};
use crate::bidding::rules;
use crate::error::AuctionError;
use crate::identity::Identity;
use crate::marketplace::model::{Category, Comment, User};
use crate::store::{ListingFilter, MarketStore};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Views
/// 상품 상세
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDetail {
    pub listing: Listing,
    pub bids_count: i64,
    pub max_bid: Decimal,
    pub show_bid_form: bool,
    pub show_bids: bool,
    pub can_watch: bool,
    pub can_unwatch: bool,
    /// 판매자에게만 공개
    pub bids: Option<Vec<Bid>>,
    pub comments: Vec<Comment>,
    pub winning_bid: Option<Bid>,
    pub viewer_is_winner: bool,
}

/// 사용자 프로필
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user: User,
    pub listings: Vec<Listing>,
}

/// 카테고리 상품 목록
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryListings {
    pub category: Category,
    pub listings: Vec<Listing>,
}
// endregion: --- Views

// region:    --- Query Handlers

/// 현재 최고가 조회
pub async fn get_leading_price(
    store: &dyn MarketStore,
    listing_id: ListingId,
) -> Result<Decimal, AuctionError> {
    info!("{:<12} --> 현재 최고가 조회 id: {}", "Query", listing_id);
    let listing = store
        .get_listing(listing_id)
        .await?
        .ok_or(AuctionError::NotFound("listing"))?;
    let latest_bid = store.get_latest_bid(listing_id).await?;
    Ok(rules::leading_price(&listing, latest_bid.as_ref()))
}

/// 상품 상세 조회
pub async fn get_listing_detail(
    store: &dyn MarketStore,
    identity: &Identity,
    listing_id: ListingId,
) -> Result<ListingDetail, AuctionError> {
    info!("{:<12} --> 상품 상세 조회 id: {}", "Query", listing_id);
    let listing = store
        .get_listing(listing_id)
        .await?
        .ok_or(AuctionError::NotFound("listing"))?;

    let bids_count = store.count_bids(listing_id).await?;
    let latest_bid = store.get_latest_bid(listing_id).await?;
    let max_bid = rules::leading_price(&listing, latest_bid.as_ref());
    let comments = store.get_comments(listing_id).await?;

    let viewer = identity.user_id();
    let is_owner = viewer == Some(listing.owner_id);
    let watching = match viewer {
        Some(user_id) => store.is_watching(user_id, listing_id).await?,
        None => false,
    };

    let bids = if is_owner {
        Some(store.get_bids(listing_id).await?)
    } else {
        None
    };

    let winning_bid = if listing.is_active {
        None
    } else {
        store.get_winning_bid(listing_id).await?
    };
    let viewer_is_winner = match (&winning_bid, viewer) {
        (Some(bid), Some(user_id)) => bid.user_id == user_id,
        _ => false,
    };

    Ok(ListingDetail {
        bids_count,
        max_bid,
        show_bid_form: viewer.is_some() && !is_owner && listing.is_active,
        show_bids: is_owner,
        can_watch: viewer.is_some() && listing.is_active && !is_owner && !watching,
        can_unwatch: viewer.is_some() && watching,
        bids,
        comments,
        winning_bid,
        viewer_is_winner,
        listing,
    })
}

/// 모든 상품 조회
pub async fn get_all_listings(store: &dyn MarketStore) -> Result<Vec<Listing>, AuctionError> {
    info!("{:<12} --> 모든 상품 조회", "Query");
    store.get_listings(ListingFilter::All).await
}

/// 사용자 프로필 조회
pub async fn get_user_profile(
    store: &dyn MarketStore,
    username: &str,
) -> Result<UserProfile, AuctionError> {
    info!("{:<12} --> 사용자 프로필 조회: {}", "Query", username);
    let user = store
        .get_user_by_username(username)
        .await?
        .ok_or(AuctionError::NotFound("user"))?;
    let listings = store.get_listings(ListingFilter::Owner(user.id)).await?;
    Ok(UserProfile { user, listings })
}

/// 모든 카테고리 조회
pub async fn get_all_categories(store: &dyn MarketStore) -> Result<Vec<Category>, AuctionError> {
    info!("{:<12} --> 모든 카테고리 조회", "Query");
    store.get_categories().await
}

/// 카테고리 상품 조회
pub async fn get_category_listings(
    store: &dyn MarketStore,
    category_id: CategoryId,
) -> Result<CategoryListings, AuctionError> {
    info!("{:<12} --> 카테고리 상품 조회 id: {}", "Query", category_id);
    let category = store
        .get_category(category_id)
        .await?
        .ok_or(AuctionError::NotFound("category"))?;
    let listings = store
        .get_listings(ListingFilter::Category(category_id))
        .await?;
    Ok(CategoryListings { category, listings })
}

/// 관심목록 조회
pub async fn get_watchlist(
    store: &dyn MarketStore,
    identity: &Identity,
) -> Result<Vec<Listing>, AuctionError> {
    let user = identity.require()?;
    info!("{:<12} --> 관심목록 조회 사용자: {}", "Query", user.id);
    store.get_listings(ListingFilter::WatchedBy(user.id)).await
}

// endregion: --- Query Handlers

// endregion: --- Tests
