use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type ListingId = i64;
pub type BidId = i64;
pub type UserId = i64;
pub type CategoryId = i64;

// 상품 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub img_url: String,
    /// 시작 가격
    pub price: Decimal,
    pub owner_id: UserId,
    pub is_active: bool,
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
}

// 입찰 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: BidId,
    pub price: Decimal,
    pub is_winner: bool,
    pub listing_id: ListingId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// 상품 등록 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub img_url: String,
    pub price: Decimal,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// 입찰 요청 본문
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidForm {
    pub price: Decimal,
}

/// 입찰 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedBid {
    pub bid: Bid,
    pub bids_count: i64,
    pub current_price: Decimal,
}
