/// 저장소
/// 상품/입찰/댓글/관심목록 레코드의 생성과 조회
/// `place_bid`, `close_listing`, `add_comment`, `watch_listing`은 검증과 변경을 하나의 원자적 단위로 수행한다.
// region:    --- Imports
use crate::bidding::model::{
    Bid, CategoryId, Listing, ListingId, NewListing, PlacedBid, UserId,
};
use crate::error::AuctionError;
use crate::marketplace::model::{Category, Comment, User};
use async_trait::async_trait;
use rust_decimal::Decimal;

// endregion: --- Imports

// region:    --- Modules
mod memory;
mod postgres;

pub use memory::InMemoryMarketStore;
pub use postgres::PostgresMarketStore;

// endregion: --- Modules

// region:    --- Market Store Trait
/// 상품 목록 조회 조건
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFilter {
    All,
    Owner(UserId),
    Category(CategoryId),
    WatchedBy(UserId),
}

/// 저장소 트레이트
#[async_trait]
pub trait MarketStore: Send + Sync {
    // 사용자
    async fn create_user(&self, username: &str, email: &str) -> Result<User, AuctionError>;
    async fn get_user(&self, user_id: UserId) -> Result<Option<User>, AuctionError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AuctionError>;

    // 카테고리
    async fn create_category(&self, name: &str) -> Result<Category, AuctionError>;
    async fn get_category(&self, category_id: CategoryId)
        -> Result<Option<Category>, AuctionError>;
    async fn get_categories(&self) -> Result<Vec<Category>, AuctionError>;

    // 상품
    async fn create_listing(
        &self,
        owner_id: UserId,
        listing: &NewListing,
    ) -> Result<Listing, AuctionError>;
    async fn get_listing(&self, listing_id: ListingId) -> Result<Option<Listing>, AuctionError>;
    /// 최신순
    async fn get_listings(&self, filter: ListingFilter) -> Result<Vec<Listing>, AuctionError>;

    // 입찰
    async fn get_latest_bid(&self, listing_id: ListingId) -> Result<Option<Bid>, AuctionError>;
    async fn count_bids(&self, listing_id: ListingId) -> Result<i64, AuctionError>;
    /// 최신순
    async fn get_bids(&self, listing_id: ListingId) -> Result<Vec<Bid>, AuctionError>;
    async fn get_winning_bid(&self, listing_id: ListingId) -> Result<Option<Bid>, AuctionError>;

    /// 상품 단위로 직렬화된 입찰 검증 및 기록
    ///
    /// 입찰 수는 같은 잠금 안에서 센 값이다.
    async fn place_bid(
        &self,
        bidder_id: UserId,
        listing_id: ListingId,
        price: Decimal,
    ) -> Result<PlacedBid, AuctionError>;

    /// 낙찰 입찰 표시와 상품 비활성화를 하나의 트랜잭션으로 처리
    async fn close_listing(
        &self,
        requester_id: UserId,
        listing_id: ListingId,
    ) -> Result<Bid, AuctionError>;

    // 댓글
    /// 상품 단위로 직렬화된 댓글 검증 및 기록
    async fn add_comment(
        &self,
        author_id: UserId,
        listing_id: ListingId,
        content: &str,
    ) -> Result<Comment, AuctionError>;
    /// 작성순
    async fn get_comments(&self, listing_id: ListingId) -> Result<Vec<Comment>, AuctionError>;

    // 관심목록
    async fn is_watching(&self, user_id: UserId, listing_id: ListingId)
        -> Result<bool, AuctionError>;
    /// 관심목록 추가 검증 및 기록
    async fn watch_listing(
        &self,
        user_id: UserId,
        listing_id: ListingId,
    ) -> Result<(), AuctionError>;
    /// 이미 없으면 `false`
    async fn unwatch_listing(
        &self,
        user_id: UserId,
        listing_id: ListingId,
    ) -> Result<bool, AuctionError>;
}
// endregion: --- Market Store Trait
