// region:    --- Imports
use super::{ListingFilter, MarketStore};
use crate::bidding::model::{
    Bid, CategoryId, Listing, ListingId, NewListing, PlacedBid, UserId,
};
use crate::bidding::rules;
use crate::database::DatabaseManager;
use crate::error::AuctionError;
use crate::marketplace::model::{Category, Comment, User};
use crate::query::queries;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Postgres Market Store
/// PostgreSQL 저장소 구현체
pub struct PostgresMarketStore {
    db: Arc<DatabaseManager>,
}

impl PostgresMarketStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

/// PostgreSQL 저장소 구현체 메서드 구현
#[async_trait]
impl MarketStore for PostgresMarketStore {
    async fn create_user(&self, username: &str, email: &str) -> Result<User, AuctionError> {
        sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(username)
            .bind(email)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| AuctionError::from_unique_violation(e, "Username already taken."))
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>, AuctionError> {
        Ok(sqlx::query_as::<_, User>(queries::GET_USER)
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AuctionError> {
        Ok(sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
            .bind(username)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn create_category(&self, name: &str) -> Result<Category, AuctionError> {
        Ok(sqlx::query_as::<_, Category>(queries::INSERT_CATEGORY)
            .bind(name)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn get_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Option<Category>, AuctionError> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_CATEGORY)
            .bind(category_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn get_categories(&self) -> Result<Vec<Category>, AuctionError> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_ALL_CATEGORIES)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn create_listing(
        &self,
        owner_id: UserId,
        listing: &NewListing,
    ) -> Result<Listing, AuctionError> {
        Ok(sqlx::query_as::<_, Listing>(queries::INSERT_LISTING)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(&listing.img_url)
            .bind(listing.price)
            .bind(owner_id)
            .bind(listing.category_id)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn get_listing(&self, listing_id: ListingId) -> Result<Option<Listing>, AuctionError> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn get_listings(&self, filter: ListingFilter) -> Result<Vec<Listing>, AuctionError> {
        let query = match filter {
            ListingFilter::All => sqlx::query_as::<_, Listing>(queries::GET_ALL_LISTINGS),
            ListingFilter::Owner(owner_id) => {
                sqlx::query_as::<_, Listing>(queries::GET_LISTINGS_BY_OWNER).bind(owner_id)
            }
            ListingFilter::Category(category_id) => {
                sqlx::query_as::<_, Listing>(queries::GET_LISTINGS_BY_CATEGORY).bind(category_id)
            }
            ListingFilter::WatchedBy(user_id) => {
                sqlx::query_as::<_, Listing>(queries::GET_WATCHED_LISTINGS).bind(user_id)
            }
        };
        Ok(query.fetch_all(self.db.pool()).await?)
    }

    async fn get_latest_bid(&self, listing_id: ListingId) -> Result<Option<Bid>, AuctionError> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_LATEST_BID)
            .bind(listing_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn count_bids(&self, listing_id: ListingId) -> Result<i64, AuctionError> {
        Ok(sqlx::query_scalar::<_, i64>(queries::COUNT_BIDS)
            .bind(listing_id)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn get_bids(&self, listing_id: ListingId) -> Result<Vec<Bid>, AuctionError> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_BID_HISTORY)
            .bind(listing_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn get_winning_bid(&self, listing_id: ListingId) -> Result<Option<Bid>, AuctionError> {
        Ok(sqlx::query_as::<_, Bid>(queries::GET_WINNING_BID)
            .bind(listing_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn place_bid(
        &self,
        bidder_id: UserId,
        listing_id: ListingId,
        price: Decimal,
    ) -> Result<PlacedBid, AuctionError> {
        debug!("{:<12} --> 입찰 트랜잭션 시작 id: {}", "Store", listing_id);
        self.db
            .transaction(move |tx| {
                Box::pin(async move {
                    // 상품 행 잠금: 동시 입찰은 여기서 직렬화된다
                    let listing = sqlx::query_as::<_, Listing>(queries::LOCK_LISTING)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or(AuctionError::NotFound("listing"))?;

                    let latest_bid = sqlx::query_as::<_, Bid>(queries::GET_LATEST_BID)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?;

                    rules::check_bid(bidder_id, &listing, latest_bid.as_ref(), price)?;

                    let bids_count = sqlx::query_scalar::<_, i64>(queries::COUNT_BIDS)
                        .bind(listing_id)
                        .fetch_one(&mut **tx)
                        .await?;

                    let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(price)
                        .bind(listing_id)
                        .bind(bidder_id)
                        .fetch_one(&mut **tx)
                        .await?;

                    Ok::<_, AuctionError>(PlacedBid {
                        current_price: bid.price,
                        bid,
                        bids_count: bids_count + 1,
                    })
                })
            })
            .await
    }

    async fn close_listing(
        &self,
        requester_id: UserId,
        listing_id: ListingId,
    ) -> Result<Bid, AuctionError> {
        debug!("{:<12} --> 낙찰 트랜잭션 시작 id: {}", "Store", listing_id);
        let winner = self
            .db
            .transaction(move |tx| {
                Box::pin(async move {
                    let listing = sqlx::query_as::<_, Listing>(queries::LOCK_LISTING)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or(AuctionError::NotFound("listing"))?;

                    let bids_count = sqlx::query_scalar::<_, i64>(queries::COUNT_BIDS)
                        .bind(listing_id)
                        .fetch_one(&mut **tx)
                        .await?;

                    rules::check_close(requester_id, &listing, bids_count)?;

                    let highest = sqlx::query_as::<_, Bid>(queries::GET_HIGHEST_BID)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or_else(|| {
                            AuctionError::InvalidState("listing has no bids".to_string())
                        })?;

                    let winner = sqlx::query_as::<_, Bid>(queries::MARK_BID_WINNER)
                        .bind(highest.id)
                        .fetch_one(&mut **tx)
                        .await?;

                    sqlx::query(queries::DEACTIVATE_LISTING)
                        .bind(listing_id)
                        .execute(&mut **tx)
                        .await?;

                    Ok::<_, AuctionError>(winner)
                })
            })
            .await?;

        info!(
            "{:<12} --> 낙찰 완료: 상품 {}, 입찰 {}",
            "Store", listing_id, winner.id
        );
        Ok(winner)
    }

    async fn add_comment(
        &self,
        author_id: UserId,
        listing_id: ListingId,
        content: &str,
    ) -> Result<Comment, AuctionError> {
        let content = content.to_string();
        self.db
            .transaction(move |tx| {
                Box::pin(async move {
                    // 종료와 겹치지 않도록 상품 행 잠금
                    let listing = sqlx::query_as::<_, Listing>(queries::LOCK_LISTING)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or(AuctionError::NotFound("listing"))?;

                    rules::check_comment(&listing)?;

                    let comment = sqlx::query_as::<_, Comment>(queries::INSERT_COMMENT)
                        .bind(content)
                        .bind(listing_id)
                        .bind(author_id)
                        .fetch_one(&mut **tx)
                        .await?;

                    Ok::<_, AuctionError>(comment)
                })
            })
            .await
    }

    async fn get_comments(&self, listing_id: ListingId) -> Result<Vec<Comment>, AuctionError> {
        Ok(sqlx::query_as::<_, Comment>(queries::GET_COMMENTS)
            .bind(listing_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn is_watching(
        &self,
        user_id: UserId,
        listing_id: ListingId,
    ) -> Result<bool, AuctionError> {
        Ok(sqlx::query_scalar::<_, bool>(queries::IS_WATCHING)
            .bind(user_id)
            .bind(listing_id)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn watch_listing(
        &self,
        user_id: UserId,
        listing_id: ListingId,
    ) -> Result<(), AuctionError> {
        self.db
            .transaction(move |tx| {
                Box::pin(async move {
                    let listing = sqlx::query_as::<_, Listing>(queries::LOCK_LISTING)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or(AuctionError::NotFound("listing"))?;

                    let watching = sqlx::query_scalar::<_, bool>(queries::IS_WATCHING)
                        .bind(user_id)
                        .bind(listing_id)
                        .fetch_one(&mut **tx)
                        .await?;

                    rules::check_watch(user_id, &listing, watching)?;

                    sqlx::query_scalar::<_, i64>(queries::INSERT_WATCHLIST_ENTRY)
                        .bind(user_id)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or_else(|| {
                            AuctionError::InvalidState("listing already watched".to_string())
                        })?;

                    Ok::<_, AuctionError>(())
                })
            })
            .await
    }

    async fn unwatch_listing(
        &self,
        user_id: UserId,
        listing_id: ListingId,
    ) -> Result<bool, AuctionError> {
        let removed = sqlx::query_scalar::<_, i64>(queries::DELETE_WATCHLIST_ENTRY)
            .bind(user_id)
            .bind(listing_id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(removed.is_some())
    }
}
// endregion: --- Postgres Market Store
