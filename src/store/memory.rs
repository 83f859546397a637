// region:    --- Imports
use super::{ListingFilter, MarketStore};
use crate::bidding::model::{
    Bid, CategoryId, Listing, ListingId, NewListing, PlacedBid, UserId,
};
use crate::bidding::rules;
use crate::error::AuctionError;
use crate::marketplace::model::{Category, Comment, User};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tokio::sync::RwLock;

// endregion: --- Imports

// region:    --- In-Memory Market Store
#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    users: Vec<User>,
    categories: Vec<Category>,
    listings: Vec<Listing>,
    bids: Vec<Bid>,
    comments: Vec<Comment>,
    // (user_id, listing_id)
    watchlist: BTreeSet<(UserId, ListingId)>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn listing(&self, listing_id: ListingId) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == listing_id)
    }

    fn bids_of(&self, listing_id: ListingId) -> impl Iterator<Item = &Bid> {
        self.bids.iter().filter(move |b| b.listing_id == listing_id)
    }
}

/// 메모리 저장소 구현체
///
/// 하나의 쓰기 잠금이 모든 변경을 직렬화한다.
#[derive(Debug, Default)]
pub struct InMemoryMarketStore {
    state: RwLock<MemoryState>,
}

impl InMemoryMarketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketStore for InMemoryMarketStore {
    async fn create_user(&self, username: &str, email: &str) -> Result<User, AuctionError> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.username == username) {
            return Err(AuctionError::Validation(
                "Username already taken.".to_string(),
            ));
        }
        let user = User {
            id: state.next_id(),
            username: username.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>, AuctionError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AuctionError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_category(&self, name: &str) -> Result<Category, AuctionError> {
        let mut state = self.state.write().await;
        let category = Category {
            id: state.next_id(),
            name: name.to_string(),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn get_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Option<Category>, AuctionError> {
        let state = self.state.read().await;
        Ok(state
            .categories
            .iter()
            .find(|c| c.id == category_id)
            .cloned())
    }

    async fn get_categories(&self) -> Result<Vec<Category>, AuctionError> {
        let state = self.state.read().await;
        let mut categories = state.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn create_listing(
        &self,
        owner_id: UserId,
        listing: &NewListing,
    ) -> Result<Listing, AuctionError> {
        let mut state = self.state.write().await;
        let listing = Listing {
            id: state.next_id(),
            title: listing.title.clone(),
            description: listing.description.clone(),
            img_url: listing.img_url.clone(),
            price: listing.price,
            owner_id,
            is_active: true,
            category_id: listing.category_id,
            created_at: Utc::now(),
        };
        state.listings.push(listing.clone());
        Ok(listing)
    }

    async fn get_listing(&self, listing_id: ListingId) -> Result<Option<Listing>, AuctionError> {
        let state = self.state.read().await;
        Ok(state.listing(listing_id).cloned())
    }

    async fn get_listings(&self, filter: ListingFilter) -> Result<Vec<Listing>, AuctionError> {
        let state = self.state.read().await;
        // id 는 생성 순서이므로 역순이 곧 최신순
        Ok(state
            .listings
            .iter()
            .rev()
            .filter(|l| match filter {
                ListingFilter::All => true,
                ListingFilter::Owner(owner_id) => l.owner_id == owner_id,
                ListingFilter::Category(category_id) => l.category_id == Some(category_id),
                ListingFilter::WatchedBy(user_id) => state.watchlist.contains(&(user_id, l.id)),
            })
            .cloned()
            .collect())
    }

    async fn get_latest_bid(&self, listing_id: ListingId) -> Result<Option<Bid>, AuctionError> {
        let state = self.state.read().await;
        Ok(state.bids_of(listing_id).max_by_key(|b| b.id).cloned())
    }

    async fn count_bids(&self, listing_id: ListingId) -> Result<i64, AuctionError> {
        let state = self.state.read().await;
        Ok(state.bids_of(listing_id).count() as i64)
    }

    async fn get_bids(&self, listing_id: ListingId) -> Result<Vec<Bid>, AuctionError> {
        let state = self.state.read().await;
        let mut bids: Vec<Bid> = state.bids_of(listing_id).cloned().collect();
        bids.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(bids)
    }

    async fn get_winning_bid(&self, listing_id: ListingId) -> Result<Option<Bid>, AuctionError> {
        let state = self.state.read().await;
        let winner = state.bids_of(listing_id).find(|b| b.is_winner).cloned();
        Ok(winner)
    }

    async fn place_bid(
        &self,
        bidder_id: UserId,
        listing_id: ListingId,
        price: Decimal,
    ) -> Result<PlacedBid, AuctionError> {
        let mut state = self.state.write().await;
        let listing = state
            .listing(listing_id)
            .ok_or(AuctionError::NotFound("listing"))?;
        let latest_bid = state.bids_of(listing_id).max_by_key(|b| b.id);
        rules::check_bid(bidder_id, listing, latest_bid, price)?;
        let bids_count = state.bids_of(listing_id).count() as i64 + 1;

        let bid = Bid {
            id: state.next_id(),
            price,
            is_winner: false,
            listing_id,
            user_id: bidder_id,
            created_at: Utc::now(),
        };
        state.bids.push(bid.clone());
        Ok(PlacedBid {
            current_price: bid.price,
            bid,
            bids_count,
        })
    }

    async fn close_listing(
        &self,
        requester_id: UserId,
        listing_id: ListingId,
    ) -> Result<Bid, AuctionError> {
        let mut state = self.state.write().await;
        let listing = state
            .listing(listing_id)
            .ok_or(AuctionError::NotFound("listing"))?;
        let bids_count = state.bids_of(listing_id).count() as i64;
        rules::check_close(requester_id, listing, bids_count)?;

        let winner_id = rules::pick_winner(state.bids_of(listing_id))
            .map(|b| b.id)
            .ok_or_else(|| AuctionError::InvalidState("listing has no bids".to_string()))?;

        // 두 변경 모두 같은 잠금 안에서 적용된다
        let mut winner = None;
        for bid in state.bids.iter_mut().filter(|b| b.id == winner_id) {
            bid.is_winner = true;
            winner = Some(bid.clone());
        }
        for listing in state.listings.iter_mut().filter(|l| l.id == listing_id) {
            listing.is_active = false;
        }
        winner.ok_or(AuctionError::NotFound("bid"))
    }

    async fn add_comment(
        &self,
        author_id: UserId,
        listing_id: ListingId,
        content: &str,
    ) -> Result<Comment, AuctionError> {
        let mut state = self.state.write().await;
        let listing = state
            .listing(listing_id)
            .ok_or(AuctionError::NotFound("listing"))?;
        rules::check_comment(listing)?;
        let comment = Comment {
            id: state.next_id(),
            content: content.to_string(),
            listing_id,
            user_id: author_id,
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn get_comments(&self, listing_id: ListingId) -> Result<Vec<Comment>, AuctionError> {
        let state = self.state.read().await;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn is_watching(
        &self,
        user_id: UserId,
        listing_id: ListingId,
    ) -> Result<bool, AuctionError> {
        let state = self.state.read().await;
        Ok(state.watchlist.contains(&(user_id, listing_id)))
    }

    async fn watch_listing(
        &self,
        user_id: UserId,
        listing_id: ListingId,
    ) -> Result<(), AuctionError> {
        let mut state = self.state.write().await;
        let listing = state
            .listing(listing_id)
            .ok_or(AuctionError::NotFound("listing"))?;
        let watching = state.watchlist.contains(&(user_id, listing_id));
        rules::check_watch(user_id, listing, watching)?;
        state.watchlist.insert((user_id, listing_id));
        Ok(())
    }

    async fn unwatch_listing(
        &self,
        user_id: UserId,
        listing_id: ListingId,
    ) -> Result<bool, AuctionError> {
        let mut state = self.state.write().await;
        Ok(state.watchlist.remove(&(user_id, listing_id)))
    }
}
// endregion: --- In-Memory Market Store
