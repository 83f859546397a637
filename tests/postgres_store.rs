//! PostgreSQL 저장소 테스트
//! DATABASE_URL 이 가리키는 데이터베이스가 필요하다 (`cargo test -- --ignored`)
use auction_marketplace::bidding::model::NewListing;
use auction_marketplace::database::DatabaseManager;
use auction_marketplace::error::AuctionError;
use auction_marketplace::store::{ListingFilter, MarketStore, PostgresMarketStore};
use rust_decimal::Decimal;
use std::sync::Arc;

async fn connect() -> Arc<PostgresMarketStore> {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = DatabaseManager::new(&database_url, 10)
        .await
        .expect("Failed to connect to database");
    db.initialize_database(false)
        .await
        .expect("Failed to initialize schema");
    Arc::new(PostgresMarketStore::new(Arc::new(db)))
}

/// 테스트마다 겹치지 않는 사용자명
fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

async fn seed_listing(store: &PostgresMarketStore) -> (i64, i64, i64) {
    let owner = store.create_user(&unique("foo"), "").await.unwrap();
    let bidder = store.create_user(&unique("bar"), "").await.unwrap();
    let listing = store
        .create_listing(
            owner.id,
            &NewListing {
                title: "listing#1 title".to_string(),
                description: "listing#1 description".to_string(),
                img_url: String::new(),
                price: Decimal::new(1000, 2),
                category_id: None,
            },
        )
        .await
        .unwrap();
    (owner.id, bidder.id, listing.id)
}

#[tokio::test]
#[ignore]
async fn test_bid_and_close_on_postgres() {
    let store = connect().await;
    let (owner, bidder, listing_id) = seed_listing(&store).await;

    let err = store
        .place_bid(bidder, listing_id, Decimal::new(1000, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, AuctionError::BidTooLow { .. }));

    let placed = store
        .place_bid(bidder, listing_id, Decimal::new(10000, 2))
        .await
        .unwrap();
    assert_eq!(placed.bids_count, 1);
    assert_eq!(store.count_bids(listing_id).await.unwrap(), 1);
    let bid = placed.bid;

    let err = store.close_listing(bidder, listing_id).await.unwrap_err();
    assert!(matches!(err, AuctionError::Unauthorized(_)));

    let winner = store.close_listing(owner, listing_id).await.unwrap();
    assert_eq!(winner.id, bid.id);
    assert!(winner.is_winner);

    let listing = store.get_listing(listing_id).await.unwrap().unwrap();
    assert!(!listing.is_active);
    assert_eq!(
        store.get_winning_bid(listing_id).await.unwrap().map(|b| b.id),
        Some(bid.id)
    );

    let err = store
        .place_bid(bidder, listing_id, Decimal::new(20000, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, AuctionError::InvalidState(_)));

    // 종료된 상품에는 댓글 불가
    let err = store
        .add_comment(bidder, listing_id, "too late")
        .await
        .unwrap_err();
    assert!(matches!(err, AuctionError::InvalidState(_)));
}

#[tokio::test]
#[ignore]
async fn test_concurrent_bids_on_postgres() {
    let store = connect().await;
    let (_, bidder, listing_id) = seed_listing(&store).await;

    let mut handles = vec![];
    for _ in 0..10 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .place_bid(bidder, listing_id, Decimal::new(5000, 2))
                .await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 1);
    assert_eq!(store.count_bids(listing_id).await.unwrap(), 1);
}

#[tokio::test]
#[ignore]
async fn test_watchlist_on_postgres() {
    let store = connect().await;
    let (owner, bidder, listing_id) = seed_listing(&store).await;

    assert!(store.watch_listing(owner, listing_id).await.is_err());
    store.watch_listing(bidder, listing_id).await.unwrap();
    assert!(store.is_watching(bidder, listing_id).await.unwrap());
    assert!(store.watch_listing(bidder, listing_id).await.is_err());

    let watched = store
        .get_listings(ListingFilter::WatchedBy(bidder))
        .await
        .unwrap();
    assert_eq!(watched.len(), 1);

    assert!(store.unwatch_listing(bidder, listing_id).await.unwrap());
    assert!(!store.unwatch_listing(bidder, listing_id).await.unwrap());
}
