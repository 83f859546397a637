/// 입찰 관련 커맨드 처리
/// 1. 입찰
/// 2. 경매 종료(낙찰)
// region:    --- Imports
use super::model::{Bid, BidForm, ListingId, PlacedBid};
use crate::error::AuctionError;
use crate::identity::Identity;
use crate::store::MarketStore;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands

/// 1. 입찰
pub async fn handle_place_bid(
    identity: &Identity,
    listing_id: ListingId,
    form: BidForm,
    store: &dyn MarketStore,
) -> Result<PlacedBid, AuctionError> {
    let bidder = identity.require()?;
    info!(
        "{:<12} --> 입찰 요청 처리 시작: 상품 {}, 입찰자 {}, 금액 {}",
        "Command", listing_id, bidder.id, form.price
    );

    // 검증, 기록, 입찰 수 집계는 저장소가 상품 단위 잠금 안에서 수행
    let placed = store
        .place_bid(bidder.id, listing_id, form.price)
        .await
        .inspect_err(|e| warn!("{:<12} --> 입찰 거부: {}", "Command", e))?;

    info!(
        "{:<12} --> 입찰 성공: 현재 가격 {}, 입찰 수 {}",
        "Command", placed.current_price, placed.bids_count
    );
    Ok(placed)
}

/// 2. 경매 종료(낙찰)
pub async fn handle_close_listing(
    identity: &Identity,
    listing_id: ListingId,
    store: &dyn MarketStore,
) -> Result<Bid, AuctionError> {
    let owner = identity.require()?;
    info!(
        "{:<12} --> 경매 종료 요청 처리 시작: 상품 {}, 요청자 {}",
        "Command", listing_id, owner.id
    );

    let winner = store
        .close_listing(owner.id, listing_id)
        .await
        .inspect_err(|e| warn!("{:<12} --> 경매 종료 거부: {}", "Command", e))?;

    info!(
        "{:<12} --> 낙찰: 입찰 {}, 낙찰자 {}, 금액 {}",
        "Command", winner.id, winner.user_id, winner.price
    );
    Ok(winner)
}

// endregion: --- Commands

// endregion: --- Tests
