/// 입찰/낙찰 규칙
/// 저장소 구현체가 잠금(트랜잭션) 안에서 호출하는 순수 함수들
// region:    --- Imports
use super::model::{Bid, Listing, UserId};
use crate::error::AuctionError;
use rust_decimal::Decimal;

// endregion: --- Imports

/// 최소 가격 (1.00)
pub const MIN_PRICE: Decimal = Decimal::ONE;

// NUMERIC(11,2): 정수부 최대 9자리
const MAX_PRICE_EXCLUSIVE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);
const MAX_PRICE_SCALE: u32 = 2;

// region:    --- Rules

/// 현재 최고가
///
/// 입찰이 없으면 시작 가격, 있으면 가장 최근 입찰의 가격.
/// 입찰 시점에 가격이 단조 증가하도록 강제하므로 최근 입찰이 곧 최고가이다.
pub fn leading_price(listing: &Listing, latest_bid: Option<&Bid>) -> Decimal {
    match latest_bid {
        Some(bid) => bid.price,
        None => listing.price,
    }
}

/// 가격 형식 검증 (소수점 2자리, 1.00 이상, 10^9 미만)
pub fn validate_price(price: Decimal) -> Result<(), AuctionError> {
    if price.normalize().scale() > MAX_PRICE_SCALE {
        return Err(AuctionError::Validation(format!(
            "Ensure that there are no more than {MAX_PRICE_SCALE} decimal places."
        )));
    }
    if price < MIN_PRICE {
        return Err(AuctionError::Validation(format!(
            "Ensure this value is greater than or equal to {MIN_PRICE}."
        )));
    }
    if price >= MAX_PRICE_EXCLUSIVE {
        return Err(AuctionError::Validation(format!(
            "Ensure this value is less than {MAX_PRICE_EXCLUSIVE}."
        )));
    }
    Ok(())
}

/// 입찰 가능 여부 검증
pub fn check_bid(
    bidder: UserId,
    listing: &Listing,
    latest_bid: Option<&Bid>,
    price: Decimal,
) -> Result<(), AuctionError> {
    if !listing.is_active {
        return Err(AuctionError::InvalidState("listing closed".to_string()));
    }
    if listing.owner_id == bidder {
        return Err(AuctionError::InvalidState(
            "owner cannot bid".to_string(),
        ));
    }
    validate_price(price)?;

    let leading = leading_price(listing, latest_bid);
    if price <= leading {
        return Err(AuctionError::BidTooLow {
            offered: price,
            leading,
        });
    }
    Ok(())
}

/// 경매 종료 가능 여부 검증
pub fn check_close(
    requester: UserId,
    listing: &Listing,
    bids_count: i64,
) -> Result<(), AuctionError> {
    if listing.owner_id != requester {
        return Err(AuctionError::Unauthorized(
            "only the listing owner can close it".to_string(),
        ));
    }
    if !listing.is_active {
        return Err(AuctionError::InvalidState(
            "listing already closed".to_string(),
        ));
    }
    if bids_count == 0 {
        return Err(AuctionError::InvalidState(
            "listing has no bids".to_string(),
        ));
    }
    Ok(())
}

/// 낙찰 입찰 선택: 최고가, 동일 가격이면 먼저 들어온 입찰
pub fn pick_winner<'a, I>(bids: I) -> Option<&'a Bid>
where
    I: IntoIterator<Item = &'a Bid>,
{
    bids.into_iter().fold(None, |best: Option<&Bid>, bid| match best {
        Some(current) if current.price > bid.price => Some(current),
        Some(current) if current.price == bid.price && current.id < bid.id => Some(current),
        _ => Some(bid),
    })
}

/// 댓글 작성 가능 여부 검증
pub fn check_comment(listing: &Listing) -> Result<(), AuctionError> {
    if !listing.is_active {
        return Err(AuctionError::InvalidState("listing closed".to_string()));
    }
    Ok(())
}

/// 관심목록 추가 가능 여부 검증
pub fn check_watch(
    user: UserId,
    listing: &Listing,
    already_watching: bool,
) -> Result<(), AuctionError> {
    if !listing.is_active || listing.owner_id == user || already_watching {
        return Err(AuctionError::InvalidState(
            "listing cannot be added to the watchlist".to_string(),
        ));
    }
    Ok(())
}

// endregion: --- Rules

// endregion: --- Tests
