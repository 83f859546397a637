/// 마켓 커맨드 처리
/// 1. 사용자 등록
/// 2. 카테고리 생성
/// 3. 상품 등록
/// 4. 댓글 작성
/// 5. 관심목록 추가/제거
// region:    --- Imports
use super::model::{Category, Comment, CommentForm, NewCategory, NewUser, User};
use crate::bidding::model::{Listing, ListingId, NewListing};
use crate::bidding::rules::{self, validate_price};
use crate::error::AuctionError;
use crate::identity::Identity;
use crate::store::MarketStore;
use tracing::info;

// endregion: --- Imports

const MAX_USERNAME_LEN: usize = 150;
const MAX_EMAIL_LEN: usize = 254;
const MAX_TITLE_LEN: usize = 128;
const MAX_IMG_URL_LEN: usize = 128;
const MAX_CATEGORY_NAME_LEN: usize = 128;

// region:    --- Validation
fn require_text<'a>(field: &str, value: &'a str, max_len: usize) -> Result<&'a str, AuctionError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AuctionError::Validation(format!("{field}: This field is required.")));
    }
    check_len(field, value, max_len)?;
    Ok(value)
}

fn check_len(field: &str, value: &str, max_len: usize) -> Result<(), AuctionError> {
    if value.chars().count() > max_len {
        return Err(AuctionError::Validation(format!(
            "{field}: Ensure this value has at most {max_len} characters."
        )));
    }
    Ok(())
}
// endregion: --- Validation

// region:    --- Commands

/// 1. 사용자 등록
pub async fn handle_register_user(
    new_user: NewUser,
    store: &dyn MarketStore,
) -> Result<User, AuctionError> {
    let username = require_text("username", &new_user.username, MAX_USERNAME_LEN)?;
    let email = new_user.email.trim();
    check_len("email", email, MAX_EMAIL_LEN)?;
    if !email.is_empty() && !email.contains('@') {
        return Err(AuctionError::Validation(
            "email: Enter a valid email address.".to_string(),
        ));
    }

    let user = store.create_user(username, email).await?;
    info!("{:<12} --> 사용자 등록: {} ({})", "Command", user.username, user.id);
    Ok(user)
}

/// 2. 카테고리 생성
pub async fn handle_create_category(
    identity: &Identity,
    new_category: NewCategory,
    store: &dyn MarketStore,
) -> Result<Category, AuctionError> {
    identity.require()?;
    let name = require_text("name", &new_category.name, MAX_CATEGORY_NAME_LEN)?;
    let category = store.create_category(name).await?;
    info!("{:<12} --> 카테고리 생성: {}", "Command", category.name);
    Ok(category)
}

/// 3. 상품 등록
pub async fn handle_create_listing(
    identity: &Identity,
    new_listing: NewListing,
    store: &dyn MarketStore,
) -> Result<Listing, AuctionError> {
    let owner = identity.require()?;

    let title = require_text("title", &new_listing.title, MAX_TITLE_LEN)?.to_string();
    let description = new_listing.description.trim().to_string();
    if description.is_empty() {
        return Err(AuctionError::Validation(
            "description: This field is required.".to_string(),
        ));
    }
    let img_url = new_listing.img_url.trim().to_string();
    check_len("img_url", &img_url, MAX_IMG_URL_LEN)?;
    validate_price(new_listing.price)?;

    if let Some(category_id) = new_listing.category_id {
        if store.get_category(category_id).await?.is_none() {
            return Err(AuctionError::Validation("unknown category".to_string()));
        }
    }

    let listing = store
        .create_listing(
            owner.id,
            &NewListing {
                title,
                description,
                img_url,
                ..new_listing
            },
        )
        .await?;
    info!(
        "{:<12} --> 상품 등록: {} (id: {}, 시작가 {})",
        "Command", listing.title, listing.id, listing.price
    );
    Ok(listing)
}

/// 4. 댓글 작성
pub async fn handle_add_comment(
    identity: &Identity,
    listing_id: ListingId,
    form: CommentForm,
    store: &dyn MarketStore,
) -> Result<Comment, AuctionError> {
    let author = identity.require()?;
    let listing = store
        .get_listing(listing_id)
        .await?
        .ok_or(AuctionError::NotFound("listing"))?;
    rules::check_comment(&listing)?;
    let content = form.content.trim();
    if content.is_empty() {
        return Err(AuctionError::Validation(
            "content: This field is required.".to_string(),
        ));
    }

    // 상태 검증은 저장소가 잠금 안에서 다시 수행
    let comment = store.add_comment(author.id, listing_id, content).await?;
    info!(
        "{:<12} --> 댓글 작성: 상품 {}, 작성자 {}",
        "Command", listing_id, author.id
    );
    Ok(comment)
}

/// 5-1. 관심목록 추가
pub async fn handle_watch_listing(
    identity: &Identity,
    listing_id: ListingId,
    store: &dyn MarketStore,
) -> Result<(), AuctionError> {
    let user = identity.require()?;
    store.watch_listing(user.id, listing_id).await?;
    info!(
        "{:<12} --> 관심목록 추가: 사용자 {}, 상품 {}",
        "Command", user.id, listing_id
    );
    Ok(())
}

/// 5-2. 관심목록 제거
pub async fn handle_unwatch_listing(
    identity: &Identity,
    listing_id: ListingId,
    store: &dyn MarketStore,
) -> Result<(), AuctionError> {
    let user = identity.require()?;
    if store.get_listing(listing_id).await?.is_none() {
        return Err(AuctionError::NotFound("listing"));
    }
    if !store.unwatch_listing(user.id, listing_id).await? {
        return Err(AuctionError::InvalidState(
            "listing is not on the watchlist".to_string(),
        ));
    }
    info!(
        "{:<12} --> 관심목록 제거: 사용자 {}, 상품 {}",
        "Command", user.id, listing_id
    );
    Ok(())
}

// endregion: --- Commands

// endregion: --- Tests
