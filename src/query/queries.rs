// region:    --- Users
/// 사용자 생성
pub const INSERT_USER: &str =
    "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id, username, email, created_at";

/// 사용자 조회
pub const GET_USER: &str = "SELECT id, username, email, created_at FROM users WHERE id = $1";

/// 사용자명으로 조회
pub const GET_USER_BY_USERNAME: &str =
    "SELECT id, username, email, created_at FROM users WHERE username = $1";
// endregion: --- Users

// region:    --- Categories
/// 카테고리 생성
pub const INSERT_CATEGORY: &str = "INSERT INTO categories (name) VALUES ($1) RETURNING id, name";

/// 카테고리 조회
pub const GET_CATEGORY: &str = "SELECT id, name FROM categories WHERE id = $1";

/// 모든 카테고리 조회
pub const GET_ALL_CATEGORIES: &str = "SELECT id, name FROM categories ORDER BY name, id";
// endregion: --- Categories

// region:    --- Listings
/// 상품 등록
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (title, description, img_url, price, owner_id, category_id)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, title, description, img_url, price, owner_id, is_active, category_id, created_at
"#;

/// 상품 조회
pub const GET_LISTING: &str = "SELECT id, title, description, img_url, price, owner_id, is_active, category_id, created_at FROM listings WHERE id = $1";

/// 상품 조회 (행 잠금)
pub const LOCK_LISTING: &str = "SELECT id, title, description, img_url, price, owner_id, is_active, category_id, created_at FROM listings WHERE id = $1 FOR UPDATE";

/// 모든 상품 조회
pub const GET_ALL_LISTINGS: &str =
    "SELECT id, title, description, img_url, price, owner_id, is_active, category_id, created_at FROM listings ORDER BY created_at DESC, id DESC";

/// 사용자 상품 조회
pub const GET_LISTINGS_BY_OWNER: &str =
    "SELECT id, title, description, img_url, price, owner_id, is_active, category_id, created_at FROM listings WHERE owner_id = $1 ORDER BY created_at DESC, id DESC";

/// 카테고리 상품 조회
pub const GET_LISTINGS_BY_CATEGORY: &str =
    "SELECT id, title, description, img_url, price, owner_id, is_active, category_id, created_at FROM listings WHERE category_id = $1 ORDER BY created_at DESC, id DESC";

/// 관심목록 상품 조회
pub const GET_WATCHED_LISTINGS: &str = r#"
    SELECT l.id, l.title, l.description, l.img_url, l.price, l.owner_id, l.is_active, l.category_id, l.created_at
    FROM listings l
    JOIN watchlist_entries w ON w.listing_id = l.id
    WHERE w.user_id = $1
    ORDER BY l.created_at DESC, l.id DESC
"#;

/// 상품 종료
pub const DEACTIVATE_LISTING: &str = "UPDATE listings SET is_active = FALSE WHERE id = $1";
// endregion: --- Listings

// region:    --- Bids
/// 입찰 기록
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (price, listing_id, user_id)
    VALUES ($1, $2, $3)
    RETURNING id, price, is_winner, listing_id, user_id, created_at
"#;

/// 최근 입찰 조회
pub const GET_LATEST_BID: &str = r#"
    SELECT id, price, is_winner, listing_id, user_id, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY id DESC
    LIMIT 1
"#;

/// 최고 입찰 조회 (동일 가격이면 먼저 들어온 입찰)
pub const GET_HIGHEST_BID: &str = r#"
    SELECT id, price, is_winner, listing_id, user_id, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY price DESC, id ASC
    LIMIT 1
"#;

/// 입찰 수 조회
pub const COUNT_BIDS: &str = "SELECT COUNT(*) FROM bids WHERE listing_id = $1";

/// 입찰 이력 조회
pub const GET_BID_HISTORY: &str = r#"
    SELECT id, price, is_winner, listing_id, user_id, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY id DESC
"#;

/// 낙찰 입찰 조회
pub const GET_WINNING_BID: &str = r#"
    SELECT id, price, is_winner, listing_id, user_id, created_at
    FROM bids
    WHERE listing_id = $1 AND is_winner
"#;

/// 낙찰 표시
pub const MARK_BID_WINNER: &str = r#"
    UPDATE bids SET is_winner = TRUE
    WHERE id = $1
    RETURNING id, price, is_winner, listing_id, user_id, created_at
"#;
// endregion: --- Bids

// region:    --- Comments
/// 댓글 작성
pub const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (content, listing_id, user_id)
    VALUES ($1, $2, $3)
    RETURNING id, content, listing_id, user_id, created_at
"#;

/// 댓글 조회
pub const GET_COMMENTS: &str = r#"
    SELECT id, content, listing_id, user_id, created_at
    FROM comments
    WHERE listing_id = $1
    ORDER BY id ASC
"#;
// endregion: --- Comments

// region:    --- Watchlist
/// 관심목록 여부 조회
pub const IS_WATCHING: &str =
    "SELECT EXISTS (SELECT 1 FROM watchlist_entries WHERE user_id = $1 AND listing_id = $2)";

/// 관심목록 추가
pub const INSERT_WATCHLIST_ENTRY: &str = r#"
    INSERT INTO watchlist_entries (user_id, listing_id)
    VALUES ($1, $2)
    ON CONFLICT (user_id, listing_id) DO NOTHING
    RETURNING user_id
"#;

/// 관심목록 제거
pub const DELETE_WATCHLIST_ENTRY: &str =
    "DELETE FROM watchlist_entries WHERE user_id = $1 AND listing_id = $2 RETURNING user_id";
// endregion: --- Watchlist
