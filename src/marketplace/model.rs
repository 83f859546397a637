use crate::bidding::model::{CategoryId, ListingId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type CommentId = i64;

// 사용자 프로필 모델 (인증 정보는 외부 인증 제공자가 관리)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// 카테고리 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

// 댓글 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub listing_id: ListingId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// 사용자 등록 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// 카테고리 생성 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

/// 댓글 작성 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentForm {
    pub content: String,
}
