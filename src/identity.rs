/// 요청 사용자 식별
/// 인증은 앞단의 인증 게이트웨이가 담당하고, 인증된 사용자 id 를 헤더로 전달한다고 가정
// region:    --- Imports
use crate::app::AppState;
use crate::bidding::model::UserId;
use crate::error::AuctionError;
use crate::marketplace::model::User;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::warn;

// endregion: --- Imports

/// 인증 게이트웨이가 채우는 사용자 id 헤더
pub const USER_ID_HEADER: &str = "x-user-id";

// region:    --- Identity
/// 요청 사용자
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User(User),
}

impl Identity {
    pub fn user(&self) -> Option<&User> {
        match self {
            Identity::User(user) => Some(user),
            Identity::Anonymous => None,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user().map(|user| user.id)
    }

    /// 인증된 사용자가 아니면 `Unauthenticated`
    pub fn require(&self) -> Result<&User, AuctionError> {
        self.user().ok_or(AuctionError::Unauthenticated)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = AuctionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(USER_ID_HEADER) else {
            return Ok(Identity::Anonymous);
        };

        let Some(user_id) = raw
            .to_str()
            .ok()
            .and_then(|value| value.trim().parse::<UserId>().ok())
        else {
            warn!("{:<12} --> 잘못된 사용자 헤더: {:?}", "Identity", raw);
            return Ok(Identity::Anonymous);
        };

        match state.store.get_user(user_id).await? {
            Some(user) => Ok(Identity::User(user)),
            None => {
                warn!("{:<12} --> 존재하지 않는 사용자 id: {}", "Identity", user_id);
                Ok(Identity::Anonymous)
            }
        }
    }
}
// endregion: --- Identity
