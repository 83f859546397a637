// region:    --- Imports
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::error;

// endregion: --- Imports

// 인증 제공자의 로그인 페이지
pub const LOGIN_URL: &str = "/login";

// region:    --- Auction Error
/// 모든 커맨드/쿼리가 호출자에게 돌려주는 오류
///
/// 실패한 커맨드는 상태를 변경하지 않는다.
/// 저장소 구현체는 이 오류를 반환하기 전에 트랜잭션을 롤백한다.
#[derive(Debug, Error)]
pub enum AuctionError {
    /// 인증되지 않은 요청
    #[error("authentication required")]
    Unauthenticated,

    /// 참조한 레코드 없음 (레코드 종류)
    #[error("{0} not found")]
    NotFound(&'static str),

    /// 인증은 되었으나 권한 없음
    #[error("not authorized: {0}")]
    Unauthorized(String),

    /// 현재 상품/입찰/관심목록 상태에서 허용되지 않는 요청
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// 입력 값 검증 실패
    #[error("{0}")]
    Validation(String),

    /// 입찰 금액이 현재 최고가 이하
    #[error("Your bid (${offered}) must be greater than the current max bid of (${leading})")]
    BidTooLow { offered: Decimal, leading: Decimal },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AuctionError {
    pub fn code(&self) -> &'static str {
        match self {
            AuctionError::Unauthenticated => "UNAUTHENTICATED",
            AuctionError::NotFound(_) => "NOT_FOUND",
            AuctionError::Unauthorized(_) => "UNAUTHORIZED",
            AuctionError::InvalidState(_) => "INVALID_STATE",
            AuctionError::Validation(_) => "VALIDATION_ERROR",
            AuctionError::BidTooLow { .. } => "LOW_BID",
            AuctionError::Database(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuctionError::Unauthenticated => StatusCode::FOUND,
            AuctionError::NotFound(_) => StatusCode::NOT_FOUND,
            AuctionError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuctionError::InvalidState(_)
            | AuctionError::Validation(_)
            | AuctionError::BidTooLow { .. } => StatusCode::BAD_REQUEST,
            AuctionError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 유니크 제약 위반을 검증 오류로 변환
    pub fn from_unique_violation(err: sqlx::Error, message: &str) -> Self {
        let is_unique = err
            .as_database_error()
            .map(|db_err| db_err.is_unique_violation())
            .unwrap_or(false);
        if is_unique {
            AuctionError::Validation(message.to_string())
        } else {
            AuctionError::Database(err)
        }
    }
}

impl IntoResponse for AuctionError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AuctionError::Unauthenticated = self {
            return (status, [(header::LOCATION, LOGIN_URL)]).into_response();
        }

        let body = match &self {
            AuctionError::Database(e) => {
                error!("{:<12} --> 데이터베이스 오류: {:?}", "Error", e);
                serde_json::json!({
                    "error": "internal server error",
                    "code": self.code(),
                })
            }
            AuctionError::BidTooLow { offered, leading } => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
                "bid_amount": offered,
                "current_price": leading,
            }),
            _ => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };
        (status, Json(body)).into_response()
    }
}
// endregion: --- Auction Error

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bid_too_low_message_embeds_both_prices() {
        let err = AuctionError::BidTooLow {
            offered: Decimal::new(500, 2),
            leading: Decimal::new(1000, 2),
        };
        assert_eq!(
            err.to_string(),
            "Your bid ($5.00) must be greater than the current max bid of ($10.00)"
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "LOW_BID");
    }

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(
            AuctionError::NotFound("listing").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AuctionError::Unauthorized("owner only".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuctionError::InvalidState("listing closed".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuctionError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
// endregion: --- Tests
