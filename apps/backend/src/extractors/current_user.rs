use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use uuid::Uuid;

use crate::auth::jwt::Claims;
use crate::error::AppError;
use crate::errors::ErrorCode;

/// The authenticated caller, taken from the claims `SessionExtract` stored.
/// Does not touch the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .extensions()
            .get::<Claims>()
            .map(|claims| CurrentUser { id: claims.sub })
            .ok_or_else(|| {
                AppError::unauthorized(ErrorCode::UnauthorizedMissingToken, "Not authenticated")
            });
        ready(user)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;
    use crate::auth::jwt::TokenKind;

    #[actix_web::test]
    async fn reads_claims_from_extensions() {
        let id = Uuid::new_v4();
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(Claims {
            sub: id,
            kind: TokenKind::Access,
            iat: 0,
            exp: 0,
        });

        let user = CurrentUser::extract(&req).await.unwrap();
        assert_eq!(user.id, id);
    }

    #[actix_web::test]
    async fn missing_claims_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let err = CurrentUser::extract(&req).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnauthorizedMissingToken);
    }
}
