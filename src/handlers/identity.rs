use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::domain::identity::{Caller, Role};
use crate::errors::AppError;

/// Header carrying the authenticated user id, set by the session layer.
pub const USER_ID_HEADER: &str = "X-User-Id";
/// Optional header carrying the account type; defaults to shopper.
pub const USER_ROLE_HEADER: &str = "X-User-Role";

fn caller_from_headers(headers: &HeaderMap) -> Result<Caller, AppError> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or(AppError::Unauthenticated)?;

    let role = match headers.get(USER_ROLE_HEADER) {
        Some(value) => value
            .to_str()
            .map_err(|_| AppError::Unauthenticated)?
            .parse::<Role>()
            .map_err(|_| AppError::Unauthenticated)?,
        None => Role::Shopper,
    };

    Ok(Caller { user_id, role })
}

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(caller_from_headers(req.headers()))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn missing_user_id_is_unauthenticated() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            caller_from_headers(req.headers()),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn malformed_user_id_is_unauthenticated() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "not-a-uuid"))
            .to_http_request();
        assert!(matches!(
            caller_from_headers(req.headers()),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn role_defaults_to_shopper() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, id.to_string()))
            .to_http_request();
        let caller = caller_from_headers(req.headers()).expect("valid caller");
        assert_eq!(caller, Caller::shopper(id));
    }

    #[test]
    fn merchant_role_is_read_from_header() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, Uuid::new_v4().to_string()))
            .insert_header((USER_ROLE_HEADER, "merchant"))
            .to_http_request();
        let caller = caller_from_headers(req.headers()).expect("valid caller");
        assert_eq!(caller.role, Role::Merchant);
    }
}
