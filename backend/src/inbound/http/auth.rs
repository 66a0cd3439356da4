//! Authenticated-principal extraction.
//!
//! Token mechanics live in the upstream gateway; by the time a request
//! reaches this service the principal arrives as trusted `x-user-id`
//! and `x-user-role` headers. The extractor surfaces them so handlers
//! only deal with domain-friendly role checks.

use std::future::{ready, Ready};
use std::str::FromStr;

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::domain::{Error, UserId, UserRole};

pub(crate) const USER_ID_HEADER: &str = "x-user-id";
pub(crate) const USER_ROLE_HEADER: &str = "x-user-role";

/// The authenticated principal attached to a request, if any.
#[derive(Debug, Clone, Default)]
pub struct Principal {
    user_id: Option<UserId>,
    role: Option<UserRole>,
}

impl Principal {
    /// Fetch the principal's user id, if authenticated.
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Require an authenticated principal or return `401 Unauthorized`.
    pub fn require_authenticated(&self) -> Result<UserId, Error> {
        self.user_id
            .ok_or_else(|| Error::unauthorized("authentication required"))
    }

    /// Require an authenticated administrator.
    ///
    /// Missing authentication is a 401; an authenticated non-admin is a
    /// 403.
    pub fn require_admin(&self) -> Result<UserId, Error> {
        let user_id = self.require_authenticated()?;
        match self.role {
            Some(UserRole::Admin) => Ok(user_id),
            _ => Err(Error::forbidden("administrator role required")),
        }
    }
}

fn parse_role(raw: &str) -> Option<UserRole> {
    match raw {
        "admin" => Some(UserRole::Admin),
        "student" => Some(UserRole::Student),
        _ => None,
    }
}

impl FromRequest for Principal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
        };
        let user_id = header(USER_ID_HEADER)
            .and_then(|raw| Uuid::from_str(raw).ok())
            .map(UserId::new);
        let role = header(USER_ROLE_HEADER).and_then(parse_role);
        ready(Ok(Self { user_id, role }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    async fn principal_from(request: TestRequest) -> Principal {
        let (req, mut payload) = request.to_http_parts();
        Principal::from_request(&req, &mut payload)
            .await
            .expect("extraction is infallible")
    }

    #[actix_web::test]
    async fn admin_headers_grant_admin_access() {
        let user_id = Uuid::new_v4();
        let principal = principal_from(
            TestRequest::default()
                .insert_header((USER_ID_HEADER, user_id.to_string()))
                .insert_header((USER_ROLE_HEADER, "admin")),
        )
        .await;

        let granted = principal.require_admin().expect("admin access");
        assert_eq!(granted, UserId::new(user_id));
    }

    #[actix_web::test]
    async fn missing_headers_are_unauthorized() {
        let principal = principal_from(TestRequest::default()).await;
        let error = principal.require_admin().expect_err("no principal");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case("student")]
    #[case("superuser")]
    #[actix_web::test]
    async fn non_admin_roles_are_forbidden(#[case] role: &str) {
        let principal = principal_from(
            TestRequest::default()
                .insert_header((USER_ID_HEADER, Uuid::new_v4().to_string()))
                .insert_header((USER_ROLE_HEADER, role)),
        )
        .await;

        let error = principal.require_admin().expect_err("not an admin");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[actix_web::test]
    async fn malformed_user_id_is_treated_as_anonymous() {
        let principal = principal_from(
            TestRequest::default()
                .insert_header((USER_ID_HEADER, "not-a-uuid"))
                .insert_header((USER_ROLE_HEADER, "admin")),
        )
        .await;

        assert!(principal.user_id().is_none());
        let error = principal.require_admin().expect_err("anonymous");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
