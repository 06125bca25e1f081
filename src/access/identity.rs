use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

/// Actor role, consumed as input to the scoped query layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Company,
    AgencyAdmin,
    AgencyRecruiter,
    Looper,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "company" => Some(Role::Company),
            "agency_admin" => Some(Role::AgencyAdmin),
            "agency_recruiter" => Some(Role::AgencyRecruiter),
            "looper" => Some(Role::Looper),
            _ => None,
        }
    }

    pub fn is_agency(&self) -> bool {
        matches!(self, Role::AgencyAdmin | Role::AgencyRecruiter)
    }
}

/// Caller identity, threaded explicitly into every scoped query and
/// pipeline mutation. No ambient/session-global state is consulted
/// anywhere below the HTTP layer.
///
/// `role` is `None` when the identity headers are missing or carry an
/// unrecognized role; scoped queries then fail closed (empty results) and
/// mutations are rejected.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    pub role: Option<Role>,
    pub user_id: Option<i32>,
    pub company_id: Option<i32>,
    pub agency_id: Option<i32>,
}

impl Identity {
    pub fn company(company_id: i32) -> Self {
        Identity {
            role: Some(Role::Company),
            company_id: Some(company_id),
            ..Identity::default()
        }
    }

    pub fn agency(role: Role, agency_id: i32) -> Self {
        Identity {
            role: Some(role),
            agency_id: Some(agency_id),
            ..Identity::default()
        }
    }

    pub fn looper(user_id: i32) -> Self {
        Identity {
            role: Some(Role::Looper),
            user_id: Some(user_id),
            ..Identity::default()
        }
    }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name)?.to_str().ok()
}

fn id_header(req: &HttpRequest, name: &str) -> Option<i32> {
    header(req, name)?.trim().parse().ok()
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    /// Extraction never fails: an absent or garbled header set yields an
    /// identity with no role, which every downstream check treats as
    /// unauthorized.
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Identity {
            role: header(req, "x-role").and_then(Role::parse),
            user_id: id_header(req, "x-user-id"),
            company_id: id_header(req, "x-company-id"),
            agency_id: id_header(req, "x-agency-id"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn extracts_role_and_scoping_ids() {
        let req = TestRequest::default()
            .insert_header(("x-role", "agency_recruiter"))
            .insert_header(("x-agency-id", "7"))
            .insert_header(("x-user-id", "42"))
            .to_http_request();
        let identity = Identity::extract(&req).await.unwrap();
        assert_eq!(identity.role, Some(Role::AgencyRecruiter));
        assert_eq!(identity.agency_id, Some(7));
        assert_eq!(identity.user_id, Some(42));
        assert_eq!(identity.company_id, None);
    }

    #[actix_web::test]
    async fn unknown_role_maps_to_none() {
        let req = TestRequest::default()
            .insert_header(("x-role", "superuser"))
            .to_http_request();
        let identity = Identity::extract(&req).await.unwrap();
        assert_eq!(identity.role, None);
    }
}
