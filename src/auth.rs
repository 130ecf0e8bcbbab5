use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header,
    middleware::Next,
    web, Error,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, error, warn};

use crate::error::AppError;
use crate::hash;
use crate::state::AppState;

pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Parse an `Authorization: Basic <base64(username:password)>` value. The
/// password may itself contain `:`.
pub fn parse_basic(value: &str) -> Option<Credentials> {
    let (scheme, payload) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Basic") {
        return None;
    }

    let decoded = STANDARD.decode(payload).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Middleware gating a resource behind Basic authentication. Rejected
/// requests never reach the wrapped handler.
pub async fn require_basic_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    match authenticate(&req).await {
        Ok(()) => next.call(req).await.map(ServiceResponse::map_into_left_body),
        Err(e) => Ok(req.error_response(e).map_into_right_body()),
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<(), AppError> {
    let Credentials { username, password } = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_basic)
        .ok_or_else(|| {
            debug!("Missing or malformed Authorization header");
            AppError::Unauthorized
        })?;

    let state = match req.app_data::<web::Data<AppState>>() {
        Some(state) => state,
        None => {
            error!("AppState is not registered; rejecting request");
            return Err(AppError::Unauthorized);
        }
    };

    let name = username.clone();
    let verified = state
        .with_store(move |store| {
            let user = store.find_user(&username)?;
            Ok(user.map(|u| {
                let ok = hash::verify(&u.salted_password_hash, &u.salt, &password);
                (u.id, ok)
            }))
        })
        .await;

    match verified {
        Ok(Some((id, true))) => {
            debug!("Authenticated user {} ({})", name, id);
            Ok(())
        }
        Ok(Some((_, false))) => {
            debug!("Wrong password for user {}", name);
            Err(AppError::Unauthorized)
        }
        Ok(None) => {
            debug!("Unknown user {}", name);
            Err(AppError::Unauthorized)
        }
        Err(e) => {
            warn!("Credential lookup failed: {}", e);
            Err(AppError::Unauthorized)
        }
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::hash::test::fast_hash;
    use crate::store::memory::MemoryStore;
    use actix_web::{http::StatusCode, middleware::from_fn, test as atest, App, HttpResponse};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    /// `Authorization` header value for the given pair.
    pub fn basic(username: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
    }

    pub fn store_with_user1() -> MemoryStore {
        let sh = fast_hash("pass1");
        MemoryStore::new().with_user("user1", &sh.hash, &sh.salt)
    }

    #[test]
    fn test_parse_basic() {
        let c = parse_basic(&basic("user1", "pass1")).unwrap();
        assert_eq!(c.username, "user1");
        assert_eq!(c.password, "pass1");

        let c = parse_basic(&basic("user1", "a:b:c")).unwrap();
        assert_eq!(c.username, "user1");
        assert_eq!(c.password, "a:b:c");

        let c = parse_basic(&format!("basic {}", STANDARD.encode("u:"))).unwrap();
        assert_eq!(c.username, "u");
        assert_eq!(c.password, "");
    }

    #[test]
    fn test_parse_basic_rejects() {
        assert!(parse_basic("").is_none());
        assert!(parse_basic("Basic").is_none());
        assert!(parse_basic("Basic !!!notbase64").is_none());
        assert!(parse_basic(&format!("Basic {}", STANDARD.encode("nocolon"))).is_none());
        assert!(parse_basic(&format!("Bearer {}", STANDARD.encode("u:p"))).is_none());
        assert!(parse_basic(&format!("Basic {}", STANDARD.encode([0xff, 0xfe, b':']))).is_none());
    }

    async fn probe(
        store: MemoryStore,
        auth: Option<String>,
    ) -> (StatusCode, serde_json::Value, usize, String) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let app = atest::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(Arc::new(store))))
                .service(
                    web::resource("/probe")
                        .wrap(from_fn(require_basic_auth))
                        .to(move |body: String| {
                            let counter = Arc::clone(&counter);
                            async move {
                                counter.fetch_add(1, Ordering::SeqCst);
                                HttpResponse::Ok().json(serde_json::json!({ "echo": body }))
                            }
                        }),
                ),
        )
        .await;

        let mut req = atest::TestRequest::post()
            .uri("/probe")
            .set_payload("original body");
        if let Some(value) = auth {
            req = req.insert_header((header::AUTHORIZATION, value));
        }
        let resp = atest::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body: serde_json::Value = atest::read_body_json(resp).await;
        let echo = body["echo"].as_str().unwrap_or_default().to_string();
        (status, body, calls.load(Ordering::SeqCst), echo)
    }

    #[actix_web::test]
    async fn test_valid_credentials_call_handler_once() {
        let (status, _, calls, echo) =
            probe(store_with_user1(), Some(basic("user1", "pass1"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(calls, 1);
        assert_eq!(echo, "original body");
    }

    #[actix_web::test]
    async fn test_invalid_credentials_never_call_handler() {
        let cases = vec![
            None,
            Some(basic("user1", "wrong")),
            Some(basic("nobody", "pass1")),
            Some("Basic not*base64".to_string()),
            Some("garbage".to_string()),
            Some(format!("Basic {}", STANDARD.encode("user1pass1"))),
        ];

        for auth in cases {
            let (status, body, calls, _) = probe(store_with_user1(), auth).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, serde_json::json!({ "error": "Invalid/Missing Credentials." }));
            assert_eq!(calls, 0);
        }
    }

    #[actix_web::test]
    async fn test_store_failure_is_unauthorized() {
        let (status, body, calls, _) =
            probe(MemoryStore::offline(), Some(basic("user1", "pass1"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid/Missing Credentials.");
        assert_eq!(calls, 0);
    }

    #[actix_web::test]
    async fn test_broken_stored_hash_is_unauthorized() {
        for stored in ["", "$argon2i$m=4096", "$2b$05$short"] {
            let store = MemoryStore::new().with_user("user1", stored, "salt");
            let (status, body, calls, _) = probe(store, Some(basic("user1", "pass1"))).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["error"], "Invalid/Missing Credentials.");
            assert_eq!(calls, 0);
        }
    }

    #[actix_web::test]
    async fn test_bcrypt_user_row() {
        // OpenBSD vector for "U*U", stored with salt "*U"
        let store = MemoryStore::new().with_user(
            "legacy",
            "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW",
            "*U",
        );
        let (status, _, calls, _) = probe(store, Some(basic("legacy", "U"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(calls, 1);
    }
}
