use conduit_users::{AppError, MemStore, NewUser, TokenSigner, UserService};

fn payload(username: &str, email: &str, password: &str) -> NewUser {
    NewUser {
        username: username.into(),
        email: email.into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn test_registration_flow_returns_auth_view() {
    let service = UserService::new(MemStore::new());
    let signer = TokenSigner::new("test-secret");

    let user = service
        .register(payload("chucknorris", "cn@x.com", "p"))
        .await
        .unwrap();

    let view = user.auth_view(&signer).unwrap();
    assert_eq!(view.username, "chucknorris");
    assert!(!view.token.is_empty());

    // the serialized view carries exactly the public fields; no secret
    // material, and image present even though it is unset
    let json = serde_json::to_value(&view).unwrap();
    let obj = json.as_object().unwrap();
    let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["bio", "email", "image", "token", "username"]);
    assert!(obj["image"].is_null());

    // the embedded token verifies back to the same identity
    let claims = signer.verify(view.token.as_str()).unwrap();
    assert_eq!(claims.id, user.id);
    assert_eq!(claims.username, "chucknorris");
}

#[tokio::test]
async fn test_registration_flow_normalizes_case() {
    let service = UserService::new(MemStore::new());

    let user = service
        .register(payload("ChuckNorris", "CN@X.com", "p"))
        .await
        .unwrap();

    assert_eq!(user.username, "chucknorris");
    assert_eq!(user.email, "cn@x.com");
}

#[tokio::test]
async fn test_registration_flow_duplicate_username() {
    let service = UserService::new(MemStore::new());
    service
        .register(payload("jake", "jake@jake.jake", "p"))
        .await
        .unwrap();

    // same username under different casing still collides
    let err = service
        .register(payload("Jake", "other@x.com", "p"))
        .await
        .unwrap_err();
    match err {
        AppError::Validation { field, message } => {
            assert_eq!(field, "username");
            assert_eq!(message, "is already taken.");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_registration_flow_duplicate_email() {
    let service = UserService::new(MemStore::new());
    service
        .register(payload("jake", "jake@jake.jake", "p"))
        .await
        .unwrap();

    let err = service
        .register(payload("notjake", "jake@jake.jake", "p"))
        .await
        .unwrap_err();
    match err {
        AppError::Validation { field, message } => {
            assert_eq!(field, "email");
            assert_eq!(message, "is already taken.");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_registration_flow_blank_password() {
    let service = UserService::new(MemStore::new());

    let err = service
        .register(payload("jake", "jake@jake.jake", ""))
        .await
        .unwrap_err();
    match err {
        AppError::Validation { field, message } => {
            assert_eq!(field, "password");
            assert_eq!(message, "can't be blank");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_flow_success() {
    let service = UserService::new(MemStore::new());
    let registered = service
        .register(payload("jake", "jake@jake.jake", "jakejake"))
        .await
        .unwrap();

    let logged_in = service.login("jake@jake.jake", "jakejake").await.unwrap();
    assert_eq!(logged_in.id, registered.id);

    // email lookup is case-insensitive
    let logged_in = service.login("JAKE@jake.jake", "jakejake").await.unwrap();
    assert_eq!(logged_in.id, registered.id);
}

#[tokio::test]
async fn test_login_flow_rejects_bad_credentials() {
    let service = UserService::new(MemStore::new());
    service
        .register(payload("jake", "jake@jake.jake", "jakejake"))
        .await
        .unwrap();

    assert!(matches!(
        service.login("jake@jake.jake", "wrong").await,
        Err(AppError::InvalidCredentials)
    ));
    assert!(matches!(
        service.login("nobody@x.com", "jakejake").await,
        Err(AppError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_change_password_flow() {
    let service = UserService::new(MemStore::new());
    let mut user = service
        .register(payload("jake", "jake@jake.jake", "old"))
        .await
        .unwrap();
    let old_salt = user.salt.clone();

    service.change_password(&mut user, "new").await.unwrap();
    assert_ne!(user.salt, old_salt);

    assert!(service.login("jake@jake.jake", "new").await.is_ok());
    assert!(matches!(
        service.login("jake@jake.jake", "old").await,
        Err(AppError::InvalidCredentials)
    ));
}
