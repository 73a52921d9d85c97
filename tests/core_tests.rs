// tests/core_tests.rs
//
// Drives the services directly against the in-memory store.

use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use social_backend::{
    auth::IdentityResolver,
    error::{AppError, AuthFailure},
    models::user::{LoginRequest, RegisterRequest, Role, UpdateUserRequest, User},
    services::{comments, follows, likes, tweets, users},
    store::{MemoryStore, Store, StoreState},
    utils::{
        hash::Argon2Hasher,
        jwt::{Claims, TOKEN_ISSUER, TokenService},
    },
};

const SECRET: &str = "core_test_secret";

struct TestEnv {
    store: Arc<MemoryStore>,
    hasher: Argon2Hasher,
    tokens: TokenService,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            hasher: Argon2Hasher::with_params(8, 1, 1).expect("valid argon2 params"),
            tokens: TokenService::new(SECRET, 600),
        }
    }

    fn resolver(&self) -> IdentityResolver {
        let store: StoreState = self.store.clone();
        IdentityResolver::new(self.tokens.clone(), store)
    }

    async fn register(&self, username: &str) -> User {
        let payload = RegisterRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "password123".to_string(),
        };
        users::register(self.store.as_ref(), &self.hasher, &payload)
            .await
            .expect("registration succeeds")
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

// --- Token service & identity resolver ---

#[tokio::test]
async fn issued_token_resolves_to_its_user() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;

    let login = users::login(
        env.store.as_ref(),
        &env.hasher,
        &env.tokens,
        &LoginRequest {
            username: "alice".to_string(),
            password: "password123".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(env.tokens.verify(&login.token).unwrap(), "alice");

    let resolved = env
        .resolver()
        .resolve(&format!("Bearer {}", login.token))
        .await
        .unwrap();
    assert_eq!(resolved.id, alice.id);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let env = TestEnv::new();
    env.register("alice").await;

    let now = unix_now();
    let claims = Claims {
        iss: TOKEN_ISSUER.to_string(),
        sub: "alice".to_string(),
        iat: now - 7300,
        exp: now - 100,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert_eq!(env.tokens.verify(&token), Err(AuthFailure::InvalidToken));

    let err = env
        .resolver()
        .resolve(&format!("Bearer {}", token))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(AuthFailure::InvalidToken)));
}

#[tokio::test]
async fn token_expiring_this_second_is_rejected() {
    let env = TestEnv::new();
    env.register("alice").await;

    let now = unix_now();
    let claims = Claims {
        iss: TOKEN_ISSUER.to_string(),
        sub: "alice".to_string(),
        iat: now - 600,
        exp: now,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert_eq!(env.tokens.verify(&token), Err(AuthFailure::InvalidToken));
}

#[tokio::test]
async fn token_signed_with_another_secret_or_issuer_is_rejected() {
    let env = TestEnv::new();
    env.register("alice").await;

    let foreign = TokenService::new("some_other_secret", 600);
    let token = foreign.issue("alice").unwrap();
    assert_eq!(env.tokens.verify(&token), Err(AuthFailure::InvalidToken));

    let now = unix_now();
    let claims = Claims {
        iss: "someone-else".to_string(),
        sub: "alice".to_string(),
        iat: now,
        exp: now + 600,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    assert_eq!(env.tokens.verify(&token), Err(AuthFailure::InvalidToken));
}

#[tokio::test]
async fn resolver_requires_bearer_scheme() {
    let env = TestEnv::new();
    env.register("alice").await;
    let token = env.tokens.issue("alice").unwrap();

    for header in [token.clone(), format!("Basic {}", token), "Bearer ".to_string()] {
        let err = env.resolver().resolve(&header).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(AuthFailure::InvalidToken)));
    }
}

#[tokio::test]
async fn token_for_missing_account_is_user_not_found() {
    let env = TestEnv::new();
    let token = env.tokens.issue("ghost").unwrap();

    let err = env
        .resolver()
        .resolve(&format!("Bearer {}", token))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(AuthFailure::UserNotFound)));
}

#[tokio::test]
async fn renaming_invalidates_outstanding_tokens() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let token = env.tokens.issue("alice").unwrap();

    users::update(
        env.store.as_ref(),
        &env.hasher,
        &alice,
        "alice",
        UpdateUserRequest {
            username: Some("alicia".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let err = env
        .resolver()
        .resolve(&format!("Bearer {}", token))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(AuthFailure::UserNotFound)));
}

// --- Users ---

#[tokio::test]
async fn only_the_first_registered_user_is_admin() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let bob = env.register("bob").await;

    assert_eq!(alice.role, Role::Admin);
    assert_eq!(bob.role, Role::User);
}

#[tokio::test]
async fn concurrent_first_registrations_yield_one_admin() {
    let env = TestEnv::new();

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = env.store.clone();
        let hasher = env.hasher.clone();
        handles.push(tokio::spawn(async move {
            let payload = RegisterRequest {
                username: format!("user{}", i),
                email: format!("user{}@example.com", i),
                password: "password123".to_string(),
            };
            users::register(store.as_ref(), &hasher, &payload).await
        }));
    }

    let mut admins = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_admin() {
            admins += 1;
        }
    }
    assert_eq!(admins, 1);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let env = TestEnv::new();
    env.register("alice").await;

    let same_name = RegisterRequest {
        username: "alice".to_string(),
        email: "new@example.com".to_string(),
        password: "password123".to_string(),
    };
    let err = users::register(env.store.as_ref(), &env.hasher, &same_name)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UserAlreadyRegistered(_)));

    let same_email = RegisterRequest {
        username: "alice2".to_string(),
        email: "alice@example.com".to_string(),
        password: "password123".to_string(),
    };
    let err = users::register(env.store.as_ref(), &env.hasher, &same_email)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UserAlreadyRegistered(_)));
}

#[tokio::test]
async fn profile_update_checks_uniqueness_and_rehashes() {
    let env = TestEnv::new();
    env.register("alice").await;
    let bob = env.register("bob").await;

    let err = users::update(
        env.store.as_ref(),
        &env.hasher,
        &bob,
        "bob",
        UpdateUserRequest {
            email: Some("alice@example.com".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::UserAlreadyRegistered(_)));

    // Re-sending one's own username is not a conflict
    let updated = users::update(
        env.store.as_ref(),
        &env.hasher,
        &bob,
        "bob",
        UpdateUserRequest {
            username: Some("bob".to_string()),
            password: Some("new_secret".to_string()),
            bio: Some("hi there".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.bio.as_deref(), Some("hi there"));
    assert_ne!(updated.password_hash, bob.password_hash);

    let login = users::login(
        env.store.as_ref(),
        &env.hasher,
        &env.tokens,
        &LoginRequest {
            username: "bob".to_string(),
            password: "new_secret".to_string(),
        },
    )
    .await;
    assert!(login.is_ok());
}

#[tokio::test]
async fn non_admin_cannot_manage_other_users() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let bob = env.register("bob").await;

    let err = users::list(env.store.as_ref(), &bob).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = users::delete(env.store.as_ref(), &bob, "alice").await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = users::grant_admin(env.store.as_ref(), &bob, "bob").await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let promoted = users::grant_admin(env.store.as_ref(), &alice, "bob").await.unwrap();
    assert_eq!(promoted.role, Role::Admin);

    // Granting twice is harmless
    let again = users::grant_admin(env.store.as_ref(), &alice, "bob").await.unwrap();
    assert_eq!(again.role, Role::Admin);
}

#[tokio::test]
async fn seed_admin_creates_or_promotes() {
    let env = TestEnv::new();
    env.register("alice").await;
    let bob = env.register("bob").await;
    assert_eq!(bob.role, Role::User);

    let seeded = users::seed_admin(
        env.store.as_ref(),
        &env.hasher,
        "bob",
        "bob@example.com",
        "ignored",
    )
    .await
    .unwrap();
    assert_eq!(seeded.id, bob.id);
    assert_eq!(seeded.role, Role::Admin);

    let created = users::seed_admin(
        env.store.as_ref(),
        &env.hasher,
        "root",
        "root@example.com",
        "rootpass",
    )
    .await
    .unwrap();
    assert_eq!(created.role, Role::Admin);
}

#[tokio::test]
async fn deleting_an_account_cascades() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let bob = env.register("bob").await;
    let store = env.store.as_ref();

    let alice_tweet = tweets::create(store, &alice, "alice's tweet").await.unwrap();
    let bob_tweet = tweets::create(store, &bob, "bob's tweet").await.unwrap();

    comments::create(store, &bob, alice_tweet.id, "bob on alice").await.unwrap();
    let alice_comment = comments::create(store, &alice, bob_tweet.id, "alice on bob")
        .await
        .unwrap();
    likes::create(store, &bob, alice_tweet.id).await.unwrap();
    let alice_like = likes::create(store, &alice, bob_tweet.id).await.unwrap();
    follows::create(store, &bob, "alice").await.unwrap();
    follows::create(store, &alice, "bob").await.unwrap();

    users::delete(store, &bob, "bob").await.unwrap();

    assert!(store.find_user_by_id(bob.id).await.unwrap().is_none());
    assert!(store.find_tweet(bob_tweet.id).await.unwrap().is_none());
    assert!(store.find_comment(alice_comment.id).await.unwrap().is_none());
    assert!(store.find_like(alice_like.id).await.unwrap().is_none());
    assert!(store.list_comments_by_tweet(alice_tweet.id).await.unwrap().is_empty());
    assert!(store.list_likes_by_tweet(alice_tweet.id).await.unwrap().is_empty());
    assert!(follows::list_following(store, "alice").await.unwrap().is_empty());
    assert!(follows::list_followers(store, "alice").await.unwrap().is_empty());
    assert!(likes::list_by_user(store, "alice").await.unwrap().is_empty());

    let err = follows::list_following(store, "bob").await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound(_)));
}

// --- Follows ---

#[tokio::test]
async fn self_follow_is_always_invalid() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    env.register("bob").await;
    let store = env.store.as_ref();

    let err = follows::create(store, &alice, "alice").await.unwrap_err();
    assert!(matches!(err, AppError::RelationshipInvalid));

    follows::create(store, &alice, "bob").await.unwrap();

    let err = follows::create(store, &alice, "alice").await.unwrap_err();
    assert!(matches!(err, AppError::RelationshipInvalid));

    let err = follows::delete(store, &alice, "alice").await.unwrap_err();
    assert!(matches!(err, AppError::RelationshipInvalid));
}

#[tokio::test]
async fn follow_edges_are_directed() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let bob = env.register("bob").await;
    let store = env.store.as_ref();

    let forward = follows::create(store, &bob, "alice").await.unwrap();
    let err = follows::create(store, &bob, "alice").await.unwrap_err();
    assert!(matches!(err, AppError::RelationshipAlreadyExists(_)));

    // The reverse pair is a separate edge
    let backward = follows::create(store, &alice, "bob").await.unwrap();
    assert_ne!(forward.id, backward.id);

    let following = follows::list_following(store, "bob").await.unwrap();
    assert_eq!(following.len(), 1);
    assert_eq!(following[0].username, "alice");
    assert_eq!(following[0].follow_id, forward.id);

    follows::delete(store, &bob, "alice").await.unwrap();
    let err = follows::delete(store, &bob, "alice").await.unwrap_err();
    assert!(matches!(err, AppError::RelationshipNotFound));

    let followers = follows::list_followers(store, "bob").await.unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].username, "alice");

    let err = follows::create(store, &bob, "nobody").await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound(_)));
}

#[tokio::test]
async fn concurrent_duplicate_follows_leave_one_edge() {
    let env = TestEnv::new();
    env.register("alice").await;
    let bob = env.register("bob").await;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = env.store.clone();
        let bob = bob.clone();
        handles.push(tokio::spawn(async move {
            follows::create(store.as_ref(), &bob, "alice").await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(AppError::RelationshipAlreadyExists(_)) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(created, 1);
    let followers = follows::list_followers(env.store.as_ref(), "alice").await.unwrap();
    assert_eq!(followers.len(), 1);
}

// --- Likes ---

#[tokio::test]
async fn like_unlike_like_succeeds_each_time() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let bob = env.register("bob").await;
    let store = env.store.as_ref();
    let tweet = tweets::create(store, &alice, "hello").await.unwrap();

    let first = likes::create(store, &bob, tweet.id).await.unwrap();
    assert_eq!(likes::find(store, first.id).await.unwrap().username, "bob");

    let err = likes::create(store, &bob, tweet.id).await.unwrap_err();
    assert!(matches!(err, AppError::LikeAlreadyRegistered));

    likes::delete(store, &bob, tweet.id).await.unwrap();
    let err = likes::delete(store, &bob, tweet.id).await.unwrap_err();
    assert!(matches!(err, AppError::LikeNotFound));

    let err = likes::find(store, first.id).await.unwrap_err();
    assert!(matches!(err, AppError::LikeNotFound));

    let second = likes::create(store, &bob, tweet.id).await.unwrap();
    assert_ne!(first.id, second.id);

    assert_eq!(likes::list_by_tweet(store, tweet.id).await.unwrap().len(), 1);
    assert_eq!(likes::list_by_user(store, "bob").await.unwrap().len(), 1);
}

#[tokio::test]
async fn liking_a_missing_tweet_fails() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let missing = uuid::Uuid::new_v4();

    let err = likes::create(env.store.as_ref(), &alice, missing).await.unwrap_err();
    assert!(matches!(err, AppError::TweetNotFound(id) if id == missing));

    let err = likes::list_by_tweet(env.store.as_ref(), missing).await.unwrap_err();
    assert!(matches!(err, AppError::TweetNotFound(_)));
}

#[tokio::test]
async fn writes_by_a_deleted_actor_are_unauthorized() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let bob = env.register("bob").await;
    let store = env.store.as_ref();
    let tweet = tweets::create(store, &alice, "hello").await.unwrap();

    // `bob` is a stale snapshot resolved before the account went away.
    users::delete(store, &bob, "bob").await.unwrap();

    let err = likes::create(store, &bob, tweet.id).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(AuthFailure::UserNotFound)));

    let err = follows::create(store, &bob, "alice").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(AuthFailure::UserNotFound)));

    let err = comments::create(store, &bob, tweet.id, "hi").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(AuthFailure::UserNotFound)));

    let err = tweets::create(store, &bob, "still here?").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(AuthFailure::UserNotFound)));

    assert!(likes::list_by_tweet(store, tweet.id).await.unwrap().is_empty());
    assert!(follows::list_followers(store, "alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_duplicate_likes_leave_one_edge() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let bob = env.register("bob").await;
    let tweet_id = tweets::create(env.store.as_ref(), &alice, "hello")
        .await
        .unwrap()
        .id;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = env.store.clone();
        let bob = bob.clone();
        handles.push(tokio::spawn(async move {
            likes::create(store.as_ref(), &bob, tweet_id).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(AppError::LikeAlreadyRegistered) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(
        likes::list_by_tweet(env.store.as_ref(), tweet_id).await.unwrap().len(),
        1
    );
}

// --- Tweets & comments ---

#[tokio::test]
async fn tweet_update_rejects_identical_content() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let store = env.store.as_ref();
    let tweet = tweets::create(store, &alice, "hello").await.unwrap();

    let err = tweets::update(store, &alice, tweet.id, "hello").await.unwrap_err();
    assert!(matches!(err, AppError::ContentIsTheSame));

    tokio::time::sleep(Duration::from_millis(5)).await;
    let updated = tweets::update(store, &alice, tweet.id, "hello, world").await.unwrap();
    assert_eq!(updated.content, "hello, world");
    assert!(updated.updated_at > tweet.updated_at);
    assert_eq!(updated.created_at, tweet.created_at);
}

#[tokio::test]
async fn tweet_mutation_is_owner_only_even_for_admins() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let bob = env.register("bob").await;
    let store = env.store.as_ref();
    assert!(alice.is_admin());

    let tweet = tweets::create(store, &bob, "bob's").await.unwrap();

    let err = tweets::update(store, &alice, tweet.id, "alice's now").await.unwrap_err();
    assert!(matches!(err, AppError::NotBelongToUser(_)));

    let err = tweets::delete(store, &alice, tweet.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotBelongToUser(_)));

    tweets::delete(store, &bob, tweet.id).await.unwrap();
    let err = tweets::delete(store, &bob, tweet.id).await.unwrap_err();
    assert!(matches!(err, AppError::TweetNotFound(_)));
}

#[tokio::test]
async fn tweets_list_newest_first_and_by_author() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let bob = env.register("bob").await;
    let store = env.store.as_ref();

    tweets::create(store, &alice, "one").await.unwrap();
    tweets::create(store, &bob, "two").await.unwrap();
    tweets::create(store, &alice, "three").await.unwrap();

    let all = tweets::list(store, None).await.unwrap();
    let contents: Vec<&str> = all.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(contents, ["three", "two", "one"]);

    let by_alice = tweets::list(store, Some("alice")).await.unwrap();
    assert_eq!(by_alice.len(), 2);
    assert!(by_alice.iter().all(|t| t.username == "alice"));

    let err = tweets::list(store, Some("nobody")).await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound(_)));
}

#[tokio::test]
async fn content_differing_by_one_byte_is_a_change() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let store = env.store.as_ref();
    let tweet = tweets::create(store, &alice, "hello").await.unwrap();

    let updated = tweets::update(store, &alice, tweet.id, "hello ").await.unwrap();
    assert_eq!(updated.content, "hello ");

    let comment = comments::create(store, &alice, tweet.id, "a").await.unwrap();
    let edited = comments::update(store, &alice, comment.id, "A").await.unwrap();
    assert_eq!(edited.content, "A");

    let err = comments::update(store, &alice, comment.id, "A").await.unwrap_err();
    assert!(matches!(err, AppError::ContentIsTheSame));
}

#[tokio::test]
async fn content_is_stored_verbatim() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let store = env.store.as_ref();

    let raw = "1 < 2 & 3 > 2 <b>bold</b>";
    let tweet = tweets::create(store, &alice, raw).await.unwrap();
    assert_eq!(tweet.content, raw);
    assert_eq!(tweets::find(store, tweet.id).await.unwrap().content, raw);

    let comment = comments::create(store, &alice, tweet.id, raw).await.unwrap();
    assert_eq!(comment.content, raw);
}

#[tokio::test]
async fn content_length_bounds_are_inclusive() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let store = env.store.as_ref();

    let longest = "&".repeat(1024);
    let tweet = tweets::create(store, &alice, &longest).await.unwrap();
    let stored = tweets::find(store, tweet.id).await.unwrap();
    assert_eq!(stored.content, longest);
    assert_eq!(stored.content.chars().count(), 1024);

    // Counted in characters, not bytes
    let wide = "é".repeat(1024);
    let tweet = tweets::create(store, &alice, &wide).await.unwrap();
    assert_eq!(tweet.content.chars().count(), 1024);

    let err = tweets::create(store, &alice, &"&".repeat(1025)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = tweets::create(store, &alice, "").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = comments::create(store, &alice, tweet.id, &"x".repeat(1025))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn non_owner_cannot_delete_comment() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let bob = env.register("bob").await;
    let store = env.store.as_ref();

    let tweet = tweets::create(store, &alice, "hello").await.unwrap();
    let comment = comments::create(store, &bob, tweet.id, "nice").await.unwrap();

    // Not even the tweet's owner, who is also an admin
    let err = comments::delete(store, &alice, comment.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotBelongToUser(_)));

    let err = comments::update(store, &bob, comment.id, "nice").await.unwrap_err();
    assert!(matches!(err, AppError::ContentIsTheSame));

    let edited = comments::update(store, &bob, comment.id, "very nice").await.unwrap();
    assert_eq!(edited.content, "very nice");

    comments::delete(store, &bob, comment.id).await.unwrap();
    let err = comments::find(store, comment.id).await.unwrap_err();
    assert!(matches!(err, AppError::CommentNotFound(_)));
}

#[tokio::test]
async fn comment_requires_existing_tweet() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let store = env.store.as_ref();

    let missing = uuid::Uuid::new_v4();
    let err = comments::create(store, &alice, missing, "hello?").await.unwrap_err();
    assert!(matches!(err, AppError::TweetNotFound(_)));

    let err = comments::list_by_tweet(store, missing).await.unwrap_err();
    assert!(matches!(err, AppError::TweetNotFound(_)));
}

#[tokio::test]
async fn deleting_a_tweet_removes_its_comments_and_likes() {
    let env = TestEnv::new();
    let alice = env.register("alice").await;
    let bob = env.register("bob").await;
    let store = env.store.as_ref();

    let tweet = tweets::create(store, &alice, "hello").await.unwrap();
    let comment = comments::create(store, &bob, tweet.id, "hey").await.unwrap();
    let like = likes::create(store, &bob, tweet.id).await.unwrap();

    tweets::delete(store, &alice, tweet.id).await.unwrap();

    assert!(store.find_comment(comment.id).await.unwrap().is_none());
    assert!(store.find_like(like.id).await.unwrap().is_none());
}
