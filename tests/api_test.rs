mod common;

use axum::http::{StatusCode, header::LOCATION};
use chrono::{DateTime, TimeDelta, Utc};
use quizzify::server::router;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path, query_param},
};

use common::{TOKEN_PATH, app_state, get, snapshot, state_of};

#[tokio::test]
async fn test_index_and_health() {
    let server = MockServer::start().await;
    let app = router(app_state(&server));

    let (status, _, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Quizzify": "Music Quiz API" }));

    let (status, _, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_login_redirects_to_provider() {
    let server = MockServer::start().await;
    let app = router(app_state(&server));

    let (status, headers, _) = get(&app, "/auth/login").await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);

    let location = headers[LOCATION].to_str().unwrap();
    assert!(location.starts_with(common::AUTH_URL));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("show_dialog=true"));
    assert_eq!(state_of(location).len(), 16);
}

#[tokio::test]
async fn test_login_callback_and_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "AT1",
            "refresh_token": "RT1",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = router(app_state(&server));

    let (_, headers, _) = get(&app, "/auth/login").await;
    let state = state_of(headers[LOCATION].to_str().unwrap());

    let (status, _, body) = get(&app, &format!("/auth/callback?code=abc&state={state}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], "AT1");
    assert_eq!(body["refresh_token"], "RT1");
    let expires_at: DateTime<Utc> = body["token_expiration_date"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(expires_at > Utc::now() + TimeDelta::minutes(59));

    let (status, _, tokens) = get(&app, "/auth/tokens").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tokens, body);
}

#[tokio::test]
async fn test_callback_with_wrong_state() {
    let server = MockServer::start().await;
    let app = router(app_state(&server));
    get(&app, "/auth/login").await;

    let (status, _, body) = get(&app, "/auth/callback?code=abc&state=forged").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("State"));
}

#[tokio::test]
async fn test_callback_without_code() {
    let server = MockServer::start().await;
    let app = router(app_state(&server));

    let (_, headers, _) = get(&app, "/auth/login").await;
    let state = state_of(headers[LOCATION].to_str().unwrap());

    let (status, _, body) = get(&app, &format!("/auth/callback?state={state}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Authorization code not provided");
}

#[tokio::test]
async fn test_callback_passes_provider_status_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client"
        })))
        .mount(&server)
        .await;

    let app = router(app_state(&server));
    let (_, headers, _) = get(&app, "/auth/login").await;
    let state = state_of(headers[LOCATION].to_str().unwrap());

    let (status, _, body) = get(&app, &format!("/auth/callback?code=abc&state={state}")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["detail"].as_str().unwrap().contains("invalid_client"));
}

#[tokio::test]
async fn test_tokens_unauthenticated() {
    let server = MockServer::start().await;
    let app = router(app_state(&server));

    let (status, _, body) = get(&app, "/auth/tokens").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid or missing access token");
}

#[tokio::test]
async fn test_refresh_without_refresh_token() {
    let server = MockServer::start().await;
    let app = router(app_state(&server));

    let (status, _, body) = get(&app, "/auth/tokens/refresh").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Refresh token not available");
}

#[tokio::test]
async fn test_refresh_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("refresh_token=RT1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "AT2",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let state = app_state(&server);
    state
        .tokens
        .restore(snapshot("AT1", Some("RT1"), TimeDelta::minutes(30)));
    let app = router(state);

    let (status, _, body) = get(&app, "/auth/tokens/refresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], "AT2");
    assert_eq!(body["refresh_token"], "RT1");
}

#[tokio::test]
async fn test_refresh_endpoint_provider_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let state = app_state(&server);
    state
        .tokens
        .restore(snapshot("AT1", Some("RT1"), TimeDelta::minutes(30)));
    let app = router(state);

    let (status, _, _) = get(&app, "/auth/tokens/refresh").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_top_artists_requires_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = router(app_state(&server));

    let (status, _, body) = get(&app, "/artists/top").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid or missing access token");
}

#[tokio::test]
async fn test_top_artists_uses_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/top/artists"))
        .and(header("authorization", "Bearer AT1"))
        .and(query_param("time_range", "short_term"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "artist-1",
                "name": "Daft Punk",
                "popularity": 81,
                "genres": ["french house"],
                "followers": { "total": 9000000 },
                "images": [
                    { "url": "https://i.scdn.co/small", "height": 160, "width": 160 },
                    { "url": "https://i.scdn.co/large", "height": 640, "width": 640 }
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let state = app_state(&server);
    state
        .tokens
        .restore(snapshot("AT1", Some("RT1"), TimeDelta::hours(1)));
    let app = router(state);

    let (status, _, body) = get(&app, "/artists/top?time_range=short_term&limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "id": "artist-1",
            "name": "Daft Punk",
            "popularity": 81,
            "genres": ["french house"],
            "followers": 9000000,
            "image_url": "https://i.scdn.co/large"
        }])
    );
}

#[tokio::test]
async fn test_catalog_refreshes_expired_token_first() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "AT2",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/album-1"))
        .and(header("authorization", "Bearer AT2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "album-1",
            "name": "Discovery",
            "popularity": 77,
            "release_date": "2001-03-12",
            "total_tracks": 14,
            "images": [{ "url": "https://i.scdn.co/cover", "height": 640, "width": 640 }],
            "artists": [{ "id": "artist-1", "name": "Daft Punk" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let state = app_state(&server);
    state
        .tokens
        .restore(snapshot("AT1", Some("RT1"), TimeDelta::minutes(-5)));
    let app = router(state);

    let (status, _, body) = get(&app, "/albums/album-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["release_year"], "2001");
    assert_eq!(body["artist_id"], "artist-1");
    assert_eq!(body["image_url"], "https://i.scdn.co/cover");
}

#[tokio::test]
async fn test_artist_not_found_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/artists/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let state = app_state(&server);
    state
        .tokens
        .restore(snapshot("AT1", Some("RT1"), TimeDelta::hours(1)));
    let app = router(state);

    let (status, _, body) = get(&app, "/artists/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Failed to retrieve artist information");
}

#[tokio::test]
async fn test_top_songs_with_artists_and_album() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/top/tracks"))
        .and(header("authorization", "Bearer AT1"))
        .and(query_param("time_range", "long_term"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "song-1",
                "name": "One More Time",
                "popularity": 84,
                "duration_ms": 320357,
                "track_number": 1,
                "album": {
                    "id": "album-1",
                    "name": "Discovery",
                    "release_date": "2001-03-12",
                    "total_tracks": 14,
                    "images": [
                        { "url": "https://i.scdn.co/small", "height": 64, "width": 64 },
                        { "url": "https://i.scdn.co/cover", "height": 640, "width": 640 }
                    ],
                    "artists": [{ "id": "artist-1", "name": "Daft Punk" }]
                },
                "artists": [
                    { "id": "artist-1", "name": "Daft Punk" },
                    { "id": "artist-2", "name": "Romanthony" }
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let state = app_state(&server);
    state
        .tokens
        .restore(snapshot("AT1", Some("RT1"), TimeDelta::hours(1)));
    let app = router(state);

    let (status, _, body) = get(&app, "/songs/top?time_range=long_term&limit=50").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "song": {
                "id": "song-1",
                "name": "One More Time",
                "popularity": 84,
                "duration_ms": 320357,
                "track_number": 1,
                "album_id": "album-1",
                "artist_id": "artist-1"
            },
            "artists": [
                { "id": "artist-1", "name": "Daft Punk" },
                { "id": "artist-2", "name": "Romanthony" }
            ],
            "album": {
                "id": "album-1",
                "name": "Discovery",
                "image_url": "https://i.scdn.co/cover",
                "popularity": null,
                "release_year": "2001",
                "total_tracks": 14,
                "artist_id": "artist-1"
            }
        }])
    );
}

#[tokio::test]
async fn test_top_songs_failure_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/top/tracks"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let state = app_state(&server);
    state
        .tokens
        .restore(snapshot("AT1", Some("RT1"), TimeDelta::hours(1)));
    let app = router(state);

    let (status, _, body) = get(&app, "/songs/top").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["detail"], "Failed to retrieve top songs");
}

#[tokio::test]
async fn test_top_items_limit_above_fifty_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = app_state(&server);
    state
        .tokens
        .restore(snapshot("AT1", Some("RT1"), TimeDelta::hours(1)));
    let app = router(state);

    let (status, _, body) = get(&app, "/artists/top?limit=51").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Limit cannot exceed 50 artists.");

    let (status, _, body) = get(&app, "/songs/top?limit=100").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Limit cannot exceed 50 songs.");
}
