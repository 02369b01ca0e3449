mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use myflix_api::auth::{issue_token, Claims};
use myflix_api::config::AppConfig;
use myflix_api::database::models::UserProfile;
use myflix_api::database::Store;

const MOVIE_ID: &str = "5f4dcc3b-5aa7-4c5e-9b8f-0a1b2c3d4e5f";

fn gated_requests() -> Vec<(Method, String, Option<Value>)> {
    vec![
        (Method::GET, "/movies/Jaws".into(), None),
        (Method::GET, "/movies/genres/Thriller".into(), None),
        (Method::GET, "/movies/director/Steven%20Spielberg".into(), None),
        (Method::GET, "/users/moviefan".into(), None),
        (Method::PUT, "/users/moviefan".into(), Some(json!({ "Email": "hijack@example.com" }))),
        (Method::POST, format!("/users/moviefan/movies/{}", MOVIE_ID), None),
        (Method::DELETE, format!("/users/moviefan/movies/{}", MOVIE_ID), None),
        (Method::DELETE, "/users/moviefan".into(), None),
    ]
}

async fn assert_all_unauthorized(server: &common::TestServer, token: Option<&str>) -> Result<()> {
    for (method, path, body) in gated_requests() {
        let mut req = server.client.request(method.clone(), server.url(&path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let res = req.send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{} {}", method, path);
        let body = res.json::<Value>().await?;
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
    Ok(())
}

async fn assert_user_untouched(server: &common::TestServer) -> Result<()> {
    let user = server.store.find_user("moviefan").await?.expect("user still present");
    assert_eq!(user.email, "moviefan@example.com");
    assert!(user.favorite_movies.is_empty());
    Ok(())
}

#[tokio::test]
async fn gated_routes_require_token() -> Result<()> {
    let server = common::spawn_server().await?;
    server.register("moviefan").await?;

    assert_all_unauthorized(&server, None).await?;
    assert_user_untouched(&server).await
}

#[tokio::test]
async fn gated_routes_reject_forged_token() -> Result<()> {
    let server = common::spawn_server().await?;
    server.register("moviefan").await?;
    let profile = UserProfile::from(server.store.find_user("moviefan").await?.expect("registered"));

    // Signed with a different secret
    let mut security = AppConfig::development().security;
    security.jwt_secret = "not-the-server-secret".into();
    let forged = issue_token(&Claims::new(&profile, 1)?, &security)?;

    assert_all_unauthorized(&server, Some(&forged)).await?;
    assert_all_unauthorized(&server, Some("not.a.jwt")).await?;
    assert_user_untouched(&server).await
}

#[tokio::test]
async fn gated_routes_reject_expired_token() -> Result<()> {
    let server = common::spawn_server().await?;
    server.register("moviefan").await?;
    let profile = UserProfile::from(server.store.find_user("moviefan").await?.expect("registered"));

    let mut security = AppConfig::development().security;
    security.jwt_secret = "integration-test-secret".into();
    let mut claims = Claims::new(&profile, 1)?;
    claims.iat -= 3 * 3600;
    claims.exp = claims.iat + 3600;
    let expired = issue_token(&claims, &security)?;

    assert_all_unauthorized(&server, Some(&expired)).await?;
    assert_user_untouched(&server).await
}

#[tokio::test]
async fn login_returns_profile_and_token() -> Result<()> {
    let server = common::spawn_server().await?;
    server.register("moviefan").await?;

    let res = server
        .client
        .post(server.url("/login"))
        .json(&json!({ "Username": "moviefan", "Password": common::PASSWORD }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["user"]["Username"], "moviefan");
    assert!(body["user"].get("Password").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    Ok(())
}

#[tokio::test]
async fn login_accepts_query_parameters() -> Result<()> {
    let server = common::spawn_server().await?;
    server.register("moviefan").await?;

    let res = server
        .client
        .post(server.url(&format!("/login?Username=moviefan&Password={}", common::PASSWORD)))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn login_rejects_bad_credentials() -> Result<()> {
    let server = common::spawn_server().await?;
    server.register("moviefan").await?;

    for payload in [
        json!({ "Username": "moviefan", "Password": "wrong" }),
        json!({ "Username": "stranger", "Password": common::PASSWORD }),
        json!({ "Username": "moviefan" }),
    ] {
        let res = server.client.post(server.url("/login")).json(&payload).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "payload: {}", payload);
    }
    Ok(())
}

#[tokio::test]
async fn token_grants_access_to_gated_routes() -> Result<()> {
    let server = common::spawn_server().await?;
    server.seed_movie("Jaws", "Thriller", "Steven Spielberg").await?;
    let token = server.register_and_login("moviefan").await?;

    let movie = server
        .client
        .get(server.url("/movies/Jaws"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(movie.status(), StatusCode::OK);
    assert_eq!(movie.json::<Value>().await?["Director"]["Name"], "Steven Spielberg");

    let genre = server
        .client
        .get(server.url("/movies/genres/Thriller"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(genre.status(), StatusCode::OK);
    assert_eq!(genre.json::<Value>().await?["Description"], "Thriller films");

    let director = server
        .client
        .get(server.url("/movies/director/Steven%20Spielberg"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(director.status(), StatusCode::OK);
    assert_eq!(director.json::<Value>().await?["Birth"], 1946);

    let missing = server
        .client
        .get(server.url("/movies/Unknown"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(missing.status(), StatusCode::OK);
    assert_eq!(missing.json::<Value>().await?, Value::Null);
    Ok(())
}
