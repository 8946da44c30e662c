//! Integration tests for the game-server lookup endpoints.

mod common;

use axum::http::StatusCode;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_approved_game_id_is_whitelisted_with_account_id(pool: SqlitePool) {
    let id = common::submit(&pool, 7, "Alaric-01").await;
    let (status, _) = common::decide(&pool, id, "approved").await;
    assert_eq!(status, StatusCode::OK);

    // Lookup ignores case
    let (status, json) = common::get_json(
        common::build_test_app(pool.clone()),
        "/api/whitelist/game-id/ALARIC-01",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["whitelisted"], true);
    assert_eq!(json["external_account_id"], common::STEAM_ID);

    let (status, json) = common::get_json(
        common::build_test_app(pool),
        &format!("/api/whitelist/external-id/{}", common::STEAM_ID),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["whitelisted"], true);
    assert_eq!(json["game_identifier"], "alaric-01");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_pending_application_is_not_whitelisted_but_resolves(pool: SqlitePool) {
    common::submit(&pool, 7, "alaric-01").await;

    let (status, json) = common::get_json(
        common::build_test_app(pool),
        "/api/whitelist/game-id/alaric-01",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["whitelisted"], false);
    assert_eq!(json["external_account_id"], common::STEAM_ID);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_unknown_identifier_is_a_negative_answer(pool: SqlitePool) {
    let (status, json) = common::get_json(
        common::build_test_app(pool),
        "/api/whitelist/external-id/76561198999999999",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["whitelisted"], false);
    assert!(json["game_identifier"].is_null());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_blank_identifier_is_a_client_error(pool: SqlitePool) {
    let (status, json) = common::get_json(
        common::build_test_app(pool),
        "/api/whitelist/game-id/%20%20",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_check_matches_either_identifier(pool: SqlitePool) {
    let id = common::submit(&pool, 7, "alaric-01").await;
    common::decide(&pool, id, "approved").await;

    for identifier in ["ALARIC-01", common::STEAM_ID] {
        let (status, json) = common::get_json(
            common::build_test_app(pool.clone()),
            &format!("/api/whitelist/check/{identifier}"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["whitelisted"], true, "{identifier}");
    }

    let (status, json) = common::get_json(
        common::build_test_app(pool),
        "/api/whitelist/check/someone-else",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["whitelisted"], false);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_approved_list_is_sorted_plain_text(pool: SqlitePool) {
    for (submitter, game_id) in [(1, "zed"), (2, "amy"), (3, "mia")] {
        let id = common::submit(&pool, submitter, game_id).await;
        if game_id != "mia" {
            common::decide(&pool, id, "approved").await;
        }
    }

    let (status, content_type, body) =
        common::get_text(common::build_test_app(pool), "/api/whitelist/approved").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(body, "amy\nzed\n");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_empty_approved_list_is_empty_body(pool: SqlitePool) {
    let (status, _, body) =
        common::get_text(common::build_test_app(pool), "/api/whitelist/approved").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}
