use gallery_server::config::FeatureFlags;
use serde_json::json;

use crate::common::{TestApp, ids_of, routes};

#[tokio::test]
async fn adventure_draws_requested_steps_above_risk() {
    let app = TestApp::spawn().await;
    let ids = app
        .upload_many(&["alpha.jpg", "bravo.jpg", "charlie.jpg", "delta.mp4", "echo.jpg"])
        .await;
    app.set_likes(ids[0], 5).await;
    app.set_likes(ids[1], 3).await;
    app.set_likes(ids[2], 9).await;
    app.set_likes(ids[3], 7).await;

    let res = app
        .post(
            routes::ADVENTURE,
            &json!({ "risk_level": 3, "steps": 3, "file_type": "image" }),
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["risk_level"], 3);
    let mut steps = ids_of(&res.body["steps"]);
    steps.sort_unstable();
    assert_eq!(steps, vec![ids[0], ids[1], ids[2]]);
}

#[tokio::test]
async fn adventure_with_too_few_matches_fails() {
    let app = TestApp::spawn().await;
    let ids = app.upload_many(&["alpha.jpg", "bravo.jpg"]).await;
    app.set_likes(ids[0], 10).await;

    let res = app
        .post(routes::ADVENTURE, &json!({ "risk_level": 5, "steps": 2 }))
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(
        res.body["message"],
        "Not enough files matching criteria. Found 1, need 2"
    );
}

#[tokio::test]
async fn adventure_defaults_to_eight_steps() {
    let app = TestApp::spawn().await;
    let names: Vec<String> = (0..9).map(|i| format!("scene{i}.jpg")).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    app.upload_many(&names).await;

    let res = app.post(routes::ADVENTURE, &json!({})).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["steps"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn adventure_rejects_bad_input() {
    let app = TestApp::spawn().await;
    app.upload_one("alpha.jpg").await;

    let zero = app.post(routes::ADVENTURE, &json!({ "steps": 0 })).await;
    let kind = app
        .post(routes::ADVENTURE, &json!({ "steps": 1, "file_type": "gif" }))
        .await;

    assert_eq!(zero.status, 400);
    assert_eq!(kind.status, 400);
}

#[tokio::test]
async fn like_range_spans_collection() {
    let app = TestApp::spawn().await;

    let empty = app.get(routes::ADVENTURE_RANGE).await;
    assert_eq!(empty.body["min_likes"], 0);
    assert_eq!(empty.body["max_likes"], 0);

    let ids = app.upload_many(&["alpha.jpg", "bravo.jpg", "charlie.jpg"]).await;
    app.set_likes(ids[0], -4).await;
    app.set_likes(ids[2], 12).await;

    let res = app.get(routes::ADVENTURE_RANGE).await;
    assert_eq!(res.body["min_likes"], -4);
    assert_eq!(res.body["max_likes"], 12);
}

#[tokio::test]
async fn disabled_adventure_is_not_found() {
    let app = TestApp::spawn_with(FeatureFlags::default().with("adventure", false)).await;
    app.upload_one("alpha.jpg").await;

    let start = app.post(routes::ADVENTURE, &json!({ "steps": 1 })).await;
    let range = app.get(routes::ADVENTURE_RANGE).await;

    assert_eq!(start.status, 404);
    assert_eq!(start.body["message"], "Feature disabled");
    assert_eq!(range.status, 404);
}
