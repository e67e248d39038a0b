use std::sync::atomic::Ordering;

use serde_json::json;

use crate::common::{TestApp, routes};

fn tag_names(media: &serde_json::Value) -> Vec<String> {
    media["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn trim_creates_copy_that_inherits_likes_and_tags() {
    let app = TestApp::spawn().await;
    let id = app.upload_one("birthday_party.mp4").await;
    app.set_likes(id, 6).await;
    app.patch(&routes::media(id), &json!({ "description": "Cake" }))
        .await;

    let res = app
        .post(&routes::trim(id), &json!({ "start_time": 1.5, "end_time": 4.0 }))
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    let media = &res.body["media"];
    assert_ne!(media["id"], id);
    assert_eq!(
        media["original_filename"],
        "birthday_party_trimmed_1.5s-4.0s.mp4"
    );
    assert_eq!(media["file_type"], "video");
    assert_eq!(media["like_count"], 6);
    assert_eq!(media["elo_rating"].as_f64().unwrap(), 1500.0);
    assert_eq!(media["description"], "Cake");
    assert_eq!(tag_names(media), vec!["birthday", "party"]);
    assert!(res.body["replaced_id"].is_null());

    assert!(app.find(id).await.is_some());
    assert_eq!(app.stored_file_count(), 2);
    assert_eq!(app.trimmer.calls.load(Ordering::SeqCst), 1);

    let new_id = media["id"].as_i64().unwrap() as i32;
    let bytes = app
        .get_raw(&routes::content(new_id), None)
        .await
        .bytes()
        .await
        .unwrap();
    assert_eq!(bytes.as_ref(), b"bytes of birthday_party.mp4[1.5-4]");
}

#[tokio::test]
async fn trim_can_replace_the_original() {
    let app = TestApp::spawn().await;
    let id = app.upload_one("concert.mp4").await;

    let res = app
        .post(
            &routes::trim(id),
            &json!({ "start_time": 0.0, "end_time": 2.0, "keep_original": false }),
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["replaced_id"], id);
    assert!(app.find(id).await.is_none());
    assert_eq!(app.media_count().await, 1);
    assert_eq!(app.stored_file_count(), 1);
    assert_eq!(tag_names(&res.body["media"]), vec!["concert"]);
}

#[tokio::test]
async fn only_videos_can_be_trimmed() {
    let app = TestApp::spawn().await;
    let id = app.upload_one("poster.jpg").await;

    let res = app
        .post(&routes::trim(id), &json!({ "start_time": 0.0, "end_time": 1.0 }))
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["message"], "File is not a video");
    assert_eq!(app.trimmer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_ranges_are_rejected() {
    let app = TestApp::spawn().await;
    let id = app.upload_one("clip.mp4").await;

    for (start, end) in [(5.0, 5.0), (6.0, 2.0), (-1.0, 2.0)] {
        let res = app
            .post(&routes::trim(id), &json!({ "start_time": start, "end_time": end }))
            .await;
        assert_eq!(res.status, 400, "{start}..{end} was accepted");
    }
    assert_eq!(app.trimmer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn trimming_missing_media_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app
        .post(&routes::trim(31), &json!({ "start_time": 0.0, "end_time": 1.0 }))
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn trimmer_failure_leaves_no_trace() {
    let app = TestApp::spawn().await;
    let id = app.upload_one("clip.mp4").await;
    app.trimmer.fail.store(true, Ordering::SeqCst);

    let res = app
        .post(
            &routes::trim(id),
            &json!({ "start_time": 0.0, "end_time": 1.0, "keep_original": false }),
        )
        .await;

    assert_eq!(res.status, 500);
    assert_eq!(res.code(), "INTERNAL_ERROR");
    assert!(app.find(id).await.is_some());
    assert_eq!(app.media_count().await, 1);
    assert_eq!(app.stored_file_count(), 1);
}
