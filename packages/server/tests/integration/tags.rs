use serde_json::json;

use crate::common::{TestApp, routes};

fn names(tags: &serde_json::Value) -> Vec<String> {
    tags.as_array()
        .expect("expected a tag array")
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect()
}

mod attach {
    use super::*;

    #[tokio::test]
    async fn tag_name_is_normalized() {
        let app = TestApp::spawn().await;
        let id = app.upload_one("a1.jpg").await;

        let res = app
            .post(&routes::media_tags(id), &json!({ "tag_name": "  Sunset " }))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["tag"]["name"], "sunset");

        let media = app.get(&routes::media(id)).await;
        assert_eq!(names(&media.body["tags"]), vec!["sunset"]);
    }

    #[tokio::test]
    async fn attaching_twice_conflicts() {
        let app = TestApp::spawn().await;
        let id = app.upload_one("a1.jpg").await;
        app.post(&routes::media_tags(id), &json!({ "tag_name": "pets" }))
            .await;

        let res = app
            .post(&routes::media_tags(id), &json!({ "tag_name": "PETS" }))
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.code(), "CONFLICT");
    }

    #[tokio::test]
    async fn existing_tag_is_shared() {
        let app = TestApp::spawn().await;
        let ids = app.upload_many(&["a1.jpg", "b2.jpg"]).await;

        let first = app
            .post(&routes::media_tags(ids[0]), &json!({ "tag_name": "family" }))
            .await;
        let second = app
            .post(&routes::media_tags(ids[1]), &json!({ "tag_name": "Family" }))
            .await;

        assert_eq!(first.body["tag"]["id"], second.body["tag"]["id"]);
        assert_eq!(names(&app.get(routes::TAGS).await.body), vec!["family"]);
    }

    #[tokio::test]
    async fn invalid_tag_names_are_rejected() {
        let app = TestApp::spawn().await;
        let id = app.upload_one("a1.jpg").await;

        let long = "x".repeat(51);
        for name in ["", "   ", long.as_str()] {
            let res = app
                .post(&routes::media_tags(id), &json!({ "tag_name": name }))
                .await;
            assert_eq!(res.status, 400, "{name:?} was accepted");
        }
    }

    #[tokio::test]
    async fn tagging_missing_media_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post(&routes::media_tags(5), &json!({ "tag_name": "ghost" }))
            .await;

        assert_eq!(res.status, 404);
        assert!(app.get(routes::TAGS).await.body.as_array().unwrap().is_empty());
    }
}

mod detach {
    use super::*;

    #[tokio::test]
    async fn removing_last_use_deletes_the_tag() {
        let app = TestApp::spawn().await;
        let id = app.upload_one("a1.jpg").await;
        let added = app
            .post(&routes::media_tags(id), &json!({ "tag_name": "blurry" }))
            .await;
        let tag_id = added.body["tag"]["id"].as_i64().unwrap() as i32;

        let res = app.delete(&routes::media_tag(id, tag_id)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["tag"]["name"], "blurry");
        assert!(app.get(routes::TAGS).await.body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn tag_still_in_use_survives() {
        let app = TestApp::spawn().await;
        let ids = app.upload_many(&["a1.jpg", "b2.jpg"]).await;
        let added = app
            .post(&routes::media_tags(ids[0]), &json!({ "tag_name": "garden" }))
            .await;
        app.post(&routes::media_tags(ids[1]), &json!({ "tag_name": "garden" }))
            .await;
        let tag_id = added.body["tag"]["id"].as_i64().unwrap() as i32;

        app.delete(&routes::media_tag(ids[0], tag_id)).await;

        assert_eq!(names(&app.get(routes::TAGS).await.body), vec!["garden"]);
        let remaining = app.get(&routes::media(ids[1])).await;
        assert_eq!(names(&remaining.body["tags"]), vec!["garden"]);
    }

    #[tokio::test]
    async fn unattached_or_unknown_tag_is_not_found() {
        let app = TestApp::spawn().await;
        let ids = app.upload_many(&["a1.jpg", "b2.jpg"]).await;
        let added = app
            .post(&routes::media_tags(ids[0]), &json!({ "tag_name": "garden" }))
            .await;
        let tag_id = added.body["tag"]["id"].as_i64().unwrap() as i32;

        assert_eq!(app.delete(&routes::media_tag(ids[1], tag_id)).await.status, 404);
        assert_eq!(app.delete(&routes::media_tag(ids[0], 999)).await.status, 404);
    }
}

mod search {
    use super::*;

    #[tokio::test]
    async fn search_matches_substrings_alphabetically() {
        let app = TestApp::spawn().await;
        app.upload_one("sunset_beach_sunrise.jpg").await;
        app.upload_one("mountain.jpg").await;

        let res = app.get(&format!("{}?q=SUN", routes::TAG_SEARCH)).await;

        assert_eq!(res.status, 200);
        assert_eq!(names(&res.body), vec!["sunrise", "sunset"]);
    }

    #[tokio::test]
    async fn search_is_limited_to_ten() {
        let app = TestApp::spawn().await;
        let id = app.upload_one("a1.jpg").await;
        for i in 0..12 {
            app.post(&routes::media_tags(id), &json!({ "tag_name": format!("trip{i:02}") }))
                .await;
        }

        let res = app.get(&format!("{}?q=trip", routes::TAG_SEARCH)).await;

        let found = names(&res.body);
        assert_eq!(found.len(), 10);
        assert_eq!(found[0], "trip00");
    }

    #[tokio::test]
    async fn wildcards_are_literal() {
        let app = TestApp::spawn().await;
        let id = app.upload_one("a1.jpg").await;
        app.post(&routes::media_tags(id), &json!({ "tag_name": "100%" }))
            .await;
        app.post(&routes::media_tags(id), &json!({ "tag_name": "1000" }))
            .await;

        let res = app.get(&format!("{}?q=0%25", routes::TAG_SEARCH)).await;

        assert_eq!(names(&res.body), vec!["100%"]);
    }

    #[tokio::test]
    async fn empty_query_returns_nothing() {
        let app = TestApp::spawn().await;
        app.upload_one("sunset.jpg").await;

        let res = app.get(&format!("{}?q=", routes::TAG_SEARCH)).await;

        assert_eq!(res.status, 200);
        assert!(res.body.as_array().unwrap().is_empty());
    }
}

mod cleanup {
    use super::*;

    #[tokio::test]
    async fn deleting_media_leaves_orphans_until_cleanup() {
        let app = TestApp::spawn().await;
        let keep = app.upload_one("lake_view.jpg").await;
        let gone = app.upload_one("lake_storm.jpg").await;

        app.delete(&routes::media(gone)).await;
        assert_eq!(
            names(&app.get(routes::TAGS).await.body),
            vec!["lake", "storm", "view"]
        );

        let res = app.post_empty(routes::TAG_CLEANUP).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["affected"], 1);
        assert_eq!(names(&app.get(routes::TAGS).await.body), vec!["lake", "view"]);
        let kept = app.get(&routes::media(keep)).await;
        assert_eq!(names(&kept.body["tags"]), vec!["lake", "view"]);
    }
}
