use serde_json::json;

use crate::common::{TestApp, routes};

fn id(value: &serde_json::Value) -> i32 {
    value["id"].as_i64().expect("media without id") as i32
}

mod pairs {
    use super::*;

    #[tokio::test]
    async fn pair_needs_two_records() {
        let app = TestApp::spawn().await;
        app.upload_one("lonely.jpg").await;

        let res = app.get(routes::COMPARE).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["message"], "Need at least 2 files to compare");
    }

    #[tokio::test]
    async fn pair_has_two_distinct_records() {
        let app = TestApp::spawn().await;
        app.upload_many(&["alpha.jpg", "bravo.mp4", "charlie.jpg"]).await;

        for _ in 0..10 {
            let res = app.get(routes::COMPARE).await;
            assert_eq!(res.status, 200, "{}", res.text);
            assert_ne!(id(&res.body["left"]), id(&res.body["right"]));
        }
    }

    #[tokio::test]
    async fn matching_types_draws_from_one_kind() {
        let app = TestApp::spawn().await;
        app.upload_many(&["alpha.jpg", "bravo.jpg", "charlie.mp4", "delta.mp4", "echo.jpg"])
            .await;

        for _ in 0..10 {
            let res = app
                .get(&format!("{}?matching_types=true", routes::COMPARE))
                .await;
            assert_eq!(
                res.body["left"]["file_type"],
                res.body["right"]["file_type"]
            );
        }
    }

    #[tokio::test]
    async fn matching_types_skips_kinds_with_one_record() {
        let app = TestApp::spawn().await;
        app.upload_many(&["alpha.jpg", "bravo.jpg", "charlie.mp4"]).await;

        for _ in 0..5 {
            let res = app
                .get(&format!("{}?matching_types=true", routes::COMPARE))
                .await;
            assert_eq!(res.body["left"]["file_type"], "image");
            assert_eq!(res.body["right"]["file_type"], "image");
        }
    }

    #[tokio::test]
    async fn matching_types_without_any_eligible_kind_is_not_found() {
        let app = TestApp::spawn().await;
        app.upload_many(&["alpha.jpg", "bravo.mp4"]).await;

        let res = app
            .get(&format!("{}?matching_types=true", routes::COMPARE))
            .await;

        assert_eq!(res.status, 404);
    }
}

mod king_of_the_hill {
    use super::*;

    #[tokio::test]
    async fn winner_stays_as_champion() {
        let app = TestApp::spawn().await;
        let ids = app
            .upload_many(&["alpha.jpg", "bravo.jpg", "charlie.jpg"])
            .await;

        let res = app
            .post(
                routes::VOTE,
                &json!({ "winner_id": ids[0], "loser_id": ids[1], "king_of_hill": true }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let next = &res.body["next"];
        assert_eq!(id(&next["champion"]), ids[0]);
        assert_eq!(next["champion"]["elo_rating"].as_f64().unwrap(), 1516.0);
        assert_ne!(id(&next["challenger"]), ids[0]);
    }

    #[tokio::test]
    async fn challenger_respects_matching_types() {
        let app = TestApp::spawn().await;
        let ids = app
            .upload_many(&["alpha.mp4", "bravo.jpg", "charlie.jpg", "delta.mp4"])
            .await;

        for _ in 0..5 {
            let res = app
                .get(&format!(
                    "{}?champion_id={}&matching_types=true",
                    routes::CHALLENGER,
                    ids[0]
                ))
                .await;
            assert_eq!(id(&res.body["challenger"]), ids[3]);
        }
    }

    #[tokio::test]
    async fn challenger_is_null_when_nobody_is_left() {
        let app = TestApp::spawn().await;
        let champion = app.upload_one("alpha.jpg").await;

        let res = app
            .get(&format!("{}?champion_id={champion}", routes::CHALLENGER))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(id(&res.body["champion"]), champion);
        assert!(res.body["challenger"].is_null());
    }

    #[tokio::test]
    async fn challenger_for_missing_champion_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&format!("{}?champion_id=77", routes::CHALLENGER))
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn challenger_requires_champion_id() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::CHALLENGER).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }
}
