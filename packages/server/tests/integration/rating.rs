use serde_json::json;

use crate::common::{TestApp, routes};

mod likes {
    use super::*;

    #[tokio::test]
    async fn likes_and_dislikes_move_by_one() {
        let app = TestApp::spawn().await;
        let id = app.upload_one("sunrise.jpg").await;

        for _ in 0..3 {
            app.post_empty(&routes::like(id)).await;
        }
        let mut last = None;
        for _ in 0..5 {
            last = Some(app.post_empty(&routes::dislike(id)).await);
        }

        let last = last.unwrap();
        assert_eq!(last.status, 200);
        assert_eq!(last.body["id"], id);
        assert_eq!(last.body["like_count"], -2);
        assert_eq!(app.find(id).await.unwrap().like_count, -2);
    }

    #[tokio::test]
    async fn like_returns_new_count() {
        let app = TestApp::spawn().await;
        let id = app.upload_one("sunrise.jpg").await;
        app.set_likes(id, 41).await;

        let res = app.post_empty(&routes::like(id)).await;

        assert_eq!(res.body["like_count"], 42);
    }

    #[tokio::test]
    async fn counts_pass_the_32_bit_range() {
        let app = TestApp::spawn().await;
        let id = app.upload_one("sunrise.jpg").await;
        app.set_likes(id, i64::from(i32::MAX)).await;

        let res = app.post_empty(&routes::like(id)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["like_count"], 2_147_483_648i64);
        assert_eq!(app.find(id).await.unwrap().like_count, 2_147_483_648);

        let listed = app.get(&routes::media(id)).await;
        assert_eq!(listed.body["like_count"], 2_147_483_648i64);
    }

    #[tokio::test]
    async fn voting_on_missing_record_is_not_found() {
        let app = TestApp::spawn().await;

        assert_eq!(app.post_empty(&routes::like(404)).await.status, 404);
        assert_eq!(app.post_empty(&routes::dislike(404)).await.status, 404);
    }
}

mod elo {
    use super::*;

    #[tokio::test]
    async fn equal_ratings_exchange_half_the_k_factor() {
        let app = TestApp::spawn().await;
        let ids = app.upload_many(&["alpha.jpg", "bravo.jpg"]).await;

        let res = app
            .post(routes::VOTE, &json!({ "winner_id": ids[0], "loser_id": ids[1] }))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["winner"]["elo_rating"].as_f64().unwrap(), 1516.0);
        assert_eq!(res.body["loser"]["elo_rating"].as_f64().unwrap(), 1484.0);
        assert!(res.body["next"].is_null());

        assert_eq!(app.find(ids[0]).await.unwrap().elo_rating, 1516.0);
        assert_eq!(app.find(ids[1]).await.unwrap().elo_rating, 1484.0);
    }

    #[tokio::test]
    async fn upset_moves_more_points() {
        let app = TestApp::spawn().await;
        let ids = app.upload_many(&["alpha.jpg", "bravo.jpg"]).await;
        app.post(routes::VOTE, &json!({ "winner_id": ids[0], "loser_id": ids[1] }))
            .await;

        let res = app
            .post(routes::VOTE, &json!({ "winner_id": ids[1], "loser_id": ids[0] }))
            .await;

        let gained = res.body["winner"]["elo_rating"].as_f64().unwrap() - 1484.0;
        assert!(gained > 16.0, "underdog only gained {gained}");
        let total = res.body["winner"]["elo_rating"].as_f64().unwrap()
            + res.body["loser"]["elo_rating"].as_f64().unwrap();
        assert!((total - 3000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn vote_against_itself_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.upload_one("alpha.jpg").await;

        let res = app
            .post(routes::VOTE, &json!({ "winner_id": id, "loser_id": id }))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn vote_with_missing_record_changes_nothing() {
        let app = TestApp::spawn().await;
        let id = app.upload_one("alpha.jpg").await;

        let res = app
            .post(routes::VOTE, &json!({ "winner_id": id, "loser_id": 999 }))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(app.find(id).await.unwrap().elo_rating, 1500.0);
    }
}

mod resets {
    use super::*;

    #[tokio::test]
    async fn reset_likes_zeroes_every_record() {
        let app = TestApp::spawn().await;
        let ids = app.upload_many(&["alpha.jpg", "bravo.jpg"]).await;
        app.set_likes(ids[0], 7).await;
        app.set_likes(ids[1], -3).await;

        let res = app.post_empty(routes::RESET_LIKES).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["affected"], 2);
        for id in ids {
            assert_eq!(app.find(id).await.unwrap().like_count, 0);
        }
    }

    #[tokio::test]
    async fn reset_elo_restores_default_and_keeps_likes() {
        let app = TestApp::spawn().await;
        let ids = app.upload_many(&["alpha.jpg", "bravo.jpg"]).await;
        app.set_likes(ids[0], 4).await;
        app.post(routes::VOTE, &json!({ "winner_id": ids[0], "loser_id": ids[1] }))
            .await;

        let res = app.post_empty(routes::RESET_ELO).await;

        assert_eq!(res.status, 200);
        let winner = app.find(ids[0]).await.unwrap();
        assert_eq!(winner.elo_rating, 1500.0);
        assert_eq!(winner.like_count, 4);
        assert_eq!(app.find(ids[1]).await.unwrap().elo_rating, 1500.0);
    }
}
