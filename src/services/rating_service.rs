use serde::{Deserialize, Serialize};
use surrealdb::{engine::any::Any, Surreal};

use crate::error::{Error, Result};
use crate::helpers::thing_helpers::create_track_thing;

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 10;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VoteOutcome {
    pub vote_count: u64,
    pub average_rating: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayOutcome {
    pub play_count: u64,
}

pub struct RatingService;

impl RatingService {
    /// Folds one score into the track's running mean.
    ///
    /// The whole read-modify-write is one UPDATE statement, committed as a
    /// single transaction per record: SET clauses evaluate left to right, so
    /// the mean folds the new score in against the old counter before the
    /// counter moves. Concurrent votes on the same track serialize in the
    /// store; none are lost.
    pub async fn record_vote(db: &Surreal<Any>, track_id: &str, score: i64) -> Result<VoteOutcome> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(Error::InvalidScore { score });
        }

        let track_thing = create_track_thing(track_id);

        let sql = "UPDATE $track_id SET \
            average_rating = (average_rating * vote_count + $score) / (vote_count + 1), \
            vote_count += 1 \
            RETURN AFTER;";

        let mut response = db
            .query(sql)
            .bind(("track_id", track_thing))
            .bind(("score", score))
            .await?;

        let outcome: Option<VoteOutcome> = response.take(0)?;
        outcome.ok_or(Error::TrackNotFound {
            id: track_id.to_string(),
        })
    }

    /// Bumps the play counter by exactly one. Same atomicity story as votes.
    pub async fn record_play(db: &Surreal<Any>, track_id: &str) -> Result<PlayOutcome> {
        let track_thing = create_track_thing(track_id);

        let sql = "UPDATE $track_id SET play_count += 1 RETURN AFTER;";

        let mut response = db.query(sql).bind(("track_id", track_thing)).await?;

        let outcome: Option<PlayOutcome> = response.take(0)?;
        outcome.ok_or(Error::TrackNotFound {
            id: track_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::track::Track;
    use chrono::Utc;
    use surrealdb::engine::any::connect;
    use surrealdb::sql::Datetime;

    async fn setup_db() -> (Surreal<Any>, String) {
        let db = connect("mem://").await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();

        let track: Track = db
            .create("track")
            .content(Track {
                id: None,
                artist: "Nadia Volt".to_string(),
                title: "Glasshouse".to_string(),
                genre: "house".to_string(),
                audio_url: "http://localhost:8080/media/audio/glasshouse.mp3".to_string(),
                preview_url: None,
                artwork_url: "http://localhost:8080/media/defaults/artwork.png".to_string(),
                owner_email: "nadia@example.com".to_string(),
                allow_download: false,
                approved: true,
                play_count: 0,
                vote_count: 0,
                average_rating: 0.0,
                created_at: Datetime::from(Utc::now()),
            })
            .await
            .unwrap()
            .expect("track creation returned nothing");

        let track_id = track.id.unwrap().id.to_string();
        (db, track_id)
    }

    #[tokio::test]
    async fn test_votes_update_running_mean() {
        let (db, track_id) = setup_db().await;

        // Fresh track: no votes yet means a zero mean.
        for (score, expected_count, expected_avg) in
            [(8, 1, 8.0), (6, 2, 7.0), (10, 3, 8.0)]
        {
            let outcome = RatingService::record_vote(&db, &track_id, score).await.unwrap();
            assert_eq!(outcome.vote_count, expected_count);
            assert!((outcome.average_rating - expected_avg).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn test_mean_matches_full_recompute() {
        let (db, track_id) = setup_db().await;

        let scores = [7_i64, 3, 9, 10, 1, 5, 8, 8];
        let mut last = None;
        for score in scores {
            last = Some(RatingService::record_vote(&db, &track_id, score).await.unwrap());
        }

        let outcome = last.unwrap();
        let expected = scores.iter().sum::<i64>() as f64 / scores.len() as f64;
        assert_eq!(outcome.vote_count, scores.len() as u64);
        assert!(
            (outcome.average_rating - expected).abs() / expected < 1e-9,
            "running mean {} drifted from recomputed mean {}",
            outcome.average_rating,
            expected
        );
    }

    #[tokio::test]
    async fn test_concurrent_votes_lose_nothing() {
        let (db, track_id) = setup_db().await;

        let scores: Vec<i64> = (0..20).map(|i| (i % 10) + 1).collect();
        let mut handles = Vec::new();
        for score in scores.clone() {
            let db = db.clone();
            let track_id = track_id.clone();
            handles.push(tokio::spawn(async move {
                RatingService::record_vote(&db, &track_id, score).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let outcome = RatingService::record_play(&db, &track_id).await.unwrap();
        assert_eq!(outcome.play_count, 1);

        let final_vote = RatingService::record_vote(&db, &track_id, 5).await.unwrap();
        let mut all_scores = scores;
        all_scores.push(5);
        let expected = all_scores.iter().sum::<i64>() as f64 / all_scores.len() as f64;
        assert_eq!(final_vote.vote_count, all_scores.len() as u64);
        assert!((final_vote.average_rating - expected).abs() / expected < 1e-9);
    }

    #[tokio::test]
    async fn test_score_bounds() {
        let (db, track_id) = setup_db().await;

        assert!(matches!(
            RatingService::record_vote(&db, &track_id, 0).await,
            Err(Error::InvalidScore { score: 0 })
        ));
        assert!(matches!(
            RatingService::record_vote(&db, &track_id, 11).await,
            Err(Error::InvalidScore { score: 11 })
        ));

        // Bounds themselves are valid.
        RatingService::record_vote(&db, &track_id, MIN_SCORE).await.unwrap();
        RatingService::record_vote(&db, &track_id, MAX_SCORE).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_track_is_not_found() {
        let (db, _track_id) = setup_db().await;

        assert!(matches!(
            RatingService::record_vote(&db, "no_such_track", 5).await,
            Err(Error::TrackNotFound { .. })
        ));
        assert!(matches!(
            RatingService::record_play(&db, "no_such_track").await,
            Err(Error::TrackNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_play_count_is_monotonic() {
        let (db, track_id) = setup_db().await;

        for expected in 1..=5 {
            let outcome = RatingService::record_play(&db, &track_id).await.unwrap();
            assert_eq!(outcome.play_count, expected);
        }
    }
}
