use std::cmp::Ordering;

use chrono::Utc;
use lazy_regex::regex_is_match;
use surrealdb::{engine::any::Any, Surreal};
use surrealdb::sql::Datetime;

use crate::error::{Error, Result};
use crate::models::track::Track;
use crate::models::winner::WinnerRecord;

pub struct WinnerService;

impl WinnerService {
    /// Composite ranking weight: consensus quality scaled by volume, plus raw
    /// popularity. A track with few perfect votes does not automatically beat
    /// a heavily played, modestly rated one, and a track with zero votes can
    /// still place through plays alone.
    pub fn composite_score(track: &Track) -> f64 {
        track.average_rating * track.vote_count as f64 + track.play_count as f64
    }

    /// Picks the single winner: maximum composite score, ties broken by
    /// higher vote count, then by earlier `created_at`. Pure over the track
    /// set, so repeated calls on unchanged stats always agree.
    pub fn select_winner(tracks: &[Track]) -> Option<&Track> {
        tracks.iter().max_by(|a, b| {
            Self::composite_score(a)
                .partial_cmp(&Self::composite_score(b))
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.vote_count.cmp(&b.vote_count))
                .then_with(|| b.created_at.cmp(&a.created_at))
        })
    }

    /// Computes the winner over every stored track and appends a snapshot
    /// row. Append-only: calling twice for the same period appends twice.
    /// `period` defaults to the current calendar month.
    pub async fn finalize(db: &Surreal<Any>, period: Option<String>) -> Result<WinnerRecord> {
        let period = match period {
            Some(period) => {
                if !regex_is_match!(r"^\d{4}-(0[1-9]|1[0-2])$", &period) {
                    return Err(Error::InvalidField {
                        field: "period".to_string(),
                        reason: "expected YYYY-MM".to_string(),
                    });
                }
                period
            }
            None => Utc::now().format("%Y-%m").to_string(),
        };

        let mut response = db.query("SELECT * FROM track;").await?;
        let tracks: Vec<Track> = response.take(0)?;

        let winner = Self::select_winner(&tracks).ok_or(Error::NoEligibleTracks)?;
        let track_id = winner
            .id
            .clone()
            .ok_or_else(|| Error::DbError("track record without id".to_string()))?;

        let record = WinnerRecord {
            id: None,
            period: period.clone(),
            track_id,
            artist: winner.artist.clone(),
            title: winner.title.clone(),
            genre: winner.genre.clone(),
            composite_score: Self::composite_score(winner),
            selected_at: Datetime::from(Utc::now()),
        };

        let created: Option<WinnerRecord> = db.create("winner").content(record).await?;
        let created =
            created.ok_or_else(|| Error::DbError("winner insert returned nothing".to_string()))?;

        tracing::info!(
            period = %created.period,
            title = %created.title,
            score = created.composite_score,
            "winner finalized"
        );

        Ok(created)
    }

    /// Past winners, most recent selection first.
    pub async fn list_winners(db: &Surreal<Any>) -> Result<Vec<WinnerRecord>> {
        let mut response = db
            .query("SELECT * FROM winner ORDER BY selected_at DESC;")
            .await?;
        let winners: Vec<WinnerRecord> = response.take(0)?;
        Ok(winners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use surrealdb::engine::any::connect;
    use surrealdb::sql::Thing;

    fn make_track(
        title: &str,
        average_rating: f64,
        vote_count: u64,
        play_count: u64,
        day: u32,
    ) -> Track {
        Track {
            id: Some(Thing::from(("track".to_string(), title.to_lowercase().replace(' ', "_")))),
            artist: "Panel".to_string(),
            title: title.to_string(),
            genre: "house".to_string(),
            audio_url: "http://localhost:8080/media/audio/x.mp3".to_string(),
            preview_url: None,
            artwork_url: "http://localhost:8080/media/defaults/artwork.png".to_string(),
            owner_email: "panel@example.com".to_string(),
            allow_download: false,
            approved: true,
            play_count,
            vote_count,
            average_rating,
            created_at: Datetime::from(Utc.with_ymd_and_hms(2025, 6, day, 0, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_composite_rewards_volume_and_plays() {
        // Few perfect votes vs. heavy modest traffic: 10*2+0 = 20 loses to
        // 6*10+40 = 100.
        let niche = make_track("Niche", 10.0, 2, 0, 1);
        let popular = make_track("Popular", 6.0, 10, 40, 2);

        let tracks = vec![niche, popular];
        let winner = WinnerService::select_winner(&tracks).unwrap();
        assert_eq!(winner.title, "Popular");
    }

    #[test]
    fn test_zero_vote_track_can_win_on_plays() {
        let unvoted = make_track("Unvoted", 0.0, 0, 500, 1);
        let rated = make_track("Rated", 9.0, 3, 0, 2);

        let tracks = vec![unvoted, rated];
        let winner = WinnerService::select_winner(&tracks).unwrap();
        assert_eq!(winner.title, "Unvoted");
    }

    #[test]
    fn test_score_tie_breaks_on_vote_count_then_age() {
        // Both score 40; B has more votes.
        let a = make_track("A", 10.0, 2, 20, 1);
        let b = make_track("B", 8.0, 5, 0, 2);
        assert_eq!(WinnerService::select_winner(&[a, b]).unwrap().title, "B");

        // Identical score and votes; the earlier upload wins.
        let older = make_track("Older", 8.0, 5, 0, 1);
        let newer = make_track("Newer", 8.0, 5, 0, 15);
        assert_eq!(
            WinnerService::select_winner(&[newer, older]).unwrap().title,
            "Older"
        );
    }

    #[test]
    fn test_selection_is_deterministic() {
        let tracks = vec![
            make_track("One", 7.5, 4, 11, 3),
            make_track("Two", 9.0, 2, 30, 4),
            make_track("Three", 4.0, 9, 2, 5),
        ];

        let first = WinnerService::select_winner(&tracks).unwrap().title.clone();
        for _ in 0..5 {
            assert_eq!(WinnerService::select_winner(&tracks).unwrap().title, first);
        }
    }

    #[test]
    fn test_empty_set_has_no_winner() {
        assert!(WinnerService::select_winner(&[]).is_none());
    }

    #[tokio::test]
    async fn test_finalize_appends_snapshot() {
        let db = connect("mem://").await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();

        let _: Option<Track> = db
            .create("track")
            .content(make_track_unsaved("Champion", 9.0, 10, 25))
            .await
            .unwrap();

        let record = WinnerService::finalize(&db, Some("2025-06".to_string())).await.unwrap();
        assert_eq!(record.period, "2025-06");
        assert_eq!(record.title, "Champion");
        assert!((record.composite_score - 115.0).abs() < 1e-9);

        // Append-only: a second finalization adds a second row.
        WinnerService::finalize(&db, Some("2025-06".to_string())).await.unwrap();
        let winners = WinnerService::list_winners(&db).await.unwrap();
        assert_eq!(winners.len(), 2);
    }

    #[tokio::test]
    async fn test_finalize_validates_period_and_empty_set() {
        let db = connect("mem://").await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();

        assert!(matches!(
            WinnerService::finalize(&db, Some("june-2025".to_string())).await,
            Err(Error::InvalidField { .. })
        ));
        assert!(matches!(
            WinnerService::finalize(&db, Some("2025-13".to_string())).await,
            Err(Error::InvalidField { .. })
        ));

        assert!(matches!(
            WinnerService::finalize(&db, None).await,
            Err(Error::NoEligibleTracks)
        ));
    }

    fn make_track_unsaved(title: &str, average_rating: f64, vote_count: u64, play_count: u64) -> Track {
        let mut track = make_track(title, average_rating, vote_count, play_count, 1);
        track.id = None;
        track
    }
}
