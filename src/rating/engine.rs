use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;

use super::elo::{compute_exchange, confidence_score};
use super::types::{AthleteRating, AthleteUpdate, RatingsUpdate};
use crate::config::settings::RatingSettings;
use crate::database::models::DbRating;
use crate::database::{ratings, DbConn};
use crate::domain::{AthleteId, RatingType, Side, TeamId};

/// Options for applying a single observed seat-race result.
#[derive(Debug, Clone, Copy)]
pub struct SeatRaceOptions {
    pub rating_type: RatingType,
    /// Update strength for lower-confidence observations; conventionally <= 1.
    pub weight: f64,
}

impl Default for SeatRaceOptions {
    fn default() -> Self {
        Self {
            rating_type: RatingType::Combined,
            weight: 1.0,
        }
    }
}

/// Outcome of a side-aware update: one side-specific exchange per distinct
/// side, plus the combined exchange every observation contributes to.
#[derive(Debug, Clone)]
pub struct SideDetectionUpdate {
    pub side_a: RatingsUpdate,
    pub side_b: Option<RatingsUpdate>,
    pub combined: RatingsUpdate,
}

/// Owns all mutation of athlete rating records. Every update writes both
/// athletes' rows inside one transaction; a partial update where only one
/// rating changes is never observable.
pub struct RatingEngine {
    settings: RatingSettings,
}

impl RatingEngine {
    pub fn new(settings: RatingSettings) -> Self {
        Self { settings }
    }

    /// Looks up the rating record for (athlete, rating type), creating it
    /// with the default rating and zero races when absent. Idempotent.
    pub fn get_or_create_rating(
        &self,
        conn: &Connection,
        athlete_id: AthleteId,
        team_id: TeamId,
        rating_type: RatingType,
    ) -> Result<AthleteRating> {
        if let Some(row) = ratings::find(conn, athlete_id, rating_type.as_str())? {
            return to_athlete_rating(row);
        }

        let row = ratings::insert(
            conn,
            athlete_id,
            team_id,
            rating_type.as_str(),
            self.settings.default_rating,
            Utc::now().naive_utc(),
        )?;
        to_athlete_rating(row)
    }

    pub fn get_or_create_side_specific_rating(
        &self,
        conn: &Connection,
        athlete_id: AthleteId,
        team_id: TeamId,
        side: Side,
    ) -> Result<AthleteRating> {
        self.get_or_create_rating(conn, athlete_id, team_id, RatingType::CombinedSide(side))
    }

    /// Applies one observed result to both athletes' ratings atomically.
    ///
    /// A positive `performance_diff_seconds` means athlete A was faster.
    pub fn update_ratings(
        &self,
        conn: &mut DbConn,
        team_id: TeamId,
        athlete_a: AthleteId,
        athlete_b: AthleteId,
        performance_diff_seconds: f64,
        rating_type: RatingType,
        weight: f64,
    ) -> Result<RatingsUpdate> {
        let tx = conn
            .transaction()
            .context("Failed to open rating update transaction")?;
        let update = self.apply_exchange(
            &tx,
            team_id,
            athlete_a,
            athlete_b,
            performance_diff_seconds,
            rating_type,
            weight,
        )?;
        tx.commit()
            .context("Failed to commit rating update transaction")?;
        Ok(update)
    }

    /// Public entry point for callers applying a single seat-race result.
    pub fn update_ratings_from_seat_race(
        &self,
        conn: &mut DbConn,
        team_id: TeamId,
        athlete_a: AthleteId,
        athlete_b: AthleteId,
        performance_diff_seconds: f64,
        options: SeatRaceOptions,
    ) -> Result<RatingsUpdate> {
        self.update_ratings(
            conn,
            team_id,
            athlete_a,
            athlete_b,
            performance_diff_seconds,
            options.rating_type,
            options.weight,
        )
    }

    /// Side-aware update: athlete A's side series gets the result, athlete
    /// B's side series gets it with the sign reversed when the sides differ,
    /// and the combined series always gets the original result. All writes
    /// share one transaction.
    pub fn update_ratings_with_side_detection(
        &self,
        conn: &mut DbConn,
        team_id: TeamId,
        athlete_a: AthleteId,
        athlete_b: AthleteId,
        side_a: Side,
        side_b: Side,
        performance_diff_seconds: f64,
    ) -> Result<SideDetectionUpdate> {
        let tx = conn
            .transaction()
            .context("Failed to open rating update transaction")?;

        let side_a_update = self.apply_exchange(
            &tx,
            team_id,
            athlete_a,
            athlete_b,
            performance_diff_seconds,
            RatingType::CombinedSide(side_a),
            1.0,
        )?;

        let side_b_update = if side_a != side_b {
            Some(self.apply_exchange(
                &tx,
                team_id,
                athlete_b,
                athlete_a,
                -performance_diff_seconds,
                RatingType::CombinedSide(side_b),
                1.0,
            )?)
        } else {
            None
        };

        let combined = self.apply_exchange(
            &tx,
            team_id,
            athlete_a,
            athlete_b,
            performance_diff_seconds,
            RatingType::Combined,
            1.0,
        )?;

        tx.commit()
            .context("Failed to commit rating update transaction")?;

        Ok(SideDetectionUpdate {
            side_a: side_a_update,
            side_b: side_b_update,
            combined,
        })
    }

    // Runs inside the caller's open transaction.
    #[allow(clippy::too_many_arguments)]
    fn apply_exchange(
        &self,
        tx: &Connection,
        team_id: TeamId,
        athlete_a: AthleteId,
        athlete_b: AthleteId,
        performance_diff_seconds: f64,
        rating_type: RatingType,
        weight: f64,
    ) -> Result<RatingsUpdate> {
        let rating_a = self.get_or_create_rating(tx, athlete_a, team_id, rating_type)?;
        let rating_b = self.get_or_create_rating(tx, athlete_b, team_id, rating_type)?;

        let exchange = compute_exchange(
            rating_a.rating_value,
            rating_b.rating_value,
            performance_diff_seconds,
            weight,
            &self.settings,
        );

        let calculated_at = Utc::now().naive_utc();
        let athlete_a_update =
            self.persist_half(tx, &rating_a, exchange.new_rating_a, calculated_at)?;
        let athlete_b_update =
            self.persist_half(tx, &rating_b, exchange.new_rating_b, calculated_at)?;

        Ok(RatingsUpdate {
            athlete_a: athlete_a_update,
            athlete_b: athlete_b_update,
            performance_diff: performance_diff_seconds,
            margin_factor: exchange.margin_factor,
            adjusted_k: exchange.adjusted_k,
        })
    }

    fn persist_half(
        &self,
        tx: &Connection,
        current: &AthleteRating,
        new_rating: f64,
        calculated_at: chrono::NaiveDateTime,
    ) -> Result<AthleteUpdate> {
        let races_count = current.races_count + 1;
        let confidence = confidence_score(races_count, &self.settings);

        let row = ratings::find(tx, current.athlete_id, current.rating_type.as_str())?
            .ok_or_else(|| anyhow::anyhow!("Rating row vanished mid-update"))?;
        ratings::update_values(tx, row.id, new_rating, races_count, confidence, calculated_at)?;

        Ok(AthleteUpdate {
            athlete_id: current.athlete_id,
            old_rating: current.rating_value,
            new_rating,
            races_count,
            confidence_score: confidence,
        })
    }
}

fn to_athlete_rating(row: DbRating) -> Result<AthleteRating> {
    let rating_type = RatingType::parse(&row.rating_type)
        .ok_or_else(|| anyhow::anyhow!("Unknown rating type in store: {}", row.rating_type))?;

    Ok(AthleteRating {
        athlete_id: row.athlete_id,
        team_id: row.team_id,
        rating_type,
        rating_value: row.rating_value,
        races_count: row.races_count,
        confidence_score: row.confidence_score,
        last_calculated_at: row.last_calculated_at,
    })
}
