//! Per-point damage history
//!
//! Each point keeps the damage of the last accepted step (`previous`) and the
//! trial value of the step in progress (`current`). Advancing always starts
//! from `previous`, so it may be repeated within a step (e.g. by nonlinear
//! iterations) without compounding. [`DamageState::commit_step`] accepts the
//! step.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::error::Result;
use crate::mechanics::damage::{check_time_step, DamageLaw};
use crate::mechanics::stress::StressTensor;
use crate::point::PointId;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageRecord {
    pub previous: f64,
    pub current: f64,
}

impl DamageRecord {
    pub fn new(initial: f64) -> Self {
        Self {
            previous: initial,
            current: initial,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DamageState {
    records: HashMap<PointId, DamageRecord>,
}

impl DamageState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register points with zero initial damage
    pub fn with_points(ids: impl IntoIterator<Item = PointId>) -> Self {
        Self {
            records: ids
                .into_iter()
                .map(|id| (id, DamageRecord::default()))
                .collect(),
        }
    }

    pub fn insert(&mut self, id: PointId, initial: f64) {
        self.records.insert(id, DamageRecord::new(initial));
    }

    pub fn get(&self, id: PointId) -> Option<&DamageRecord> {
        self.records.get(&id)
    }

    /// Damage of the step in progress
    pub fn current(&self, id: PointId) -> Option<f64> {
        self.records.get(&id).map(|r| r.current)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PointId, &DamageRecord)> {
        self.records.iter()
    }

    /// Advance one point; unknown points start from zero damage
    pub fn advance(
        &mut self,
        law: &DamageLaw,
        id: PointId,
        stress: &StressTensor,
        dt: f64,
    ) -> Result<f64> {
        let record = self.records.entry(id).or_default();
        record.current = law.step(record.previous, stress, dt)?;
        Ok(record.current)
    }

    /// Advance every registered point in parallel
    ///
    /// `stress_at` returns the stress for a point, or `None` to leave that
    /// point's trial value untouched.
    pub fn advance_all<F>(&mut self, law: &DamageLaw, dt: f64, stress_at: F) -> Result<()>
    where
        F: Fn(PointId) -> Option<StressTensor> + Sync,
    {
        check_time_step(dt)?;

        self.records.par_iter_mut().for_each(|(id, record)| {
            if let Some(stress) = stress_at(*id) {
                let xi = law.stress_measure(&stress);
                record.current = record.previous + dt * law.rate_of_change(record.previous, xi);
            }
        });
        Ok(())
    }

    /// Accept the step: current values become the next step's previous
    pub fn commit_step(&mut self) {
        self.records
            .par_iter_mut()
            .for_each(|(_, record)| record.previous = record.current);
        log::debug!("committed damage for {} points", self.records.len());
    }

    /// Back to zero damage everywhere, keeping the registered points
    pub fn reset(&mut self) {
        for record in self.records.values_mut() {
            *record = DamageRecord::default();
        }
    }

    pub fn max_damage(&self) -> f64 {
        self.records
            .values()
            .map(|r| r.current)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}
