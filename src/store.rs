//! Serialization of the point set into the host's two persisted slots
//!
//! `points_store` carries the full set for restoring the editor and
//! `coordinates` carries the first four points for downstream consumers.
//! Both are pure projections of the same [`PointSet`] and are always
//! committed together.

use anyhow::bail;

use crate::domain::{MAX_POINTS, Point, PointSet};
use crate::host::{COORDINATES_SLOT, POINTS_STORE_SLOT, SlotStore};

/// Serialized form of both slots
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Projection {
    pub points_store: String,
    pub coordinates: String,
}

/// Serialize points as a JSON array of `{x, y}` objects
pub fn serialize_points(points: &[Point]) -> String {
    // A Vec of plain f32 pairs cannot fail to serialize
    serde_json::to_string(points).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a stored point array, reporting malformed input
///
/// Arrays longer than four points are truncated.
pub fn try_deserialize_points(raw: &str) -> Result<Vec<Point>, serde_json::Error> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let mut points: Vec<Point> = serde_json::from_str(raw)?;
    if points.len() > MAX_POINTS {
        log::warn!(
            "Stored point set has {} points, keeping the first {}",
            points.len(),
            MAX_POINTS
        );
        points.truncate(MAX_POINTS);
    }
    Ok(points)
}

/// Parse a stored point array
///
/// Malformed input yields an empty set and a warning; persisted state must
/// never stop the editor from opening.
pub fn deserialize_points(raw: &str) -> Vec<Point> {
    try_deserialize_points(raw).unwrap_or_else(|err| {
        log::warn!("Failed to parse stored points, starting empty: {}", err);
        Vec::new()
    })
}

/// Compute both slot values from one point set
pub fn project(set: &PointSet) -> Projection {
    Projection {
        points_store: serialize_points(set.points()),
        coordinates: serialize_points(set.first_four()),
    }
}

/// Keeps the host slots in step with the point set
#[derive(Debug, Default)]
pub struct CoordinateStore {
    last: Option<Projection>,
}

impl CoordinateStore {
    /// Verify the host allocated both slots
    ///
    /// A missing slot means the host and editor disagree about the node
    /// layout, which the editor cannot work around.
    pub fn attach(slots: &impl SlotStore) -> anyhow::Result<Self> {
        for name in [POINTS_STORE_SLOT, COORDINATES_SLOT] {
            if slots.slot(name).is_none() {
                log::error!("Host node has no '{}' slot", name);
                bail!("required storage slot '{name}' is missing");
            }
        }
        Ok(Self::default())
    }

    /// Read the persisted full point set
    pub fn load(&self, slots: &impl SlotStore) -> Vec<Point> {
        slots
            .slot(POINTS_STORE_SLOT)
            .map(|raw| deserialize_points(&raw))
            .unwrap_or_default()
    }

    /// Publish both projections, skipping the write if nothing changed
    pub fn sync(&mut self, set: &PointSet, slots: &mut impl SlotStore) -> bool {
        let projection = project(set);
        if self.last.as_ref() == Some(&projection) {
            return false;
        }
        slots.commit_slots(
            projection.points_store.clone(),
            projection.coordinates.clone(),
        );
        self.last = Some(projection);
        true
    }

    /// Forget the last commit so the next sync always writes
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}
