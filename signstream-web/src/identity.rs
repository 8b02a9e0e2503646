//! Face identity matching from landmark descriptors
//!
//! A descriptor is the (x, y, z) of 20 face-contour points. Users are matched
//! by Euclidean distance to their registered descriptor; the closest one under
//! the threshold wins.

use nalgebra::DVector;
use serde::Serialize;
use tracing::debug;

use crate::landmarks::face::DESCRIPTOR_POINTS;
use crate::landmarks::Landmark;

/// Default maximum descriptor distance for a match
pub const MATCH_THRESHOLD: f32 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct FaceDescriptor(DVector<f32>);

impl FaceDescriptor {
    /// Sample the descriptor points. Points the mesh is missing are skipped,
    /// so a partial mesh yields a shorter descriptor that will not match.
    pub fn from_face(face: &[Landmark]) -> Option<Self> {
        if face.is_empty() {
            return None;
        }
        let values: Vec<f32> = DESCRIPTOR_POINTS
            .iter()
            .filter_map(|idx| face.get(*idx))
            .flat_map(|p| [p.x, p.y, p.z])
            .collect();
        if values.is_empty() {
            return None;
        }
        Some(Self(DVector::from_vec(values)))
    }

    pub fn from_values(values: &[f32]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Self(DVector::from_column_slice(values)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Euclidean distance; descriptors of different length never match
    pub fn distance(&self, other: &FaceDescriptor) -> f32 {
        if self.0.len() != other.0.len() {
            return f32::INFINITY;
        }
        (&self.0 - &other.0).norm()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityMatch {
    pub user_id: String,
    /// 1 at distance 0, falling to 0 at the threshold
    pub confidence: f32,
}

pub struct FaceMatcher {
    known: Vec<(String, FaceDescriptor)>,
    threshold: f32,
}

impl FaceMatcher {
    pub fn new(threshold: f32) -> Self {
        Self {
            known: Vec::new(),
            threshold,
        }
    }

    /// Register or replace a user's descriptor
    pub fn register(&mut self, user_id: &str, descriptor: FaceDescriptor) {
        self.known.retain(|(id, _)| id != user_id);
        self.known.push((user_id.to_string(), descriptor));
    }

    pub fn forget(&mut self, user_id: &str) {
        self.known.retain(|(id, _)| id != user_id);
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    pub fn recognize(&self, face: &[Landmark]) -> Option<IdentityMatch> {
        let descriptor = FaceDescriptor::from_face(face)?;

        let (user_id, distance) = self
            .known
            .iter()
            .map(|(id, known)| (id, descriptor.distance(known)))
            .filter(|(_, d)| *d < self.threshold)
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        debug!("Face matched '{}' at distance {:.3}", user_id, distance);
        Some(IdentityMatch {
            user_id: user_id.clone(),
            confidence: 1.0 - distance / self.threshold,
        })
    }
}

impl Default for FaceMatcher {
    fn default() -> Self {
        Self::new(MATCH_THRESHOLD)
    }
}
