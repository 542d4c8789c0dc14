//! Keyframe animation clips

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Which part of a transform a track drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackProperty {
    /// Local position
    Position,
    /// Local rotation as XYZ Euler angles in radians
    Rotation,
    /// Local scale
    Scale,
}

/// Keyframes for one property of one named node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Node name the track animates
    pub target: String,
    /// Animated property
    pub property: TrackProperty,
    /// Key times in seconds, non-decreasing
    pub times: Vec<f32>,
    /// One value per key time
    pub values: Vec<[f32; 3]>,
}

impl Track {
    /// Linearly interpolated value at `time`, clamped to the first/last key
    pub fn sample(&self, time: f32) -> Option<Vec3> {
        let keys = self.times.len().min(self.values.len());
        let last = keys.checked_sub(1)?;
        let next = self.times[..keys].partition_point(|&t| t <= time);

        if next == 0 {
            return Some(Vec3::from(self.values[0]));
        }
        if next > last {
            return Some(Vec3::from(self.values[last]));
        }

        let (t0, t1) = (self.times[next - 1], self.times[next]);
        let (a, b) = (Vec3::from(self.values[next - 1]), Vec3::from(self.values[next]));
        let span = t1 - t0;
        let alpha = if span > 0.0 { (time - t0) / span } else { 1.0 };
        Some(a.lerp(&b, alpha))
    }

    /// End time of the track
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    fn validate(&self) -> Result<(), String> {
        if self.times.is_empty() {
            return Err(format!("track for '{}' has no keys", self.target));
        }
        if self.times.len() != self.values.len() {
            return Err(format!(
                "track for '{}' has {} times but {} values",
                self.target,
                self.times.len(),
                self.values.len()
            ));
        }
        if self.times.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(format!("track for '{}' has decreasing key times", self.target));
        }
        Ok(())
    }
}

/// Named set of tracks played together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Clip name
    pub name: String,
    /// Length in seconds; zero means "until the last key"
    #[serde(default)]
    pub duration: f32,
    /// Animated tracks
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Effective clip length in seconds
    pub fn length(&self) -> f32 {
        if self.duration > 0.0 {
            self.duration
        } else {
            self.tracks.iter().map(Track::end_time).fold(0.0, f32::max)
        }
    }

    /// Check that every track is well-formed
    pub fn validate(&self) -> Result<(), String> {
        self.tracks
            .iter()
            .try_for_each(Track::validate)
            .map_err(|e| format!("clip '{}': {e}", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bounce() -> Track {
        Track {
            target: "hips".to_string(),
            property: TrackProperty::Position,
            times: vec![0.0, 1.0, 2.0],
            values: vec![[0.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 0.0]],
        }
    }

    #[test]
    fn test_sample_interpolates_between_keys() {
        let track = bounce();
        assert_relative_eq!(track.sample(0.5).unwrap(), Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(track.sample(1.0).unwrap(), Vec3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(track.sample(1.75).unwrap(), Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_sample_clamps_outside_range() {
        let track = bounce();
        assert_relative_eq!(track.sample(-1.0).unwrap(), Vec3::zeros());
        assert_relative_eq!(track.sample(5.0).unwrap(), Vec3::zeros());
    }

    #[test]
    fn test_length_falls_back_to_last_key() {
        let clip = AnimationClip {
            name: "dance".to_string(),
            duration: 0.0,
            tracks: vec![bounce()],
        };
        assert_relative_eq!(clip.length(), 2.0);
        assert!(clip.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_mismatched_keys() {
        let mut track = bounce();
        track.values.pop();
        let clip = AnimationClip {
            name: "broken".to_string(),
            duration: 1.0,
            tracks: vec![track],
        };
        assert!(clip.validate().is_err());
    }
}
