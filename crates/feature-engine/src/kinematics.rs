//! Kinematic Feature Estimation
//!
//! Finite-difference derivations over a trajectory's points. Every series
//! of order `k` has `len(points) - k` entries, and entry `i` of a rate
//! series is divided by `delta_t[i]`:
//!
//! | series                     | length  | min points |
//! |----------------------------|---------|------------|
//! | delta_r, delta_t, velocity | n - 1   | 2          |
//! | angle                      | n - 1   | 2          |
//! | acceleration               | n - 2   | 3          |
//! | turning_angle              | n - 2   | 3          |
//! | heading_change_rate        | n - 2   | 3          |
//! | acceleration_change_rate   | n - 3   | 4          |
//! | rate_hcr                   | n - 3   | 4          |

use crate::error::FeatureError;
use trajectory_model::{Trajectory, TrajectoryPoint};

fn require(
    points: &[TrajectoryPoint],
    quantity: &'static str,
    required: usize,
) -> Result<(), FeatureError> {
    if points.len() < required {
        return Err(FeatureError::InsufficientPoints {
            quantity,
            required,
            actual: points.len(),
        });
    }
    if let Some(index) = points
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.t.is_finite()))
    {
        return Err(FeatureError::NonFinite { index });
    }
    Ok(())
}

/// `(series[i + 1] - series[i]) / delta_t[i]`
fn difference_rate(series: &[f64], delta_t: &[f64]) -> Vec<f64> {
    series
        .windows(2)
        .zip(delta_t)
        .map(|(w, dt)| (w[1] - w[0]) / dt)
        .collect()
}

fn positive_distance(delta_r: &[f64], quantity: &'static str) -> Result<f64, FeatureError> {
    let distance: f64 = delta_r.iter().sum();
    if !(distance > 0.0) {
        return Err(FeatureError::ZeroDistance { quantity });
    }
    Ok(distance)
}

fn step_lengths(points: &[TrajectoryPoint]) -> Vec<f64> {
    points
        .windows(2)
        .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
        .collect()
}

fn step_times(points: &[TrajectoryPoint]) -> Result<Vec<f64>, FeatureError> {
    points
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let dt = w[1].t - w[0].t;
            if dt < 0.0 {
                Err(FeatureError::NonChronological { index: i + 1 })
            } else if !(dt > 0.0) {
                Err(FeatureError::ZeroTimeGap { index: i })
            } else {
                Ok(dt)
            }
        })
        .collect()
}

fn step_angles(points: &[TrajectoryPoint]) -> Result<Vec<f64>, FeatureError> {
    points
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let dx = w[1].x - w[0].x;
            let dy = w[1].y - w[0].y;
            if dx == 0.0 && dy == 0.0 {
                return Err(FeatureError::UndefinedHeading { index: i });
            }
            // Single-quadrant on purpose: headings are folded into (-pi/2, pi/2].
            Ok((dy / dx).atan())
        })
        .collect()
}

fn velocities(delta_r: &[f64], delta_t: &[f64]) -> Vec<f64> {
    delta_r.iter().zip(delta_t).map(|(r, t)| r / t).collect()
}

/// Euclidean length of each step
pub fn delta_r(traj: &Trajectory) -> Result<Vec<f64>, FeatureError> {
    require(&traj.points, "delta_r", 2)?;
    Ok(step_lengths(&traj.points))
}

/// Time between consecutive points; every gap must be positive
pub fn delta_t(traj: &Trajectory) -> Result<Vec<f64>, FeatureError> {
    require(&traj.points, "delta_t", 2)?;
    step_times(&traj.points)
}

/// Total path length
pub fn distance(traj: &Trajectory) -> Result<f64, FeatureError> {
    Ok(delta_r(traj)?.iter().sum())
}

pub fn velocity(traj: &Trajectory) -> Result<Vec<f64>, FeatureError> {
    require(&traj.points, "velocity", 2)?;
    Ok(velocities(&step_lengths(&traj.points), &step_times(&traj.points)?))
}

/// Relative velocity change `|v[i + 1] - v[i]| / v[i]`
pub fn velocity_rate(traj: &Trajectory) -> Result<Vec<f64>, FeatureError> {
    let vel = velocity(traj)?;
    vel.windows(2)
        .enumerate()
        .map(|(i, w)| {
            if w[0] == 0.0 {
                Err(FeatureError::ZeroVelocity { index: i })
            } else {
                Ok((w[1] - w[0]).abs() / w[0])
            }
        })
        .collect()
}

fn count_velocity_swings(vel: &[f64], threshold: f64) -> usize {
    // Same test as velocity_rate > threshold, without dividing by v[i];
    // any change out of a standstill counts.
    vel.windows(2)
        .filter(|w| (w[1] - w[0]).abs() > threshold * w[0])
        .count()
}

fn count_stops(vel: &[f64], threshold: f64) -> usize {
    vel.iter().filter(|&&v| v < threshold).count()
}

/// Number of relative velocity swings above `threshold`, per unit distance
pub fn vel_change_rate(traj: &Trajectory, threshold: f64) -> Result<f64, FeatureError> {
    let vel = velocity(traj)?;
    let distance = positive_distance(&step_lengths(&traj.points), "velocity_change_rate")?;
    Ok(count_velocity_swings(&vel, threshold) as f64 / distance)
}

/// Number of samples slower than `threshold`, per unit distance
pub fn stop_rate(traj: &Trajectory, threshold: f64) -> Result<f64, FeatureError> {
    let vel = velocity(traj)?;
    let distance = positive_distance(&step_lengths(&traj.points), "stop_rate")?;
    Ok(count_stops(&vel, threshold) as f64 / distance)
}

pub fn acceleration(traj: &Trajectory) -> Result<Vec<f64>, FeatureError> {
    require(&traj.points, "acceleration", 3)?;
    let dt = step_times(&traj.points)?;
    let vel = velocities(&step_lengths(&traj.points), &dt);
    Ok(difference_rate(&vel, &dt))
}

pub fn acceleration_change_rate(traj: &Trajectory) -> Result<Vec<f64>, FeatureError> {
    require(&traj.points, "acceleration_change_rate", 4)?;
    let dt = step_times(&traj.points)?;
    let vel = velocities(&step_lengths(&traj.points), &dt);
    let acc = difference_rate(&vel, &dt);
    Ok(difference_rate(&acc, &dt))
}

/// Heading of each step, `atan(dy / dx)`
pub fn angle(traj: &Trajectory) -> Result<Vec<f64>, FeatureError> {
    require(&traj.points, "angle", 2)?;
    step_angles(&traj.points)
}

pub fn turning_angle(traj: &Trajectory) -> Result<Vec<f64>, FeatureError> {
    require(&traj.points, "turning_angle", 3)?;
    let ang = step_angles(&traj.points)?;
    Ok(ang.windows(2).map(|w| w[1] - w[0]).collect())
}

/// `turning_angle[i] / delta_t[i]`
pub fn heading_change_rate(traj: &Trajectory) -> Result<Vec<f64>, FeatureError> {
    require(&traj.points, "heading_change_rate", 3)?;
    let dt = step_times(&traj.points)?;
    let ang = step_angles(&traj.points)?;
    Ok(difference_rate(&ang, &dt))
}

/// Rate of the heading change rate, `(hcr[i + 1] - hcr[i]) / delta_t[i]`
pub fn rate_hcr(traj: &Trajectory) -> Result<Vec<f64>, FeatureError> {
    require(&traj.points, "rate_hcr", 4)?;
    let dt = step_times(&traj.points)?;
    let hcr = difference_rate(&step_angles(&traj.points)?, &dt);
    Ok(difference_rate(&hcr, &dt))
}

/// Every derived series of one trajectory, computed in a single pass over
/// the base differences.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicSeries {
    pub delta_r: Vec<f64>,
    pub delta_t: Vec<f64>,
    /// Total path length, always positive
    pub distance: f64,
    pub velocity: Vec<f64>,
    pub acceleration: Vec<f64>,
    pub acceleration_change_rate: Vec<f64>,
    pub angle: Vec<f64>,
    pub turning_angle: Vec<f64>,
    pub heading_change_rate: Vec<f64>,
}

impl KinematicSeries {
    /// Minimum number of points for every series to be non-empty
    pub const MIN_POINTS: usize = 4;

    pub fn derive(traj: &Trajectory) -> Result<Self, FeatureError> {
        require(&traj.points, "kinematic series", Self::MIN_POINTS)?;

        let delta_t = step_times(&traj.points)?;
        let delta_r = step_lengths(&traj.points);
        let distance = positive_distance(&delta_r, "kinematic series")?;

        let velocity = velocities(&delta_r, &delta_t);
        let acceleration = difference_rate(&velocity, &delta_t);
        let acceleration_change_rate = difference_rate(&acceleration, &delta_t);

        let angle = step_angles(&traj.points)?;
        let turning_angle: Vec<f64> = angle.windows(2).map(|w| w[1] - w[0]).collect();
        let heading_change_rate = difference_rate(&angle, &delta_t);

        Ok(Self {
            delta_r,
            delta_t,
            distance,
            velocity,
            acceleration,
            acceleration_change_rate,
            angle,
            turning_angle,
            heading_change_rate,
        })
    }

    pub fn vel_change_rate(&self, threshold: f64) -> f64 {
        count_velocity_swings(&self.velocity, threshold) as f64 / self.distance
    }

    pub fn stop_rate(&self, threshold: f64) -> f64 {
        count_stops(&self.velocity, threshold) as f64 / self.distance
    }
}
