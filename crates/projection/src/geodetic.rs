//! Geodetic direct and inverse problems on an ellipsoid of revolution.
//!
//! Both directions use Vincenty's iterative formulae, which are accurate to
//! well under a millimeter on WGS84 for the ranges a weather radar covers.
//! A sphere is handled as the flattening-zero special case.
//!
//! Conventions:
//! - Angles are degrees; bearings are clockwise from true north.
//! - Returned bearings lie in `(-180, 180]`, longitudes in `[-180, 180]`.
//! - Distances are meters along the geodesic.

use radar_common::{GeoPoint, SensorOrigin};

use crate::error::{ProjectionError, ProjectionResult};

/// Convergence threshold on the iterated angle, radians (~6 µm on Earth).
const CONVERGENCE: f64 = 1e-12;

/// Iteration cap for the direct problem.
const MAX_DIRECT_ITERATIONS: usize = 100;

/// Iteration cap for the inverse problem; exceeded only near antipodes.
const MAX_INVERSE_ITERATIONS: usize = 200;

/// Reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Equatorial radius in meters
    pub semi_major_axis: f64,
    /// Flattening `(a - b) / a`; zero for a sphere
    pub flattening: f64,
}

impl Ellipsoid {
    /// WGS84, the datum radar products are georeferenced against.
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major_axis: 6_378_137.0,
        flattening: 1.0 / 298.257_223_563,
    };

    /// Mean Earth radius used by spherical approximations.
    pub const MEAN_EARTH_RADIUS: f64 = 6_371_008.8;

    /// A sphere of the given radius.
    pub fn sphere(radius: f64) -> Self {
        Self {
            semi_major_axis: radius,
            flattening: 0.0,
        }
    }

    /// Polar radius in meters.
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.flattening)
    }

    /// Solve the direct problem: travel `distance` meters from `origin` at
    /// initial `bearing` degrees.
    pub fn destination(
        &self,
        origin: GeoPoint,
        bearing: f64,
        distance: f64,
    ) -> ProjectionResult<GeoPoint> {
        check_point(origin)?;
        if !bearing.is_finite() {
            return Err(ProjectionError::NonFinite("bearing"));
        }
        if !distance.is_finite() {
            return Err(ProjectionError::NonFinite("distance"));
        }
        if distance < 0.0 {
            return Err(ProjectionError::NegativeDistance(distance));
        }
        if distance == 0.0 {
            return Ok(origin);
        }

        let a = self.semi_major_axis;
        let b = self.semi_minor_axis();
        let f = self.flattening;

        let alpha1 = bearing.to_radians();
        let (sin_alpha1, cos_alpha1) = alpha1.sin_cos();

        let tan_u1 = (1.0 - f) * origin.lat.to_radians().tan();
        let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
        let sin_u1 = tan_u1 * cos_u1;

        let sigma1 = tan_u1.atan2(cos_alpha1);
        let sin_alpha = cos_u1 * sin_alpha1;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
        let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

        let first_sigma = distance / (b * big_a);
        let mut sigma = first_sigma;
        let mut converged = false;

        for _ in 0..MAX_DIRECT_ITERATIONS {
            let (sin_sigma, cos_sigma) = sigma.sin_cos();
            let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
            let delta_sigma = series_delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m);
            let next = first_sigma + delta_sigma;
            let done = (next - sigma).abs() < CONVERGENCE;
            sigma = next;
            if done {
                converged = true;
                break;
            }
        }

        if !converged {
            return Err(ProjectionError::NoConvergence {
                iterations: MAX_DIRECT_ITERATIONS,
            });
        }

        let (sin_sigma, cos_sigma) = sigma.sin_cos();
        let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();

        let x = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
        let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
            .atan2((1.0 - f) * (sin_alpha * sin_alpha + x * x).sqrt());
        let lambda = (sin_sigma * sin_alpha1)
            .atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let l = lambda
            - (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        let lon2 = normalize_longitude(origin.lon + l.to_degrees());
        Ok(GeoPoint::new(lon2, lat2.to_degrees()))
    }

    /// Solve the inverse problem: initial bearing (degrees) and distance
    /// (meters) of the geodesic from `from` to `to`.
    pub fn inverse(&self, from: GeoPoint, to: GeoPoint) -> ProjectionResult<(f64, f64)> {
        check_point(from)?;
        check_point(to)?;

        let a = self.semi_major_axis;
        let b = self.semi_minor_axis();
        let f = self.flattening;

        let l = (to.lon - from.lon).to_radians();
        let u1 = ((1.0 - f) * from.lat.to_radians().tan()).atan();
        let u2 = ((1.0 - f) * to.lat.to_radians().tan()).atan();
        let (sin_u1, cos_u1) = u1.sin_cos();
        let (sin_u2, cos_u2) = u2.sin_cos();

        let mut lambda = l;
        let mut state = None;

        for _ in 0..MAX_INVERSE_ITERATIONS {
            let (sin_lambda, cos_lambda) = lambda.sin_cos();
            let cross = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
            let sin_sigma = ((cos_u2 * sin_lambda).powi(2) + cross * cross).sqrt();
            if sin_sigma == 0.0 {
                // Coincident points.
                return Ok((0.0, 0.0));
            }
            let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
            let sigma = sin_sigma.atan2(cos_sigma);
            let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
            let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
            // Equatorial geodesics have cos²α = 0.
            let cos_2sigma_m = if cos_sq_alpha != 0.0 {
                cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
            } else {
                0.0
            };
            let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
            let previous = lambda;
            lambda = l
                + (1.0 - c)
                    * f
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma
                            * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

            if (lambda - previous).abs() < CONVERGENCE {
                state = Some((sin_sigma, cos_sigma, sigma, cos_sq_alpha, cos_2sigma_m));
                break;
            }
        }

        let (sin_sigma, cos_sigma, sigma, cos_sq_alpha, cos_2sigma_m) =
            state.ok_or(ProjectionError::NoConvergence {
                iterations: MAX_INVERSE_ITERATIONS,
            })?;

        let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
        let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
        let delta_sigma = series_delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m);
        let distance = b * big_a * (sigma - delta_sigma);

        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let alpha1 = (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);

        Ok((normalize_bearing(alpha1.to_degrees()), distance))
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

/// Vincenty's Δσ series term, shared by both problems.
fn series_delta_sigma(big_b: f64, sin_sigma: f64, cos_sigma: f64, cos_2sigma_m: f64) -> f64 {
    let c2 = cos_2sigma_m * cos_2sigma_m;
    big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * c2)
                    - big_b / 6.0 * cos_2sigma_m * (-3.0 + 4.0 * sin_sigma * sin_sigma) * (-3.0 + 4.0 * c2)))
}

fn check_point(point: GeoPoint) -> ProjectionResult<()> {
    if !point.lon.is_finite() || !point.lat.is_finite() {
        return Err(ProjectionError::NonFinite("coordinate"));
    }
    if point.lat.abs() > 90.0 {
        return Err(ProjectionError::LatitudeOutOfRange(point.lat));
    }
    Ok(())
}

/// Wrap a longitude into `[-180, 180]`.
pub fn normalize_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// Wrap a bearing into `(-180, 180]`.
pub fn normalize_bearing(bearing: f64) -> f64 {
    let wrapped = bearing.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Stateful calculator with a fixed starting point.
///
/// The sweep origin is set once and then queried for every cell corner, so
/// the calculator keeps the origin and ellipsoid together.
#[derive(Debug, Clone, Copy)]
pub struct GeodeticCalculator {
    ellipsoid: Ellipsoid,
    origin: GeoPoint,
}

impl GeodeticCalculator {
    /// Calculator on WGS84 starting at `origin`.
    pub fn new(origin: SensorOrigin) -> Self {
        Self::with_ellipsoid(origin, Ellipsoid::WGS84)
    }

    pub fn with_ellipsoid(origin: SensorOrigin, ellipsoid: Ellipsoid) -> Self {
        Self {
            ellipsoid,
            origin: origin.as_point(),
        }
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Point reached from the origin at `bearing` degrees after `distance` meters.
    pub fn destination(&self, bearing: f64, distance: f64) -> ProjectionResult<GeoPoint> {
        self.ellipsoid.destination(self.origin, bearing, distance)
    }

    /// Bearing and distance from the origin to `point`.
    pub fn bearing_distance_to(&self, point: GeoPoint) -> ProjectionResult<(f64, f64)> {
        self.ellipsoid.inverse(self.origin, point)
    }
}

/// One-shot direct problem on WGS84, returning `(lon, lat)`.
pub fn destination(
    origin_lon: f64,
    origin_lat: f64,
    bearing: f64,
    distance: f64,
) -> ProjectionResult<(f64, f64)> {
    let point = Ellipsoid::WGS84.destination(GeoPoint::new(origin_lon, origin_lat), bearing, distance)?;
    Ok((point.lon, point.lat))
}

/// One-shot inverse problem on WGS84, returning `(bearing, distance)`.
pub fn inverse(from: GeoPoint, to: GeoPoint) -> ProjectionResult<(f64, f64)> {
    Ellipsoid::WGS84.inverse(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_zero_distance_returns_origin() {
        let p = Ellipsoid::WGS84
            .destination(GeoPoint::new(-97.5, 35.0), 45.0, 0.0)
            .unwrap();
        assert_eq!(p, GeoPoint::new(-97.5, 35.0));
    }

    #[test]
    fn test_negative_distance_rejected() {
        let err = destination(0.0, 0.0, 10.0, -1.0).unwrap_err();
        assert!(matches!(err, ProjectionError::NegativeDistance(_)));
    }

    #[test]
    fn test_due_north_on_sphere_matches_arc_length() {
        let r = Ellipsoid::MEAN_EARTH_RADIUS;
        let sphere = Ellipsoid::sphere(r);
        // One degree of arc.
        let d = r * PI / 180.0;
        let p = sphere.destination(GeoPoint::new(10.0, 0.0), 0.0, d).unwrap();
        assert!((p.lat - 1.0).abs() < 1e-9, "lat {}", p.lat);
        assert!((p.lon - 10.0).abs() < 1e-9, "lon {}", p.lon);
    }

    #[test]
    fn test_due_east_on_equator() {
        let p = Ellipsoid::WGS84
            .destination(GeoPoint::new(0.0, 0.0), 90.0, 111_319.490_793)
            .unwrap();
        // One degree of longitude at the equator on WGS84.
        assert!((p.lon - 1.0).abs() < 1e-6, "lon {}", p.lon);
        assert!(p.lat.abs() < 1e-9, "lat {}", p.lat);
    }

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(0.0), 0.0);
        assert_eq!(normalize_longitude(180.0), 180.0);
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(540.0), 180.0);
    }

    #[test]
    fn test_normalize_bearing() {
        assert_eq!(normalize_bearing(270.0), -90.0);
        assert_eq!(normalize_bearing(-180.0), 180.0);
        assert_eq!(normalize_bearing(45.0), 45.0);
    }

    #[test]
    fn test_inverse_coincident_points() {
        let p = GeoPoint::new(12.0, 48.0);
        assert_eq!(inverse(p, p).unwrap(), (0.0, 0.0));
    }
}
