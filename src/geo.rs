use moka::future::Cache;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use std::sync::Arc;

use crate::models::zip_codes;

/// Mean Earth radius in miles, matching the travel-radius unit used by haulers.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Great-circle distance between two coordinates, in miles.
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}

/// ZIP → centroid lookup over the `zip_codes` reference table.
///
/// The table is seeded once and read-only, so lookups are cached in-process
/// with a generous TTL.
#[derive(Clone)]
pub struct GeoIndex {
    coords: Arc<Cache<String, (f64, f64)>>,
}

impl GeoIndex {
    pub fn new() -> Self {
        let coords = Arc::new(
            Cache::builder()
                .time_to_live(std::time::Duration::from_secs(24 * 3600))
                .max_capacity(50_000)
                .build(),
        );
        Self { coords }
    }

    /// Centroid coordinates for a ZIP, or `None` if the ZIP is unknown.
    pub async fn coords(
        &self,
        db: &DatabaseConnection,
        zip: &str,
    ) -> Result<Option<(f64, f64)>, DbErr> {
        if let Some(cached) = self.coords.get(zip).await {
            return Ok(Some(cached));
        }

        match zip_codes::Entity::find_by_id(zip.to_owned()).one(db).await? {
            Some(row) => {
                self.coords.insert(zip.to_owned(), (row.lat, row.lon)).await;
                Ok(Some((row.lat, row.lon)))
            }
            None => Ok(None),
        }
    }

    /// Straight-line distance in miles between two ZIP centroids, or `None`
    /// if either ZIP is unknown.
    pub async fn distance_between(
        &self,
        db: &DatabaseConnection,
        zip_a: &str,
        zip_b: &str,
    ) -> Result<Option<f64>, DbErr> {
        let Some((lat_a, lon_a)) = self.coords(db, zip_a).await? else {
            return Ok(None);
        };
        let Some((lat_b, lon_b)) = self.coords(db, zip_b).await? else {
            return Ok(None);
        };
        Ok(Some(haversine_miles(lat_a, lon_a, lat_b, lon_b)))
    }

    pub async fn is_known_zip(&self, db: &DatabaseConnection, zip: &str) -> Result<bool, DbErr> {
        Ok(self.coords(db, zip).await?.is_some())
    }
}

impl Default for GeoIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Basic shape check before hitting the reference table: exactly five ASCII
/// digits.
pub fn is_valid_zip_format(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Centroids used in the tests below:
    // 55101 — St. Paul, MN
    const ST_PAUL: (f64, f64) = (44.9550, -93.0900);
    // 55102 — St. Paul, MN (adjacent neighbourhood)
    const ST_PAUL_W7: (f64, f64) = (44.9322, -93.1209);
    // 54701 — Eau Claire, WI
    const EAU_CLAIRE: (f64, f64) = (44.7740, -91.4350);

    #[test]
    fn distance_to_self_is_zero() {
        let d = haversine_miles(ST_PAUL.0, ST_PAUL.1, ST_PAUL.0, ST_PAUL.1);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_miles(ST_PAUL.0, ST_PAUL.1, EAU_CLAIRE.0, EAU_CLAIRE.1);
        let ba = haversine_miles(EAU_CLAIRE.0, EAU_CLAIRE.1, ST_PAUL.0, ST_PAUL.1);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn adjacent_st_paul_zips_are_close() {
        let d = haversine_miles(ST_PAUL.0, ST_PAUL.1, ST_PAUL_W7.0, ST_PAUL_W7.1);
        assert!(d < 5.0, "expected a couple of miles, got {d}");
    }

    #[test]
    fn eau_claire_is_roughly_eighty_miles_from_st_paul() {
        let d = haversine_miles(ST_PAUL.0, ST_PAUL.1, EAU_CLAIRE.0, EAU_CLAIRE.1);
        assert!((75.0..95.0).contains(&d), "got {d}");
    }

    #[test]
    fn zip_format_check() {
        assert!(is_valid_zip_format("55101"));
        assert!(!is_valid_zip_format("5510"));
        assert!(!is_valid_zip_format("551011"));
        assert!(!is_valid_zip_format("55l01"));
        assert!(!is_valid_zip_format(""));
    }
}
