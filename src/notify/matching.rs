//! Proximity matching: when a job is created, find every hauler whose travel
//! radius covers the pickup ZIP and notify each of them.

use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::db::users as user_db;
use crate::geo::GeoIndex;
use crate::models::jobs;
use crate::models::users::{self, Role};
use crate::notify::Notifier;

/// A hauler is a fan-out candidate when their profile has everything needed
/// to compute range and deliver email: home ZIP, travel radius, a registered
/// email, and new-job notifications still enabled.
pub fn is_candidate(user: &users::Model) -> bool {
    user.role == Role::Hauler
        && user.notify_new_jobs
        && user.home_zip.is_some()
        && user.max_travel_miles.is_some()
        && !user.email.is_empty()
}

pub fn in_range(distance_miles: f64, max_travel_miles: i32) -> bool {
    distance_miles <= f64::from(max_travel_miles)
}

/// Fan out "new job near you" notifications to every in-range hauler.
///
/// Runs in a spawned task after the job-creation transaction commits. Each
/// hauler is handled in isolation: an unresolvable ZIP or provider error
/// skips that hauler and moves on.
pub async fn notify_haulers_for_job(
    db: DatabaseConnection,
    geo: GeoIndex,
    notifier: Notifier,
    job: jobs::Model,
) {
    let haulers = match user_db::get_haulers(&db).await {
        Ok(haulers) => haulers,
        Err(e) => {
            error!("Job {} fan-out aborted, could not list haulers: {e}", job.id);
            return;
        }
    };

    let mut notified = 0usize;
    for hauler in haulers.iter().filter(|h| is_candidate(h)) {
        let (Some(home_zip), Some(radius)) = (hauler.home_zip.as_deref(), hauler.max_travel_miles)
        else {
            continue;
        };

        match geo.distance_between(&db, home_zip, &job.pickup_zip).await {
            Ok(Some(distance)) if in_range(distance, radius) => {
                notifier.hauler_new_job(hauler, job.id, distance).await;
                notified += 1;
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!(
                    "Skipping hauler {} in job {} fan-out: unknown ZIP pair ({home_zip}, {})",
                    hauler.id, job.id, job.pickup_zip
                );
            }
            Err(e) => {
                warn!("Skipping hauler {} in job {} fan-out: {e}", hauler.id, job.id);
            }
        }
    }

    info!("Job {} fan-out complete, notified {notified} hauler(s)", job.id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn hauler() -> users::Model {
        users::Model {
            id: Uuid::new_v4(),
            email: "hauler@example.com".to_string(),
            display_name: Some("Hauler".to_string()),
            avatar_url: None,
            phone: None,
            role: Role::Hauler,
            home_zip: Some("55102".to_string()),
            max_travel_miles: Some(20),
            notify_new_jobs: true,
            notify_sms: false,
            agreed_to_hauler_terms: true,
            agreed_to_hauler_terms_at: None,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn complete_hauler_profile_is_a_candidate() {
        assert!(is_candidate(&hauler()));
    }

    #[test]
    fn missing_home_zip_disqualifies() {
        let mut h = hauler();
        h.home_zip = None;
        assert!(!is_candidate(&h));
    }

    #[test]
    fn missing_radius_disqualifies() {
        let mut h = hauler();
        h.max_travel_miles = None;
        assert!(!is_candidate(&h));
    }

    #[test]
    fn opt_out_disqualifies() {
        let mut h = hauler();
        h.notify_new_jobs = false;
        assert!(!is_candidate(&h));
    }

    #[test]
    fn customers_are_never_candidates() {
        let mut h = hauler();
        h.role = Role::Customer;
        assert!(!is_candidate(&h));
    }

    #[test]
    fn range_check_is_inclusive() {
        assert!(in_range(20.0, 20));
        assert!(in_range(0.0, 1));
        assert!(!in_range(20.01, 20));
        assert!(!in_range(85.0, 1));
    }
}
