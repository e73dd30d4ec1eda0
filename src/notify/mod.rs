//! Best-effort outbound notifications.
//!
//! Everything in here runs after the transaction that changed Job/Bid state
//! has committed, inside a spawned task. Provider failures are logged and
//! swallowed; they never fail the operation that triggered them.

pub mod email;
pub mod matching;
pub mod sms;

use uuid::Uuid;

use crate::models::users;

#[derive(Clone)]
pub struct Notifier {
    pub mailer: email::Mailer,
    pub texter: sms::Texter,
}

impl Notifier {
    pub fn from_env() -> Self {
        Self {
            mailer: email::Mailer::from_env(),
            texter: sms::Texter::from_env(),
        }
    }

    /// New in-range job posted → hauler.
    pub async fn hauler_new_job(&self, hauler: &users::Model, job_id: Uuid, distance_miles: f64) {
        let subject = format!("New Hauling Job Near You - Job #{job_id}");
        let html = format!(
            "<h2>A new job was posted {distance_miles:.0} miles from you!</h2>\
             <p>Job #{job_id} is within your travel radius. Log in to view details and place a bid.</p>"
        );
        self.mailer.send(&hauler.email, &subject, &html).await;

        if hauler.notify_sms {
            if let Some(phone) = &hauler.phone {
                let body = format!(
                    "HaulBid: New job #{job_id} posted {distance_miles:.0} miles from you! Log in to view and bid."
                );
                self.texter.send(phone, &body).await;
            }
        }
    }

    /// New bid submitted → customer.
    pub async fn customer_new_bid(
        &self,
        customer: &users::Model,
        job_id: Uuid,
        hauler_name: &str,
        quote: f64,
    ) {
        let subject = format!("New Bid on Your Hauling Job #{job_id}");
        let html = format!(
            "<h2>You have a new bid!</h2>\
             <p><strong>{hauler_name}</strong> has submitted a bid of <strong>${quote:.2}</strong> \
             for your hauling job #{job_id}.</p>\
             <p>Log in to review and accept bids.</p>"
        );
        self.mailer.send(&customer.email, &subject, &html).await;

        if customer.notify_sms {
            if let Some(phone) = &customer.phone {
                let body = format!(
                    "HaulBid: {hauler_name} bid ${quote:.2} on your job #{job_id}. Log in to review bids!"
                );
                self.texter.send(phone, &body).await;
            }
        }
    }

    /// Bid accepted → hauler. The pickup address stays hidden until the
    /// deposit is paid, so this message only announces the win.
    pub async fn hauler_bid_accepted(&self, hauler: &users::Model, job_id: Uuid, quote: f64) {
        let subject = format!("Your Bid Was Accepted - Job #{job_id}");
        let html = format!(
            "<h2>Congratulations! Your bid was accepted!</h2>\
             <p>The customer has accepted your bid of <strong>${quote:.2}</strong> for Job #{job_id}.</p>\
             <p>Once the customer pays the deposit, you'll be able to see the pickup address in your dashboard.</p>"
        );
        self.mailer.send(&hauler.email, &subject, &html).await;

        if hauler.notify_sms {
            if let Some(phone) = &hauler.phone {
                let body = format!(
                    "HaulBid: Your bid on job #{job_id} was accepted! Log in to see details."
                );
                self.texter.send(phone, &body).await;
            }
        }
    }

    /// Deposit paid → hauler, now including the unlocked pickup address.
    pub async fn hauler_deposit_paid(
        &self,
        hauler: &users::Model,
        job_id: Uuid,
        pickup_address: &str,
        pickup_zip: &str,
    ) {
        let subject = format!("Deposit Paid - Job #{job_id} Ready to Go!");
        let html = format!(
            "<h2>Great news! The deposit has been paid!</h2>\
             <p>The customer has paid the deposit for Job #{job_id}. You can now view the pickup \
             address and complete the job.</p>\
             <p><strong>Pickup Address:</strong><br>{pickup_address}<br>{pickup_zip}</p>"
        );
        self.mailer.send(&hauler.email, &subject, &html).await;

        if hauler.notify_sms {
            if let Some(phone) = &hauler.phone {
                let body = format!(
                    "HaulBid: Deposit paid for job #{job_id}! Log in to see the pickup address and get directions."
                );
                self.texter.send(phone, &body).await;
            }
        }
    }
}
