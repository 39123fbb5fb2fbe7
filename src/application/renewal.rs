use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::category::RenewalBasis;
use crate::domain::ports::BudgetStoreBox;
use crate::error::{JobError, Result};

/// Outcome of one renewal pass.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct RenewalReport {
    /// Categories renewed and persisted.
    pub renewed: usize,
    /// Categories skipped because they were not due.
    pub skipped: usize,
    /// Per-category write failures. These never abort the pass.
    pub failures: Vec<RenewalFailure>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RenewalFailure {
    pub user_id: String,
    pub category_id: String,
    pub reason: String,
}

/// The balance renewal batch job.
///
/// One `run` walks every user and every category, renewing each category
/// whose due date has elapsed. The unit of failure is the individual
/// category: a failed write is recorded and the walk continues. A failed
/// collection read is fatal to the whole pass.
///
/// Overlapping invocations within one process are rejected with
/// [`JobError::AlreadyRunning`]; cross-process exclusion is the scheduler's
/// guarantee, not this job's.
pub struct RenewalJob {
    store: BudgetStoreBox,
    basis: RenewalBasis,
    running: AtomicBool,
}

impl RenewalJob {
    /// Creates a job over the given store.
    ///
    /// # Arguments
    ///
    /// * `store` - The persistence collaborator.
    /// * `basis` - Policy for computing the next due date.
    pub fn new(store: BudgetStoreBox, basis: RenewalBasis) -> Self {
        Self {
            store,
            basis,
            running: AtomicBool::new(false),
        }
    }

    /// Runs one renewal pass at the given instant.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RenewalReport> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(JobError::AlreadyRunning);
        }
        let result = self.run_inner(now).await;
        self.running.store(false, Ordering::Release);
        result
    }

    async fn run_inner(&self, now: DateTime<Utc>) -> Result<RenewalReport> {
        info!("updating balances");
        let mut report = RenewalReport::default();

        let users = self.store.list_users().await?;
        for user in &users {
            let categories = self.store.list_categories(&user.id).await?;
            for category in categories {
                let Some(update) = category.renewal(now, self.basis) else {
                    report.skipped += 1;
                    continue;
                };

                info!(
                    user = user.display_name(),
                    user_id = %user.id,
                    category_id = %category.id,
                    category = category.name.as_deref().unwrap_or(""),
                    "renewing category balance"
                );

                match self
                    .store
                    .update_category(&user.id, &category.id, update)
                    .await
                {
                    Ok(()) => report.renewed += 1,
                    Err(err) => {
                        warn!(
                            user_id = %user.id,
                            category_id = %category.id,
                            error = %err,
                            "category update failed, continuing"
                        );
                        report.failures.push(RenewalFailure {
                            user_id: user.id.clone(),
                            category_id: category.id.clone(),
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            renewed = report.renewed,
            skipped = report.skipped,
            failed = report.failures.len(),
            "renewal pass complete"
        );
        Ok(report)
    }
}
