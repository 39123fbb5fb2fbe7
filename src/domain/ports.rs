use super::category::{Category, CategoryUpdate};
use super::user::User;
use crate::error::Result;
use async_trait::async_trait;

/// The persistence collaborator consumed by the renewal job.
///
/// Implementations provide access to the user collection and the per-user
/// category sub-collections. The job receives a boxed store at construction
/// time so it can be exercised against a fake in tests.
#[async_trait]
pub trait BudgetStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn list_categories(&self, user_id: &str) -> Result<Vec<Category>>;
    /// Persists both renewed fields of one category as a single update.
    async fn update_category(
        &self,
        user_id: &str,
        category_id: &str,
        update: CategoryUpdate,
    ) -> Result<()>;
}

pub type BudgetStoreBox = Box<dyn BudgetStore>;
