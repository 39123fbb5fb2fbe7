use crate::domain::category::{Category, CategoryUpdate};
use crate::domain::ports::BudgetStore;
use crate::domain::user::User;
use crate::error::{JobError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory budget store.
///
/// Users keep their insertion order; each user's categories keep theirs.
/// Backs the CLI and the test suite; the production document store is an
/// external collaborator behind the same port.
#[derive(Default, Clone)]
pub struct InMemoryBudgetStore {
    users: Arc<RwLock<Vec<User>>>,
    categories: Arc<RwLock<HashMap<String, Vec<Category>>>>,
}

impl InMemoryBudgetStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        let mut users = self.users.write().await;
        users.push(user);
    }

    pub async fn insert_category(&self, user_id: &str, category: Category) {
        let mut categories = self.categories.write().await;
        categories.entry(user_id.to_string()).or_default().push(category);
    }

    /// Returns every user with its categories, for output and assertions.
    pub async fn snapshot(&self) -> Vec<(User, Vec<Category>)> {
        let users = self.users.read().await;
        let categories = self.categories.read().await;
        users
            .iter()
            .map(|user| {
                let cats = categories.get(&user.id).cloned().unwrap_or_default();
                (user.clone(), cats)
            })
            .collect()
    }
}

#[async_trait]
impl BudgetStore for InMemoryBudgetStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.clone())
    }

    async fn list_categories(&self, user_id: &str) -> Result<Vec<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(user_id).cloned().unwrap_or_default())
    }

    async fn update_category(
        &self,
        user_id: &str,
        category_id: &str,
        update: CategoryUpdate,
    ) -> Result<()> {
        let mut categories = self.categories.write().await;
        let category = categories
            .get_mut(user_id)
            .and_then(|cats| cats.iter_mut().find(|c| c.id == category_id))
            .ok_or_else(|| {
                JobError::Store(format!(
                    "no category {category_id} under user {user_id}"
                ))
            })?;
        category.apply(update);
        Ok(())
    }
}
