use crate::domain::category::Category;
use crate::domain::user::User;
use crate::error::Result;
use crate::infrastructure::in_memory::InMemoryBudgetStore;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// A user document with its embedded category sub-collection, as it appears
/// in fixture files and in the CLI's snapshot output.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct UserDocument {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// The full two-level hierarchy: users owning categories.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Fixture {
    pub users: Vec<UserDocument>,
}

impl Fixture {
    /// Seeds an in-memory store with every user and category in the fixture.
    pub async fn into_store(self) -> InMemoryBudgetStore {
        let store = InMemoryBudgetStore::new();
        for document in self.users {
            let user_id = document.user.id.clone();
            store.insert_user(document.user).await;
            for category in document.categories {
                store.insert_category(&user_id, category).await;
            }
        }
        store
    }

    /// Rebuilds a fixture from a store snapshot, for output.
    pub fn from_snapshot(snapshot: Vec<(User, Vec<Category>)>) -> Self {
        Self {
            users: snapshot
                .into_iter()
                .map(|(user, categories)| UserDocument { user, categories })
                .collect(),
        }
    }
}

/// Reads a fixture from a JSON source.
pub struct FixtureReader<R: Read> {
    source: R,
}

impl<R: Read> FixtureReader<R> {
    /// Creates a new `FixtureReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn fixture(self) -> Result<Fixture> {
        Ok(serde_json::from_reader(self.source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Interval;
    use crate::domain::ports::BudgetStore;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_fixture_round_trip_into_store() {
        let data = r#"{
            "users": [
                {
                    "id": "u1",
                    "name": "Alice",
                    "categories": [
                        {
                            "id": "groceries",
                            "name": "Groceries",
                            "balance": 100,
                            "budget": 50,
                            "interval": "month",
                            "nextUpdate": "2024-06-14T00:00:00Z"
                        },
                        {
                            "id": "rainy-day",
                            "balance": 0,
                            "budget": 25
                        }
                    ]
                },
                { "id": "u2" }
            ]
        }"#;

        let fixture = FixtureReader::new(data.as_bytes()).fixture().unwrap();
        assert_eq!(fixture.users.len(), 2);

        let store = fixture.into_store().await;
        let users = store.list_users().await.unwrap();
        assert_eq!(users[0].display_name(), "Alice");
        assert_eq!(users[1].display_name(), "u2");

        let categories = store.list_categories("u1").await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].balance, dec!(100));
        assert_eq!(categories[1].interval, Interval::Month);
        assert_eq!(categories[1].next_update, None);
    }

    #[test]
    fn test_malformed_fixture_is_an_error() {
        let reader = FixtureReader::new("{\"users\": 42}".as_bytes());
        assert!(reader.fixture().is_err());
    }

    #[tokio::test]
    async fn test_from_snapshot_mirrors_store_contents() {
        let data = r#"{"users":[{"id":"u1","categories":[{"id":"c1","balance":1,"budget":2}]}]}"#;
        let fixture = FixtureReader::new(data.as_bytes()).fixture().unwrap();
        let store = fixture.clone().into_store().await;

        let rebuilt = Fixture::from_snapshot(store.snapshot().await);
        assert_eq!(rebuilt, fixture);
    }
}
