// Key-value store for user preferences
use async_trait::async_trait;

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}
