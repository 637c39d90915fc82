use crate::domain::model::RunSummary;
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Pipeline: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self) -> Result<RunSummary>;
}
