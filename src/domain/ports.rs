use crate::domain::model::{FlightTables, TransformResult, UnmatchedPolicy};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn airports_url(&self) -> &str;
    fn routes_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn unmatched_policy(&self) -> UnmatchedPolicy;

    fn request_timeout_seconds(&self) -> Option<u64> {
        None
    }

    fn request_headers(&self) -> Option<&HashMap<String, String>> {
        None
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<FlightTables>;
    async fn transform(&self, data: FlightTables) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
