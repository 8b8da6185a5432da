use crate::core::join::{join_routes, AirportIndex};
use crate::core::source::{decode_rows, fetch_table};
use crate::core::{ConfigProvider, FlightTables, Pipeline, Storage, TransformResult};
use crate::domain::model::{Airport, Route};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;

pub struct RouteDistancePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> RouteDistancePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for RouteDistancePipeline<S, C> {
    async fn extract(&self) -> Result<FlightTables> {
        tracing::info!("✈️ Fetching airports from: {}", self.config.airports_url());
        let airports_body = fetch_table(&self.client, &self.config, self.config.airports_url()).await?;
        let (airports, skipped_airport_rows) = decode_rows::<Airport>("airports", &airports_body);

        tracing::info!("🛫 Fetching routes from: {}", self.config.routes_url());
        let routes_body = fetch_table(&self.client, &self.config, self.config.routes_url()).await?;
        let (routes, skipped_route_rows) = decode_rows::<Route>("routes", &routes_body);

        tracing::info!(
            "📊 Extracted {} airports and {} routes",
            airports.len(),
            routes.len()
        );

        Ok(FlightTables {
            airports,
            routes,
            skipped_airport_rows,
            skipped_route_rows,
        })
    }

    async fn transform(&self, data: FlightTables) -> Result<TransformResult> {
        let index = AirportIndex::build(&data.airports);
        tracing::debug!("Indexed {} airports by IATA code", index.len());

        let policy = self.config.unmatched_policy();
        let (rows, stats) = join_routes(&index, data.routes, policy)?;

        if stats.unmatched() > 0 {
            tracing::warn!(
                "⚠️ {} routes without a matching airport (source: {}, destination: {}), policy {:?}",
                stats.unmatched(),
                stats.unmatched_source,
                stats.unmatched_destination,
                policy
            );
        }

        tracing::info!(
            "🔧 Computed distances for {} of {} routes",
            stats.matched,
            stats.routes_read
        );

        Ok(TransformResult { rows, stats })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_file = self.config.output_file();
        let output_path = format!("{}/{}", self.config.output_path(), output_file);

        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &result.rows {
            writer.serialize(row)?;
        }
        let data = writer.into_inner().map_err(|e| EtlError::ProcessingError {
            message: format!("Failed to flush CSV output: {}", e.error()),
        })?;

        tracing::debug!("Writing {} rows ({} bytes) to storage", result.rows.len(), data.len());
        self.storage.write_file(output_file, &data).await?;

        tracing::info!("💾 Routes with distances saved to: {}", output_path);
        Ok(output_path)
    }
}
