use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default location of the OpenFlights airports table.
pub const OPENFLIGHTS_AIRPORTS_URL: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/airports.dat";

/// Default location of the OpenFlights routes table.
pub const OPENFLIGHTS_ROUTES_URL: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/routes.dat";

/// Downloads one table body. Non-success statuses are errors; there is no retry.
pub async fn fetch_table<C: ConfigProvider>(client: &Client, config: &C, url: &str) -> Result<Vec<u8>> {
    let mut request = client.get(url);

    if let Some(headers) = config.request_headers() {
        for (key, value) in headers {
            request = request.header(key, value);
        }
    }

    if let Some(timeout) = config.request_timeout_seconds() {
        request = request.timeout(Duration::from_secs(timeout));
    }

    tracing::debug!("Making request to: {}", url);
    let response = request.send().await?;
    let status = response.status();
    tracing::debug!("Response status: {}", status);

    if !status.is_success() {
        return Err(EtlError::HttpStatusError {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    tracing::debug!("Downloaded {} bytes from {}", body.len(), url);
    Ok(body.to_vec())
}

/// Decodes a headerless OpenFlights table. Rows that do not decode are
/// skipped and counted.
pub fn decode_rows<T: DeserializeOwned>(table: &str, data: &[u8]) -> (Vec<T>, usize) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut rows = Vec::new();
    let mut skipped = 0;

    for (line, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                skipped += 1;
                tracing::debug!("Skipping {} row {}: {}", table, line + 1, e);
            }
        }
    }

    if skipped > 0 {
        tracing::warn!("⚠️ Skipped {} malformed {} rows", skipped, table);
    }

    (rows, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Airport, Route};

    #[test]
    fn test_decode_rows_counts_skipped() {
        let data = b"BA,1355,LHR,507,JFK,3797,,0,744\nBA,oops,LHR,507,JFK,3797,,0,744\nAA,24,JFK,3797,LHR,507,,0,777\n";
        let (routes, skipped): (Vec<Route>, usize) = decode_rows("routes", data);
        assert_eq!(routes.len(), 2);
        assert_eq!(skipped, 1);
        assert_eq!(routes[1].airline, "AA");
    }

    #[test]
    fn test_decode_rows_empty_body() {
        let (airports, skipped): (Vec<Airport>, usize) = decode_rows("airports", b"");
        assert!(airports.is_empty());
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_decode_rows_bad_latitude_is_skipped() {
        let data = br#"1,"Somewhere","Town","Country","ABC","ABCD",north,1.0,0,0,"U",\N,"airport","OurAirports""#;
        let (airports, skipped): (Vec<Airport>, usize) = decode_rows("airports", data);
        assert!(airports.is_empty());
        assert_eq!(skipped, 1);
    }
}
