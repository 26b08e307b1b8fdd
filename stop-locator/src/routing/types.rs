//! Wire types for the routing table service.

use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

use crate::domain::Coordinate;

use super::error::RoutingServiceError;

/// One origin, many destinations, bounded by a cap.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    pub origin: Coordinate,
    destinations: Vec<Coordinate>,
}

impl RouteQuery {
    /// Build a query, keeping at most `cap` destinations.
    pub fn new(origin: Coordinate, destinations: &[Coordinate], cap: usize) -> Self {
        let kept = destinations.len().min(cap);
        Self {
            origin,
            destinations: destinations[..kept].to_vec(),
        }
    }

    pub fn destinations(&self) -> &[Coordinate] {
        &self.destinations
    }

    /// Number of destinations actually sent.
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// `{lon},{lat};{lon},{lat};...` with the origin first.
    pub fn coordinates_path(&self) -> String {
        std::iter::once(&self.origin)
            .chain(&self.destinations)
            .map(Coordinate::to_lon_lat)
            .collect::<Vec<_>>()
            .join(";")
    }

    /// `1;2;...;N`, the destination indices within the coordinate path.
    pub fn destination_indices(&self) -> String {
        (1..=self.destinations.len())
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Raw table response.
///
/// Only `code` and the first row of `distances` are used. Individual cells
/// may be `null` when the service found no route. A cell that is not a
/// parseable number becomes `None` instead of failing the whole body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableResponse {
    pub code: String,

    #[serde(default, deserialize_with = "lenient_rows")]
    pub distances: Option<Vec<Vec<Option<f64>>>>,

    #[serde(default)]
    pub message: Option<String>,
}

/// Read every cell as raw JSON text and parse it on its own.
///
/// Out-of-range literals such as `1e999` parse to infinity here rather than
/// erroring inside the JSON parser; `into_distances_km` drops them.
fn lenient_rows<'de, D>(deserializer: D) -> Result<Option<Vec<Vec<Option<f64>>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Option::<Vec<Vec<Box<RawValue>>>>::deserialize(deserializer)?;
    Ok(rows.map(|rows| {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.get().parse::<f64>().ok()).collect())
            .collect()
    }))
}

impl TableResponse {
    /// A successful response with a single row of meter values.
    pub fn ok(row: Vec<Option<f64>>) -> Self {
        Self {
            code: "Ok".to_string(),
            distances: Some(vec![row]),
            message: None,
        }
    }

    /// Validate and convert the first row to kilometres.
    ///
    /// The whole response is rejected if the code is not `Ok` or the row
    /// length differs from `expected`. Individual cells that are missing,
    /// non-finite or negative become `None` without affecting the others.
    pub fn into_distances_km(
        self,
        expected: usize,
    ) -> Result<Vec<Option<f64>>, RoutingServiceError> {
        if self.code != "Ok" {
            let detail = self.message.unwrap_or_default();
            return Err(RoutingServiceError::MalformedResponse(format!(
                "code {} {detail}",
                self.code
            )));
        }

        let row = self
            .distances
            .and_then(|rows| rows.into_iter().next())
            .ok_or_else(|| RoutingServiceError::MalformedResponse("missing distances".into()))?;

        if row.len() != expected {
            return Err(RoutingServiceError::MalformedResponse(format!(
                "expected {expected} distances, got {}",
                row.len()
            )));
        }

        Ok(row
            .into_iter()
            .map(|cell| {
                cell.filter(|meters| meters.is_finite() && *meters >= 0.0)
                    .map(|meters| meters / 1000.0)
            })
            .collect())
    }
}
