//! JSON report adapter.

use std::fs;
use std::path::Path;

use crate::contract::SimulationResponse;
use crate::domain::error::TradelabError;
use crate::ports::report_port::ReportPort;

pub struct JsonReportAdapter;

impl ReportPort for JsonReportAdapter {
    fn write(
        &self,
        response: &SimulationResponse,
        output_path: &Path,
    ) -> Result<(), TradelabError> {
        let json =
            serde_json::to_string_pretty(response).map_err(|e| TradelabError::Data {
                reason: format!("failed to serialize report: {e}"),
            })?;
        fs::write(output_path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{SimulationRequest, simulate};
    use tempfile::TempDir;

    #[test]
    fn writes_parseable_report() {
        let request = SimulationRequest {
            seed: Some(5),
            ..SimulationRequest::default()
        };
        let response = simulate(&request).unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        JsonReportAdapter.write(&response, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: SimulationResponse = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.equity_curve.len(), response.equity_curve.len());
        assert_eq!(parsed.trade_summary.count, response.trade_summary.count);
    }
}
