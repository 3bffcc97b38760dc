//! Report output port trait.

use std::path::Path;

use crate::contract::SimulationResponse;
use crate::domain::error::TradelabError;

/// Port for writing simulation reports.
pub trait ReportPort {
    fn write(
        &self,
        response: &SimulationResponse,
        output_path: &Path,
    ) -> Result<(), TradelabError>;
}
