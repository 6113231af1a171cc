//! Output artifact port trait.

use crate::domain::analysis::FrontierAnalysis;
use crate::domain::error::FrontierError;
use std::path::Path;

/// Port for writing a finished analysis to disk.
pub trait ReportPort {
    fn write(&self, analysis: &FrontierAnalysis, output_path: &Path) -> Result<(), FrontierError>;
}
