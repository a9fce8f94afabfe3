//! The uniform success/failure response every analysis returns.
//!
//! On the wire a success is
//! `{"success": true, "analysis_type", "metadata": {<params>, "generated_at"}, "data", "summary"}`
//! and a failure is `{"success": false, "error", "data": [], "summary": {}}`.

use std::fmt;

use chrono::{DateTime, Local};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::AnalysisError;

/// Names of the analyses, as they appear in `analysis_type` and in Export-All keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    SupplyVsDemand,
    ConversionEfficiency,
    RegionalDynamics,
    LongitudinalEvolution,
    AgentShare,
    AgentDistribution,
    TopPorts,
    SpeciesByAgentBreakdown,
    SeasonalContext,
    PlantCapacityAnalysis,
}

impl AnalysisKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisKind::SupplyVsDemand => "supply_vs_demand",
            AnalysisKind::ConversionEfficiency => "conversion_efficiency",
            AnalysisKind::RegionalDynamics => "regional_dynamics",
            AnalysisKind::LongitudinalEvolution => "longitudinal_evolution",
            AnalysisKind::AgentShare => "agent_share",
            AnalysisKind::AgentDistribution => "agent_distribution",
            AnalysisKind::TopPorts => "top_ports",
            AnalysisKind::SpeciesByAgentBreakdown => "species_by_agent_breakdown",
            AnalysisKind::SeasonalContext => "seasonal_context",
            AnalysisKind::PlantCapacityAnalysis => "plant_capacity_analysis",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Call parameters plus the generation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    /// The call's parameters, keyed by parameter name.
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
    pub generated_at: DateTime<Local>,
}

impl Metadata {
    /// Capture `params` (any serializable struct) and stamp the current local time.
    pub fn new<P: Serialize>(params: &P) -> Self {
        let params = match serde_json::to_value(params) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        Self {
            params,
            generated_at: Local::now(),
        }
    }
}

/// A successful analysis: ordered rows and a summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Report<R, S> {
    pub analysis_type: AnalysisKind,
    pub metadata: Metadata,
    pub data: Vec<R>,
    pub summary: S,
}

/// A business-level failure: the analysis could not produce rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub analysis_type: AnalysisKind,
    pub error: AnalysisError,
}

/// Outcome of one analysis call. Callers check the variant instead of catching errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<R, S> {
    Success(Report<R, S>),
    Failure(Failure),
}

impl<R, S> Envelope<R, S> {
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    pub fn analysis_type(&self) -> AnalysisKind {
        match self {
            Envelope::Success(r) => r.analysis_type,
            Envelope::Failure(f) => f.analysis_type,
        }
    }

    /// Rows of a success; empty for a failure.
    pub fn data(&self) -> &[R] {
        match self {
            Envelope::Success(r) => &r.data,
            Envelope::Failure(_) => &[],
        }
    }

    pub fn summary(&self) -> Option<&S> {
        match self {
            Envelope::Success(r) => Some(&r.summary),
            Envelope::Failure(_) => None,
        }
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Envelope::Success(r) => Some(&r.metadata),
            Envelope::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match self {
            Envelope::Success(_) => None,
            Envelope::Failure(f) => Some(&f.error),
        }
    }

    pub fn into_result(self) -> Result<Report<R, S>, Failure> {
        match self {
            Envelope::Success(r) => Ok(r),
            Envelope::Failure(f) => Err(f),
        }
    }
}

impl<R: Serialize, S: Serialize> Envelope<R, S> {
    /// The wire form as a JSON value.
    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl<R: Serialize, S: Serialize> Serialize for Envelope<R, S> {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
        match self {
            Envelope::Success(r) => {
                let mut st = serializer.serialize_struct("Envelope", 5)?;
                st.serialize_field("success", &true)?;
                st.serialize_field("analysis_type", &r.analysis_type)?;
                st.serialize_field("metadata", &r.metadata)?;
                st.serialize_field("data", &r.data)?;
                st.serialize_field("summary", &r.summary)?;
                st.end()
            }
            Envelope::Failure(f) => {
                let empty: &[R] = &[];
                let mut st = serializer.serialize_struct("Envelope", 4)?;
                st.serialize_field("success", &false)?;
                st.serialize_field("error", &f.error.to_string())?;
                st.serialize_field("data", empty)?;
                st.serialize_field("summary", &serde_json::Map::new())?;
                st.end()
            }
        }
    }
}
