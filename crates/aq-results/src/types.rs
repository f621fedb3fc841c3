//! Result data types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values for one attribute, indexed `[period][element]`.
pub type Series = Vec<Vec<f64>>;

/// Node attributes stored per reporting period, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeAttribute {
    Demand,
    Head,
    Pressure,
    Quality,
}

impl NodeAttribute {
    pub const ALL: [NodeAttribute; 4] = [
        NodeAttribute::Demand,
        NodeAttribute::Head,
        NodeAttribute::Pressure,
        NodeAttribute::Quality,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "demand" => Some(NodeAttribute::Demand),
            "head" => Some(NodeAttribute::Head),
            "pressure" => Some(NodeAttribute::Pressure),
            "quality" => Some(NodeAttribute::Quality),
            _ => None,
        }
    }
}

/// Link attributes stored per reporting period, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkAttribute {
    Flowrate,
    Velocity,
    Headloss,
    Quality,
    Status,
    Setting,
    ReactionRate,
    FrictionFactor,
}

impl LinkAttribute {
    pub const ALL: [LinkAttribute; 8] = [
        LinkAttribute::Flowrate,
        LinkAttribute::Velocity,
        LinkAttribute::Headloss,
        LinkAttribute::Quality,
        LinkAttribute::Status,
        LinkAttribute::Setting,
        LinkAttribute::ReactionRate,
        LinkAttribute::FrictionFactor,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "flowrate" | "flow" => Some(LinkAttribute::Flowrate),
            "velocity" => Some(LinkAttribute::Velocity),
            "headloss" => Some(LinkAttribute::Headloss),
            "quality" => Some(LinkAttribute::Quality),
            "status" => Some(LinkAttribute::Status),
            "setting" => Some(LinkAttribute::Setting),
            "reaction_rate" => Some(LinkAttribute::ReactionRate),
            "friction_factor" => Some(LinkAttribute::FrictionFactor),
            _ => None,
        }
    }
}

/// Which series a reader keeps. Everything by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTypes {
    pub node: Vec<NodeAttribute>,
    pub link: Vec<LinkAttribute>,
}

impl Default for ResultTypes {
    fn default() -> Self {
        Self {
            node: NodeAttribute::ALL.to_vec(),
            link: LinkAttribute::ALL.to_vec(),
        }
    }
}

impl ResultTypes {
    pub fn keeps_node(&self, attr: NodeAttribute) -> bool {
        self.node.contains(&attr)
    }

    pub fn keeps_link(&self, attr: LinkAttribute) -> bool {
        self.link.contains(&attr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityOption {
    None,
    Chemical,
    Age,
    Trace,
    Unknown(i32),
}

impl QualityOption {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => QualityOption::None,
            1 => QualityOption::Chemical,
            2 => QualityOption::Age,
            3 => QualityOption::Trace,
            other => QualityOption::Unknown(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            QualityOption::None => 0,
            QualityOption::Chemical => 1,
            QualityOption::Age => 2,
            QualityOption::Trace => 3,
            QualityOption::Unknown(code) => code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkType {
    CvPipe,
    Pipe,
    Pump,
    Prv,
    Psv,
    Pbv,
    Fcv,
    Tcv,
    Gpv,
    Unknown(i32),
}

impl LinkType {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => LinkType::CvPipe,
            1 => LinkType::Pipe,
            2 => LinkType::Pump,
            3 => LinkType::Prv,
            4 => LinkType::Psv,
            5 => LinkType::Pbv,
            6 => LinkType::Fcv,
            7 => LinkType::Tcv,
            8 => LinkType::Gpv,
            other => LinkType::Unknown(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            LinkType::CvPipe => 0,
            LinkType::Pipe => 1,
            LinkType::Pump => 2,
            LinkType::Prv => 3,
            LinkType::Psv => 4,
            LinkType::Pbv => 5,
            LinkType::Fcv => 6,
            LinkType::Tcv => 7,
            LinkType::Gpv => 8,
            LinkType::Unknown(code) => code,
        }
    }
}

/// Static network description from the file prolog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub version: i32,
    pub num_tanks: usize,
    pub num_pumps: usize,
    pub num_valves: usize,
    pub quality: QualityOption,
    /// 1-based index of the trace node, 0 when not tracing.
    pub trace_node: i32,
    pub flow_units: i32,
    pub pressure_units: i32,
    pub report_statistic: i32,
    pub report_start_s: i64,
    pub report_step_s: i64,
    pub duration_s: i64,
    pub titles: [String; 3],
    pub input_file: String,
    pub report_file: String,
    pub chem_name: String,
    pub chem_units: String,
    pub node_ids: Vec<String>,
    pub link_ids: Vec<String>,
    /// 1-based node indices of each link's start node.
    pub link_start: Vec<i32>,
    pub link_end: Vec<i32>,
    pub link_types: Vec<LinkType>,
    /// 1-based node indices of tanks and reservoirs.
    pub tank_nodes: Vec<i32>,
    /// Zero for reservoirs.
    pub tank_areas: Vec<f64>,
    pub node_elevations: Vec<f64>,
    pub link_lengths: Vec<f64>,
    pub link_diameters: Vec<f64>,
}

/// Per-pump energy usage summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpEnergy {
    /// 1-based link index of the pump.
    pub link_index: i32,
    pub utilization_pct: f64,
    pub efficiency_pct: f64,
    pub kw_per_flow: f64,
    pub average_kw: f64,
    pub peak_kw: f64,
    pub cost_per_day: f64,
}

/// Network-wide average reaction rates from the epilog.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReactionSummary {
    pub bulk: f64,
    pub wall: f64,
    pub tank: f64,
    pub source: f64,
}

/// Everything read from one binary output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub network: NetworkInfo,
    pub pump_energy: Vec<PumpEnergy>,
    pub peak_energy_charge: f64,
    /// Reporting times in seconds from simulation start.
    pub times: Vec<i64>,
    pub node: BTreeMap<NodeAttribute, Series>,
    pub link: BTreeMap<LinkAttribute, Series>,
    pub reactions: ReactionSummary,
    /// The solver flagged warnings during the run.
    pub warning_flag: bool,
}

impl ResultSet {
    pub fn num_nodes(&self) -> usize {
        self.network.node_ids.len()
    }

    pub fn num_links(&self) -> usize {
        self.network.link_ids.len()
    }

    pub fn num_periods(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty() || (self.num_nodes() == 0 && self.num_links() == 0)
    }

    /// Time series of one node attribute for the node with `node_id`.
    pub fn node_series(&self, attr: NodeAttribute, node_id: &str) -> Option<Vec<f64>> {
        let idx = self.network.node_ids.iter().position(|id| id == node_id)?;
        let series = self.node.get(&attr)?;
        Some(series.iter().map(|period| period[idx]).collect())
    }

    /// Time series of one link attribute for the link with `link_id`.
    pub fn link_series(&self, attr: LinkAttribute, link_id: &str) -> Option<Vec<f64>> {
        let idx = self.network.link_ids.iter().position(|id| id == link_id)?;
        let series = self.link.get(&attr)?;
        Some(series.iter().map(|period| period[idx]).collect())
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            node_count: self.num_nodes(),
            link_count: self.num_links(),
            period_count: self.num_periods(),
            duration_s: self.network.duration_s,
            warning_flag: self.warning_flag,
        }
    }
}

/// Compact description of a result set for listings and manifests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub node_count: usize,
    pub link_count: usize,
    pub period_count: usize,
    pub duration_s: i64,
    pub warning_flag: bool,
}
