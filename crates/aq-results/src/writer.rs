//! Binary output encoder for fixtures (feature `test-support`).
//!
//! Produces files in the same layout [`BinFile`](crate::BinFile) reads, so
//! tests can stand in for a solver that writes real output.

use crate::binfile::{FILE_NAME_LEN, ID_LEN, MAGIC, TITLE_LEN};
use crate::types::{
    LinkAttribute, LinkType, NetworkInfo, NodeAttribute, QualityOption, ReactionSummary,
    ResultSet,
};
use std::collections::BTreeMap;

struct Buf(Vec<u8>);

impl Buf {
    fn i32(&mut self, v: i32) {
        self.0.extend_from_slice(&v.to_le_bytes());
    }

    fn f32(&mut self, v: f64) {
        self.0.extend_from_slice(&(v as f32).to_le_bytes());
    }

    fn count(&mut self, v: usize) {
        self.i32(v as i32);
    }

    fn string(&mut self, s: &str, len: usize) {
        let mut raw = s.as_bytes().to_vec();
        raw.truncate(len - 1);
        raw.resize(len, 0);
        self.0.extend_from_slice(&raw);
    }
}

/// Encode a result set. Attributes missing from the maps are written as zeros.
pub fn encode(results: &ResultSet) -> Vec<u8> {
    let net = &results.network;
    let nodes = net.node_ids.len();
    let links = net.link_ids.len();
    let mut b = Buf(Vec::new());

    b.i32(MAGIC);
    b.i32(net.version);
    b.count(nodes);
    b.count(net.num_tanks);
    b.count(links);
    b.count(net.num_pumps);
    b.count(net.num_valves);
    b.i32(net.quality.code());
    b.i32(net.trace_node);
    b.i32(net.flow_units);
    b.i32(net.pressure_units);
    b.i32(net.report_statistic);
    b.i32(net.report_start_s as i32);
    b.i32(net.report_step_s as i32);
    b.i32(net.duration_s as i32);
    for title in &net.titles {
        b.string(title, TITLE_LEN);
    }
    b.string(&net.input_file, FILE_NAME_LEN);
    b.string(&net.report_file, FILE_NAME_LEN);
    b.string(&net.chem_name, ID_LEN);
    b.string(&net.chem_units, ID_LEN);
    for id in &net.node_ids {
        b.string(id, ID_LEN);
    }
    for id in &net.link_ids {
        b.string(id, ID_LEN);
    }
    net.link_start.iter().for_each(|v| b.i32(*v));
    net.link_end.iter().for_each(|v| b.i32(*v));
    net.link_types.iter().for_each(|t| b.i32(t.code()));
    net.tank_nodes.iter().for_each(|v| b.i32(*v));
    net.tank_areas.iter().for_each(|v| b.f32(*v));
    net.node_elevations.iter().for_each(|v| b.f32(*v));
    net.link_lengths.iter().for_each(|v| b.f32(*v));
    net.link_diameters.iter().for_each(|v| b.f32(*v));

    for pump in &results.pump_energy {
        b.i32(pump.link_index);
        b.f32(pump.utilization_pct);
        b.f32(pump.efficiency_pct);
        b.f32(pump.kw_per_flow);
        b.f32(pump.average_kw);
        b.f32(pump.peak_kw);
        b.f32(pump.cost_per_day);
    }
    b.f32(results.peak_energy_charge);

    for period in 0..results.times.len() {
        for attr in NodeAttribute::ALL {
            for i in 0..nodes {
                let v = results.node.get(&attr).map_or(0.0, |s| s[period][i]);
                b.f32(v);
            }
        }
        for attr in LinkAttribute::ALL {
            for i in 0..links {
                let v = results.link.get(&attr).map_or(0.0, |s| s[period][i]);
                b.f32(v);
            }
        }
    }

    b.f32(results.reactions.bulk);
    b.f32(results.reactions.wall);
    b.f32(results.reactions.tank);
    b.f32(results.reactions.source);
    b.count(results.times.len());
    b.i32(i32::from(results.warning_flag));
    b.i32(MAGIC);
    b.0
}

/// A small chain network `R1 -> J1 -> ... -> Jn` with deterministic values.
///
/// Values are exact in `f32` so a decode of the encoded file compares equal.
pub fn sample_result_set(junctions: usize, periods: usize) -> ResultSet {
    let nodes = junctions + 1;
    let links = junctions;
    let mut node_ids: Vec<String> = (1..=junctions).map(|i| format!("J{i}")).collect();
    node_ids.push("R1".to_string());
    let link_ids: Vec<String> = (1..=links).map(|i| format!("P{i}")).collect();
    let reservoir = nodes as i32;

    let node_value = |attr: NodeAttribute, p: usize, i: usize| -> f64 {
        let base = match attr {
            NodeAttribute::Demand => 1.0,
            NodeAttribute::Head => 100.0,
            NodeAttribute::Pressure => 40.0,
            NodeAttribute::Quality => 0.5,
        };
        base + p as f64 + 0.25 * i as f64
    };
    let link_value = |attr: LinkAttribute, p: usize, i: usize| -> f64 {
        match attr {
            LinkAttribute::Status => 3.0,
            LinkAttribute::Setting => 1.0,
            _ => 10.0 + p as f64 - 0.5 * i as f64,
        }
    };

    let node = NodeAttribute::ALL
        .iter()
        .map(|attr| {
            let series = (0..periods)
                .map(|p| (0..nodes).map(|i| node_value(*attr, p, i)).collect())
                .collect();
            (*attr, series)
        })
        .collect::<BTreeMap<_, _>>();
    let link = LinkAttribute::ALL
        .iter()
        .map(|attr| {
            let series = (0..periods)
                .map(|p| (0..links).map(|i| link_value(*attr, p, i)).collect())
                .collect();
            (*attr, series)
        })
        .collect::<BTreeMap<_, _>>();

    let step = 3600;
    ResultSet {
        network: NetworkInfo {
            version: 20200,
            num_tanks: 1,
            num_pumps: 0,
            num_valves: 0,
            quality: QualityOption::Age,
            trace_node: 0,
            flow_units: 1,
            pressure_units: 0,
            report_statistic: 0,
            report_start_s: 0,
            report_step_s: step,
            duration_s: step * periods.saturating_sub(1) as i64,
            titles: [
                "sample network".to_string(),
                String::new(),
                String::new(),
            ],
            input_file: "temp.inp".to_string(),
            report_file: "temp.rpt".to_string(),
            chem_name: "Age".to_string(),
            chem_units: "hrs".to_string(),
            node_ids,
            link_ids,
            link_start: (0..links).map(|i| if i == 0 { reservoir } else { i as i32 }).collect(),
            link_end: (1..=links).map(|i| i as i32).collect(),
            link_types: vec![LinkType::Pipe; links],
            tank_nodes: vec![reservoir],
            tank_areas: vec![0.0],
            node_elevations: (0..nodes).map(|i| 10.0 * i as f64).collect(),
            link_lengths: vec![1000.0; links],
            link_diameters: vec![12.0; links],
        },
        pump_energy: Vec::new(),
        peak_energy_charge: 0.0,
        times: (0..periods as i64).map(|k| k * step).collect(),
        node,
        link,
        reactions: ReactionSummary {
            bulk: 0.0,
            wall: 0.0,
            tank: 0.0,
            source: 0.0,
        },
        warning_flag: false,
    }
}
