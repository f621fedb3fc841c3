//! EPANET binary output file reader.
//!
//! # Layout
//!
//! ```text
//! +---------------------------+
//! | Prolog                    |  884 + 36*nodes + 52*links + 8*tanks bytes
//! +---------------------------+
//! | Energy usage              |  28*pumps + 4 bytes
//! +---------------------------+
//! | Dynamic results           |  periods * (16*nodes + 32*links) bytes
//! +---------------------------+
//! | Epilog                    |  28 bytes
//! +---------------------------+
//! ```
//!
//! All integers are 4-byte and all reals 4-byte floats, little endian. The
//! file starts and ends with [`MAGIC`]; the period count lives in the epilog.

use crate::reader::ResultReader;
use crate::types::{
    LinkAttribute, LinkType, NetworkInfo, NodeAttribute, PumpEnergy, QualityOption,
    ReactionSummary, ResultSet, ResultTypes, Series,
};
use crate::{DecodeError, DecodeResult};
use std::collections::BTreeMap;
use std::path::Path;

/// Magic number at both ends of a binary output file.
pub const MAGIC: i32 = 516_114_521;

pub(crate) const TITLE_LEN: usize = 80;
pub(crate) const FILE_NAME_LEN: usize = 260;
pub(crate) const ID_LEN: usize = 32;
pub(crate) const PROLOG_FIXED: usize = 884;
pub(crate) const EPILOG_LEN: usize = 28;
pub(crate) const PUMP_ENERGY_LEN: usize = 28;

pub(crate) fn prolog_len(nodes: usize, links: usize, tanks: usize) -> usize {
    PROLOG_FIXED + 36 * nodes + 52 * links + 8 * tanks
}

pub(crate) fn energy_len(pumps: usize) -> usize {
    PUMP_ENERGY_LEN * pumps + 4
}

pub(crate) fn period_len(nodes: usize, links: usize) -> usize {
    4 * (nodes * NodeAttribute::ALL.len() + links * LinkAttribute::ALL.len())
}

/// Reader for EPANET binary output files.
#[derive(Debug, Clone, Default)]
pub struct BinFile {
    result_types: ResultTypes,
}

impl BinFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the listed series.
    pub fn with_result_types(result_types: ResultTypes) -> Self {
        Self { result_types }
    }

    pub fn result_types(&self) -> &ResultTypes {
        &self.result_types
    }

    /// Decode a complete output file held in memory.
    pub fn decode(&self, data: &[u8]) -> DecodeResult<ResultSet> {
        if data.len() < PROLOG_FIXED + EPILOG_LEN {
            return Err(DecodeError::Truncated {
                offset: data.len(),
                needed: PROLOG_FIXED + EPILOG_LEN,
            });
        }

        let mut cur = Cursor::new(data);
        let magic = cur.i32()?;
        if magic != MAGIC {
            return Err(DecodeError::BadMagic {
                found: magic,
                position: "prolog",
            });
        }

        let version = cur.i32()?;
        let num_nodes = cur.count("node count")?;
        let num_tanks = cur.count("tank count")?;
        let num_links = cur.count("link count")?;
        let num_pumps = cur.count("pump count")?;
        let num_valves = cur.count("valve count")?;
        let quality = QualityOption::from_code(cur.i32()?);
        let trace_node = cur.i32()?;
        let flow_units = cur.i32()?;
        let pressure_units = cur.i32()?;
        let report_statistic = cur.i32()?;
        let report_start_s = i64::from(cur.i32()?);
        let report_step_s = i64::from(cur.i32()?);
        let duration_s = i64::from(cur.i32()?);

        // Epilog first: it carries the period count needed to size-check the rest.
        let mut tail = Cursor::at(data, data.len() - EPILOG_LEN);
        let reactions = ReactionSummary {
            bulk: tail.f32()?,
            wall: tail.f32()?,
            tank: tail.f32()?,
            source: tail.f32()?,
        };
        let num_periods = tail.count("period count")?;
        let warning_flag = tail.i32()? != 0;
        let end_magic = tail.i32()?;
        if end_magic != MAGIC {
            return Err(DecodeError::BadMagic {
                found: end_magic,
                position: "epilog",
            });
        }

        // An empty network has zero-length periods, so the size check below
        // cannot bound the period count.
        if num_periods > 0 && period_len(num_nodes, num_links) == 0 {
            return Err(DecodeError::InvalidCount {
                what: "period count",
                value: num_periods as i32,
            });
        }

        // u128 so corrupt counts cannot overflow the size arithmetic.
        let expected = prolog_len(num_nodes, num_links, num_tanks) as u128
            + energy_len(num_pumps) as u128
            + num_periods as u128 * period_len(num_nodes, num_links) as u128
            + EPILOG_LEN as u128;
        if expected != data.len() as u128 {
            return Err(DecodeError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        let titles = [
            cur.string(TITLE_LEN)?,
            cur.string(TITLE_LEN)?,
            cur.string(TITLE_LEN)?,
        ];
        let input_file = cur.string(FILE_NAME_LEN)?;
        let report_file = cur.string(FILE_NAME_LEN)?;
        let chem_name = cur.string(ID_LEN)?;
        let chem_units = cur.string(ID_LEN)?;

        let node_ids = (0..num_nodes)
            .map(|_| cur.string(ID_LEN))
            .collect::<DecodeResult<Vec<_>>>()?;
        let link_ids = (0..num_links)
            .map(|_| cur.string(ID_LEN))
            .collect::<DecodeResult<Vec<_>>>()?;
        let link_start = cur.i32_vec(num_links)?;
        let link_end = cur.i32_vec(num_links)?;
        let link_types = cur
            .i32_vec(num_links)?
            .into_iter()
            .map(LinkType::from_code)
            .collect();
        let tank_nodes = cur.i32_vec(num_tanks)?;
        let tank_areas = cur.f32_vec(num_tanks)?;
        let node_elevations = cur.f32_vec(num_nodes)?;
        let link_lengths = cur.f32_vec(num_links)?;
        let link_diameters = cur.f32_vec(num_links)?;

        let mut pump_energy = Vec::with_capacity(num_pumps);
        for _ in 0..num_pumps {
            pump_energy.push(PumpEnergy {
                link_index: cur.i32()?,
                utilization_pct: cur.f32()?,
                efficiency_pct: cur.f32()?,
                kw_per_flow: cur.f32()?,
                average_kw: cur.f32()?,
                peak_kw: cur.f32()?,
                cost_per_day: cur.f32()?,
            });
        }
        let peak_energy_charge = cur.f32()?;

        let mut node: BTreeMap<NodeAttribute, Series> = self
            .result_types
            .node
            .iter()
            .map(|attr| (*attr, Vec::new()))
            .collect();
        let mut link: BTreeMap<LinkAttribute, Series> = self
            .result_types
            .link
            .iter()
            .map(|attr| (*attr, Vec::new()))
            .collect();

        for _ in 0..num_periods {
            for attr in NodeAttribute::ALL {
                match node.get_mut(&attr) {
                    Some(series) => series.push(cur.f32_vec(num_nodes)?),
                    None => cur.skip(4 * num_nodes)?,
                }
            }
            for attr in LinkAttribute::ALL {
                match link.get_mut(&attr) {
                    Some(series) => series.push(cur.f32_vec(num_links)?),
                    None => cur.skip(4 * num_links)?,
                }
            }
        }

        let times = (0..num_periods as i64)
            .map(|k| report_start_s + k * report_step_s)
            .collect();

        Ok(ResultSet {
            network: NetworkInfo {
                version,
                num_tanks,
                num_pumps,
                num_valves,
                quality,
                trace_node,
                flow_units,
                pressure_units,
                report_statistic,
                report_start_s,
                report_step_s,
                duration_s,
                titles,
                input_file,
                report_file,
                chem_name,
                chem_units,
                node_ids,
                link_ids,
                link_start,
                link_end,
                link_types,
                tank_nodes,
                tank_areas,
                node_elevations,
                link_lengths,
                link_diameters,
            },
            pump_energy,
            peak_energy_charge,
            times,
            node,
            link,
            reactions,
            warning_flag,
        })
    }
}

impl ResultReader for BinFile {
    fn read(&self, path: &Path) -> DecodeResult<ResultSet> {
        let data = std::fs::read(path).map_err(|source| DecodeError::Missing {
            path: path.to_path_buf(),
            source,
        })?;
        self.decode(&data)
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    fn take(&mut self, n: usize) -> DecodeResult<&'a [u8]> {
        let end = self.pos + n;
        if end > self.data.len() {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                needed: n,
            });
        }
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn skip(&mut self, n: usize) -> DecodeResult<()> {
        self.take(n).map(|_| ())
    }

    fn i32(&mut self) -> DecodeResult<i32> {
        let mut buf4 = [0u8; 4];
        buf4.copy_from_slice(self.take(4)?);
        Ok(i32::from_le_bytes(buf4))
    }

    fn f32(&mut self) -> DecodeResult<f64> {
        let mut buf4 = [0u8; 4];
        buf4.copy_from_slice(self.take(4)?);
        Ok(f64::from(f32::from_le_bytes(buf4)))
    }

    fn count(&mut self, what: &'static str) -> DecodeResult<usize> {
        let value = self.i32()?;
        usize::try_from(value).map_err(|_| DecodeError::InvalidCount { what, value })
    }

    fn i32_vec(&mut self, n: usize) -> DecodeResult<Vec<i32>> {
        (0..n).map(|_| self.i32()).collect()
    }

    fn f32_vec(&mut self, n: usize) -> DecodeResult<Vec<f64>> {
        (0..n).map(|_| self.f32()).collect()
    }

    /// Fixed-width, NUL padded text field.
    fn string(&mut self, len: usize) -> DecodeResult<String> {
        let raw = self.take(len)?;
        let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_sizes_match_documented_layout() {
        assert_eq!(prolog_len(0, 0, 0), 884);
        assert_eq!(prolog_len(2, 1, 1), 884 + 72 + 52 + 8);
        assert_eq!(energy_len(0), 4);
        assert_eq!(energy_len(2), 60);
        assert_eq!(period_len(3, 2), 16 * 3 + 32 * 2);
    }

    #[test]
    fn short_buffer_is_truncated() {
        let err = BinFile::new().decode(&[0u8; 16]).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { .. }));
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let data = vec![0u8; PROLOG_FIXED + EPILOG_LEN];
        let err = BinFile::new().decode(&data).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::BadMagic {
                found: 0,
                position: "prolog"
            }
        ));
    }

    #[test]
    fn periods_without_elements_are_rejected() {
        let mut data = vec![0u8; prolog_len(0, 0, 0) + energy_len(0) + EPILOG_LEN];
        data[..4].copy_from_slice(&MAGIC.to_le_bytes());
        let epilog = data.len() - EPILOG_LEN;
        data[epilog + 16..epilog + 20].copy_from_slice(&i32::MAX.to_le_bytes());
        data[epilog + 24..].copy_from_slice(&MAGIC.to_le_bytes());

        let err = BinFile::new().decode(&data).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidCount {
                what: "period count",
                value: i32::MAX
            }
        ));
    }

    #[test]
    fn empty_network_without_periods_decodes() {
        let mut data = vec![0u8; prolog_len(0, 0, 0) + energy_len(0) + EPILOG_LEN];
        data[..4].copy_from_slice(&MAGIC.to_le_bytes());
        let epilog = data.len() - EPILOG_LEN;
        data[epilog + 24..].copy_from_slice(&MAGIC.to_le_bytes());

        let set = BinFile::new().decode(&data).unwrap();
        assert!(set.times.is_empty());
        assert!(set.network.node_ids.is_empty());
    }

    #[test]
    fn strings_stop_at_nul() {
        let mut raw = b"J-1".to_vec();
        raw.resize(ID_LEN, 0);
        let mut cur = Cursor::new(&raw);
        assert_eq!(cur.string(ID_LEN).unwrap(), "J-1");
    }
}
