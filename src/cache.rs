//! On-disk persistence of a built proximity graph.
//!
//! The cache is a single gzip-compressed binary file: a magic tag and
//! schema version, a CRC32 fingerprint of the input city set, then the node
//! and edge tables. A missing file, an older schema, or a fingerprint that
//! no longer matches the input all count as a miss and make the caller
//! rebuild; a file that cannot be decoded is surfaced as
//! [`Error::CorruptedCache`].

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::debug;
use petgraph::visit::EdgeRef;

use crate::Error;
use crate::model::{City, CityGraph};

const MAGIC: &[u8; 8] = b"CITYPATH";
const SCHEMA_VERSION: u16 = 1;

/// CRC32 over the city names and coordinate bits, in input order.
///
/// Input order participates in near-tie neighbor selection, so a reordered
/// input is a different graph and must not reuse the cache.
pub fn fingerprint(cities: &[City]) -> u32 {
    let mut crc = flate2::Crc::new();
    for city in cities {
        crc.update(city.name.as_bytes());
        crc.update(&city.geometry.x().to_le_bytes());
        crc.update(&city.geometry.y().to_le_bytes());
    }
    crc.sum()
}

/// Handle to the cache file at a fixed path.
pub struct GraphCache {
    path: PathBuf,
}

impl GraphCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read a cached graph. `Ok(None)` means the caller must build and
    /// store; any decoding failure on an existing file is fatal.
    pub fn load(&self, expected_fingerprint: u32) -> Result<Option<CityGraph>, Error> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut reader = GzDecoder::new(file);
        let corrupt =
            |detail: String| Error::CorruptedCache(format!("{}: {detail}", self.path.display()));

        let mut magic = [0u8; 8];
        reader
            .read_exact(&mut magic)
            .map_err(|err| corrupt(err.to_string()))?;
        if &magic != MAGIC {
            return Err(corrupt("unrecognized file header".into()));
        }

        let version = reader
            .read_u16::<LittleEndian>()
            .map_err(|err| corrupt(err.to_string()))?;
        if version != SCHEMA_VERSION {
            debug!("Cache schema v{version} superseded by v{SCHEMA_VERSION}, rebuilding");
            return Ok(None);
        }

        let stored_fingerprint = reader
            .read_u32::<LittleEndian>()
            .map_err(|err| corrupt(err.to_string()))?;
        if stored_fingerprint != expected_fingerprint {
            debug!("Cache fingerprint mismatch, input city set changed");
            return Ok(None);
        }

        let num_nodes = reader
            .read_u32::<LittleEndian>()
            .map_err(|err| corrupt(err.to_string()))? as usize;
        let num_edges = reader
            .read_u32::<LittleEndian>()
            .map_err(|err| corrupt(err.to_string()))? as usize;

        let mut graph = CityGraph::with_capacity(num_nodes, num_edges);
        let mut nodes = Vec::with_capacity(num_nodes);
        for _ in 0..num_nodes {
            let name_len = reader
                .read_u16::<LittleEndian>()
                .map_err(|err| corrupt(err.to_string()))? as usize;
            let mut name = vec![0u8; name_len];
            reader
                .read_exact(&mut name)
                .map_err(|err| corrupt(err.to_string()))?;
            let name =
                String::from_utf8(name).map_err(|_| corrupt("non-UTF-8 city name".into()))?;
            if graph.node(&name).is_some() {
                return Err(corrupt(format!("duplicate city name {name}")));
            }
            let lon = reader
                .read_f64::<LittleEndian>()
                .map_err(|err| corrupt(err.to_string()))?;
            let lat = reader
                .read_f64::<LittleEndian>()
                .map_err(|err| corrupt(err.to_string()))?;
            nodes.push(graph.add_city(City::new(name, lon, lat)));
        }
        for _ in 0..num_edges {
            let source = reader
                .read_u32::<LittleEndian>()
                .map_err(|err| corrupt(err.to_string()))? as usize;
            let target = reader
                .read_u32::<LittleEndian>()
                .map_err(|err| corrupt(err.to_string()))? as usize;
            let weight = reader
                .read_f64::<LittleEndian>()
                .map_err(|err| corrupt(err.to_string()))?;
            match (nodes.get(source), nodes.get(target)) {
                (Some(&a), Some(&b)) => graph.connect(a, b, weight),
                _ => return Err(corrupt("edge endpoint out of range".into())),
            }
        }

        Ok(Some(graph))
    }

    /// Serialize the graph, replacing any previous cache file.
    pub fn store(&self, graph: &CityGraph, fingerprint: u32) -> Result<(), Error> {
        let file = File::create(&self.path)?;
        let mut writer = GzEncoder::new(file, Compression::default());

        writer.write_all(MAGIC)?;
        writer.write_u16::<LittleEndian>(SCHEMA_VERSION)?;
        writer.write_u32::<LittleEndian>(fingerprint)?;
        writer.write_u32::<LittleEndian>(graph.node_count() as u32)?;
        writer.write_u32::<LittleEndian>(graph.edge_count() as u32)?;

        // Nodes in index order, so edge endpoints can be written as indices.
        for city in graph.cities() {
            writer.write_u16::<LittleEndian>(city.name.len() as u16)?;
            writer.write_all(city.name.as_bytes())?;
            writer.write_f64::<LittleEndian>(city.geometry.x())?;
            writer.write_f64::<LittleEndian>(city.geometry.y())?;
        }
        for edge in graph.graph().edge_references() {
            writer.write_u32::<LittleEndian>(edge.source().index() as u32)?;
            writer.write_u32::<LittleEndian>(edge.target().index() as u32)?;
            writer.write_f64::<LittleEndian>(*edge.weight())?;
        }
        writer.finish()?;

        debug!("Stored graph cache at {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::loading::{GraphConfig, build_proximity_graph};
    use std::collections::BTreeMap;

    fn square() -> Vec<City> {
        vec![
            City::new("A", 0.0, 0.0),
            City::new("B", 0.0, 1.0),
            City::new("C", 1.0, 1.0),
            City::new("D", 1.0, 0.0),
        ]
    }

    fn build(cities: &[City]) -> CityGraph {
        let config = GraphConfig {
            radius_km: 1000.0,
            neighbor_cap: 3,
            cache_path: None,
        };
        build_proximity_graph(cities, &config).unwrap()
    }

    fn edge_map(graph: &CityGraph) -> BTreeMap<(String, String), f64> {
        graph
            .edges()
            .map(|(a, b, w)| {
                let (a, b) = if a <= b { (a, b) } else { (b, a) };
                ((a.to_string(), b.to_string()), w)
            })
            .collect()
    }

    #[test]
    fn round_trip_preserves_nodes_and_edges() {
        let dir = tempfile::tempdir().unwrap();
        let cache = GraphCache::new(dir.path().join("graph.bin"));

        let cities = square();
        let graph = build(&cities);
        let crc = fingerprint(&cities);

        cache.store(&graph, crc).unwrap();
        let restored = cache.load(crc).unwrap().expect("cache should hit");

        assert_eq!(restored.node_count(), graph.node_count());
        for city in graph.cities() {
            assert_eq!(restored.position_of(&city.name), Some(city.geometry));
        }

        let original = edge_map(&graph);
        let reloaded = edge_map(&restored);
        assert_eq!(original.len(), reloaded.len());
        for (pair, weight) in original {
            let restored_weight = reloaded[&pair];
            assert!((weight - restored_weight).abs() < 1e-12);
        }
    }

    #[test]
    fn missing_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = GraphCache::new(dir.path().join("graph.bin"));
        assert!(cache.load(0).unwrap().is_none());
    }

    #[test]
    fn changed_input_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = GraphCache::new(dir.path().join("graph.bin"));

        let cities = square();
        let graph = build(&cities);
        cache.store(&graph, fingerprint(&cities)).unwrap();

        let mut changed = square();
        changed.push(City::new("E", 2.0, 2.0));
        assert!(cache.load(fingerprint(&changed)).unwrap().is_none());
    }

    #[test]
    fn older_schema_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.bin");

        let file = File::create(&path).unwrap();
        let mut writer = GzEncoder::new(file, Compression::default());
        writer.write_all(MAGIC).unwrap();
        writer.write_u16::<LittleEndian>(SCHEMA_VERSION - 1).unwrap();
        writer.write_u32::<LittleEndian>(0).unwrap();
        writer.finish().unwrap();

        assert!(GraphCache::new(&path).load(0).unwrap().is_none());
    }

    #[test]
    fn garbage_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.bin");
        std::fs::write(&path, b"definitely not a graph cache").unwrap();

        assert!(matches!(
            GraphCache::new(&path).load(0),
            Err(Error::CorruptedCache(_))
        ));
    }

    #[test]
    fn truncated_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.bin");

        let cities = square();
        let graph = build(&cities);
        let crc = fingerprint(&cities);
        let cache = GraphCache::new(&path);
        cache.store(&graph, crc).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        assert!(matches!(cache.load(crc), Err(Error::CorruptedCache(_))));
    }

    #[test]
    fn fingerprint_tracks_names_and_positions() {
        let base = square();
        assert_eq!(fingerprint(&base), fingerprint(&square()));

        let mut renamed = square();
        renamed[0].name = "Z".into();
        assert_ne!(fingerprint(&base), fingerprint(&renamed));

        let mut moved = square();
        moved[1] = City::new("B", 0.0, 1.5);
        assert_ne!(fingerprint(&base), fingerprint(&moved));
    }
}
