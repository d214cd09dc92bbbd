use core::str::FromStr;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::Error;
use crate::hierarchy::{Hierarchy, HierarchyConfig};




/**
 * The interior data of one patch, with enough geometry to plot it.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchSnapshot {
    pub id: usize,
    pub depth: usize,
    pub parent: Option<usize>,
    pub left_edge: f64,
    pub spacing: f64,
    pub coordinates: Vec<f64>,
    pub fields: Vec<Vec<f64>>,
}




/**
 * The solution state of a hierarchy at one instant, as raw arrays for
 * external plotting tools. Patches are listed coarse to fine.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: f64,
    pub iteration: u64,
    pub field_names: Vec<String>,
    pub config: HierarchyConfig,
    pub patches: Vec<PatchSnapshot>,
}




// ============================================================================
impl Snapshot {

    pub fn new(hierarchy: &Hierarchy) -> Self {
        let mut patches = Vec::new();

        for level in hierarchy.levels() {
            for &id in level.patches() {
                let patch = hierarchy.patch(id);
                let mesh = patch.mesh();
                let interior = mesh.interior();

                patches.push(PatchSnapshot {
                    id: id.0,
                    depth: level.depth(),
                    parent: patch.parent().map(|p| p.0),
                    left_edge: mesh.left_edge,
                    spacing: mesh.spacing,
                    coordinates: mesh.coordinates().skip(interior.start).take(interior.len()).collect(),
                    fields: (0..patch.num_fields()).map(|q| patch.interior(q).to_vec()).collect(),
                })
            }
        }

        Self {
            time: hierarchy.time(),
            iteration: hierarchy.iteration(),
            field_names: hierarchy.problem().field_names().to_vec(),
            config: hierarchy.config().clone(),
            patches,
        }
    }
}




/**
 * Encoding used for snapshot files.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Cbor,
    MessagePack,
}

impl Format {

    /**
     * Infer the format from a file extension.
     */
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        path.extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnknownOutputFormat(path.display().to_string()))?
            .parse()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Cbor => "cbor",
            Format::MessagePack => "msgpack",
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cbor" => Ok(Format::Cbor),
            "msgpack" | "mpk" => Ok(Format::MessagePack),
            _ => Err(Error::UnknownOutputFormat(s.to_string())),
        }
    }
}




/**
 * Write a snapshot to the given path, encoded according to its extension
 * (`.cbor`, `.msgpack` or `.mpk`).
 */
pub fn write_snapshot<P: AsRef<Path>>(path: P, snapshot: &Snapshot) -> Result<(), Error> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let mut buffer = BufWriter::new(File::create(path)?);

    match format {
        Format::Cbor => ciborium::ser::into_writer(snapshot, &mut buffer)
            .map_err(|e| Error::Encode(format!("{:?}", e)))?,
        Format::MessagePack => rmp_serde::encode::write(&mut buffer, snapshot)
            .map_err(|e| Error::Encode(e.to_string()))?,
    }
    buffer.flush()?;
    Ok(())
}

/**
 * Read back a snapshot written by `write_snapshot`.
 */
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<Snapshot, Error> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let reader = BufReader::new(File::open(path)?);

    match format {
        Format::Cbor => ciborium::de::from_reader(reader)
            .map_err(|e| Error::Encode(format!("{:?}", e))),
        Format::MessagePack => rmp_serde::decode::from_read(reader)
            .map_err(|e| Error::Encode(e.to_string())),
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use std::sync::Arc;
    use super::{read_snapshot, write_snapshot, Format};
    use crate::error::Error;
    use crate::hierarchy::{Hierarchy, HierarchyConfig};
    use crate::models;

    fn seeded() -> Hierarchy {
        let mut hierarchy = Hierarchy::new(Arc::new(models::wave(1.0).unwrap()), HierarchyConfig::default()).unwrap();
        hierarchy.seed(models::gaussian(0.5, 0.03)).unwrap();
        hierarchy
    }

    #[test]
    fn snapshot_holds_interior_data_of_every_patch() {
        let snapshot = seeded().snapshot();
        assert_eq!(snapshot.field_names, vec!["pi".to_string(), "psi".to_string()]);
        assert_eq!(snapshot.patches.len(), 3);
        assert_eq!(snapshot.patches[2].depth, 2);
        assert_eq!(snapshot.patches[2].parent, Some(1));
        assert_eq!(snapshot.patches[0].parent, None);

        for patch in &snapshot.patches {
            assert_eq!(patch.coordinates.len(), 100);
            assert_eq!(patch.fields.len(), 2);
            assert_eq!(patch.fields[0].len(), 100);
            assert!((patch.coordinates[0] - (patch.left_edge + 0.5 * patch.spacing)).abs() < 1e-12);
        }
    }

    #[test]
    fn snapshots_survive_both_encodings() {
        let snapshot = seeded().snapshot();
        let dir = std::env::temp_dir();

        for format in &[Format::Cbor, Format::MessagePack] {
            let path = dir.join(format!("gridnest-test-{}.{}", std::process::id(), format.extension()));
            write_snapshot(&path, &snapshot).unwrap();
            assert_eq!(read_snapshot(&path).unwrap(), snapshot);
            std::fs::remove_file(&path).unwrap();
        }
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        let snapshot = seeded().snapshot();
        assert!(matches!(write_snapshot("solution.dat", &snapshot), Err(Error::UnknownOutputFormat(_))));
        assert!(matches!(write_snapshot("solution", &snapshot), Err(Error::UnknownOutputFormat(_))));
        assert_eq!("mpk".parse::<Format>().unwrap(), Format::MessagePack);
    }
}
