use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use thiserror::Error;
use tracing::instrument;

use crate::formats::fieldmap::{self, FieldMapFile};
use crate::grid::Grid2;

/// Grid names within the container group.
pub const THICKNESS: &str = "x0";
pub const FIELD_X: &str = "bx";
pub const FIELD_Y: &str = "by";
pub const FIELD_Z: &str = "bz";

/// Every grid a dataset must provide.
pub const REQUIRED: [&str; 4] = [THICKNESS, FIELD_X, FIELD_Y, FIELD_Z];

/// One loaded field map: a display title plus the four histograms of the
/// z–x plane, all sharing the same axis geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub title: String,
    /// Material thickness, drawn as the color map.
    pub thickness: Grid2,
    pub field_x: Grid2,
    pub field_y: Grid2,
    pub field_z: Grid2,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid field map container: {0}")]
    Format(#[from] fieldmap::Error),
    #[error("group {group:?} is missing grid {name:?}")]
    MissingGrid { group: String, name: &'static str },
    #[error("grid {name:?} does not share the binning of {reference:?}")]
    AxisMismatch {
        name: &'static str,
        reference: &'static str,
    },
}

impl Dataset {
    #[instrument]
    pub fn load(path: &Path, title: &str) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), title)
    }

    /// Extracts the four required grids from a container. Either all four
    /// are present and share one binning, or this fails; there are no
    /// partial datasets.
    pub fn from_reader(rdr: impl Read, title: &str) -> Result<Self, LoadError> {
        let map = FieldMapFile::from_reader(rdr)?;

        let group = map.group;
        let mut grids: HashMap<String, Grid2> = map
            .grids
            .into_iter()
            .map(|named| (named.name, named.grid))
            .collect();
        let mut take = |name: &'static str| {
            grids.remove(name).ok_or_else(|| LoadError::MissingGrid {
                group: group.clone(),
                name,
            })
        };

        let thickness = take(THICKNESS)?;
        let field_x = take(FIELD_X)?;
        let field_y = take(FIELD_Y)?;
        let field_z = take(FIELD_Z)?;

        for (name, grid) in [
            (FIELD_X, &field_x),
            (FIELD_Y, &field_y),
            (FIELD_Z, &field_z),
        ] {
            if !grid.same_binning(&thickness) {
                return Err(LoadError::AxisMismatch {
                    name,
                    reference: THICKNESS,
                });
            }
        }

        Ok(Dataset {
            title: title.to_string(),
            thickness,
            field_x,
            field_y,
            field_z,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::fieldmap::NamedGrid;
    use crate::geom::Axis;
    use ndarray::Array2;

    fn container(names: &[&str]) -> FieldMapFile {
        let x_axis = Axis::new(-10.0, 10.0, 8);
        let y_axis = Axis::new(-10.0, 10.0, 8);
        FieldMapFile {
            group: "slice0".to_string(),
            grids: names
                .iter()
                .map(|&name| NamedGrid {
                    name: name.to_string(),
                    grid: Grid2::new(x_axis, y_axis, Array2::ones((8, 8))),
                })
                .collect(),
        }
    }

    fn load(file: &FieldMapFile) -> Result<Dataset, LoadError> {
        let mut buf = Vec::new();
        file.write_to(&mut buf).unwrap();
        Dataset::from_reader(&buf[..], "test")
    }

    #[test]
    fn loads_all_four() {
        let dataset = load(&container(&REQUIRED)).unwrap();
        assert_eq!(dataset.title, "test");
        assert_eq!(dataset.thickness.value(0, 0), 1.0);
        assert!(dataset.field_z.same_binning(&dataset.thickness));
    }

    #[test]
    fn extra_grids_are_ignored() {
        let dataset = load(&container(&[THICKNESS, FIELD_X, FIELD_Y, FIELD_Z, "bmod"]));
        assert!(dataset.is_ok());
    }

    #[test]
    fn missing_grid_fails() {
        let result = load(&container(&[THICKNESS, FIELD_X, FIELD_Y]));
        assert!(matches!(
            result,
            Err(LoadError::MissingGrid { name: FIELD_Z, .. })
        ));
    }

    #[test]
    fn axis_mismatch_fails() {
        let mut file = container(&REQUIRED);
        file.grids[3].grid = Grid2::new(
            Axis::new(-10.0, 10.0, 8),
            Axis::new(-10.0, 10.0, 4),
            Array2::ones((8, 4)),
        );
        assert!(matches!(
            load(&file),
            Err(LoadError::AxisMismatch { name: FIELD_Z, .. })
        ));
    }

    #[test]
    fn bad_container_fails() {
        let result = Dataset::from_reader(&b"not a field map"[..], "test");
        assert!(matches!(result, Err(LoadError::Format(_))));
    }
}
