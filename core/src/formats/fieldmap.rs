use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use ndarray::Array2;
use thiserror::Error;
use tracing::instrument;

use super::read_ext::{ReadExt, ReadStrErr, WriteExt};
use crate::geom::Axis;
use crate::grid::Grid2;

/// `b"FM2\0"`, little-endian.
pub const MAGIC: u32 = 0x0032_4d46;
pub const VERSION: u32 = 1;

/// A field map container: named 2-D histograms under one group name.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapFile {
    pub group: String,
    pub grids: Vec<NamedGrid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedGrid {
    pub name: String,
    pub grid: Grid2,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("bad magic number {0:#010x}, expected {MAGIC:#010x}")]
    BadMagic(u32),
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u32),

    #[error("bad string: {0}")]
    BadString(#[from] ReadStrErr),
    #[error("grid {name:?} has a degenerate axis {axis:?}")]
    BadAxis { name: String, axis: Axis },
    #[error("grid payload has wrong shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FieldMapFile {
    #[instrument(skip(rdr))]
    pub fn from_reader(mut rdr: impl Read) -> Result<Self, Error> {
        let magic = rdr.read_u32::<LittleEndian>()?;
        if magic != MAGIC {
            return Err(Error::BadMagic(magic));
        }
        let version = rdr.read_u32::<LittleEndian>()?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let group = rdr.read_string()?;
        let count = rdr.read_u32::<LittleEndian>()?;

        let mut grids = Vec::with_capacity(count as usize);
        for _ in 0..count {
            grids.push(NamedGrid::from_reader(&mut rdr)?);
        }

        Ok(FieldMapFile { group, grids })
    }

    pub fn grid(&self, name: &str) -> Option<&Grid2> {
        self.grids.iter().find(|g| g.name == name).map(|g| &g.grid)
    }

    pub fn write_to(&self, mut wtr: impl Write) -> std::io::Result<()> {
        wtr.write_u32::<LittleEndian>(MAGIC)?;
        wtr.write_u32::<LittleEndian>(VERSION)?;
        wtr.write_string(&self.group)?;
        wtr.write_u32::<LittleEndian>(self.grids.len() as u32)?;
        for grid in &self.grids {
            grid.write_to(&mut wtr)?;
        }
        Ok(())
    }
}

impl NamedGrid {
    fn from_reader(mut rdr: impl Read) -> Result<Self, Error> {
        let name = rdr.read_string()?;
        let x_axis = read_axis(&mut rdr)?;
        let y_axis = read_axis(&mut rdr)?;

        if x_axis.bins == 0 || x_axis.min >= x_axis.max {
            return Err(Error::BadAxis { name, axis: x_axis });
        }
        if y_axis.bins == 0 || y_axis.min >= y_axis.max {
            return Err(Error::BadAxis { name, axis: y_axis });
        }

        let shape = (x_axis.bins as usize, y_axis.bins as usize);
        let mut values = vec![0f32; shape.0 * shape.1];
        rdr.read_f32_into::<LittleEndian>(&mut values)?;
        let values = Array2::from_shape_vec(shape, values)?;

        Ok(NamedGrid {
            name,
            grid: Grid2::new(x_axis, y_axis, values),
        })
    }

    fn write_to(&self, mut wtr: impl Write) -> std::io::Result<()> {
        wtr.write_string(&self.name)?;
        write_axis(&mut wtr, self.grid.x_axis)?;
        write_axis(&mut wtr, self.grid.y_axis)?;
        for &value in self.grid.values() {
            wtr.write_f32::<LittleEndian>(value)?;
        }
        Ok(())
    }
}

fn read_axis(mut rdr: impl Read) -> Result<Axis, Error> {
    let min = rdr.read_f32::<LittleEndian>()?;
    let max = rdr.read_f32::<LittleEndian>()?;
    let bins = rdr.read_u32::<LittleEndian>()?;
    Ok(Axis::new(min, max, bins))
}

fn write_axis(mut wtr: impl Write, axis: Axis) -> std::io::Result<()> {
    wtr.write_f32::<LittleEndian>(axis.min)?;
    wtr.write_f32::<LittleEndian>(axis.max)?;
    wtr.write_u32::<LittleEndian>(axis.bins)
}
