pub mod fieldmap;
pub mod read_ext;
