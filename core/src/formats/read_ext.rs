use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadStrErr {
    #[error("IO error {0}")]
    Io(#[from] io::Error),
    #[error("IO error {0}, expected to read {1} bytes")]
    IoBuf(io::Error, usize),
    #[error("UTF-8 error {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub trait ReadExt {
    /// Reads a u32-length-prefixed UTF-8 string.
    fn read_string(&mut self) -> Result<String, ReadStrErr>;
}

impl<T: Read> ReadExt for T {
    fn read_string(&mut self) -> Result<String, ReadStrErr> {
        let len = self.read_u32::<LittleEndian>()?;
        let len = len as usize;

        let mut buf: Vec<u8> = vec![0u8; len];
        self.read_exact(&mut buf)
            .map_err(|err| ReadStrErr::IoBuf(err, len))?;

        Ok(String::from_utf8(buf)?)
    }
}

pub trait WriteExt {
    fn write_string(&mut self, s: &str) -> io::Result<()>;
}

impl<T: Write> WriteExt for T {
    fn write_string(&mut self, s: &str) -> io::Result<()> {
        self.write_u32::<LittleEndian>(s.len() as u32)?;
        self.write_all(s.as_bytes())
    }
}
