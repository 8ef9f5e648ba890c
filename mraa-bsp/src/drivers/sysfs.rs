//! Sysfs attribute access

use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use log::trace;

/// Write one value to an existing attribute file
pub fn write_attr(path: &Path, value: impl Display) -> io::Result<()> {
    trace!("sysfs: {} <- {}", path.display(), value);
    let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
    write!(file, "{value}")
}

/// Read an attribute file without its trailing newline
pub fn read_attr(path: &Path) -> io::Result<String> {
    let value = fs::read_to_string(path)?;
    Ok(value.trim_end().to_owned())
}

/// Read an attribute holding an unsigned number
pub fn read_attr_u32(path: &Path) -> io::Result<u32> {
    let value = read_attr(path)?;
    value.trim().parse().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: not a number: {:?}", path.display(), value),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_requires_existing_attribute() {
        let dir = tempfile::tempdir().unwrap();
        let attr = dir.path().join("value");
        assert!(write_attr(&attr, 1).is_err());

        fs::write(&attr, "").unwrap();
        write_attr(&attr, "out").unwrap();
        write_attr(&attr, "in").unwrap();
        assert_eq!(read_attr(&attr).unwrap(), "in");
    }

    #[test]
    fn test_read_number() {
        let dir = tempfile::tempdir().unwrap();
        let attr = dir.path().join("max_brightness");
        fs::write(&attr, "255\n").unwrap();
        assert_eq!(read_attr_u32(&attr).unwrap(), 255);

        fs::write(&attr, "lots\n").unwrap();
        assert_eq!(
            read_attr_u32(&attr).unwrap_err().kind(),
            io::ErrorKind::InvalidData
        );
    }
}
