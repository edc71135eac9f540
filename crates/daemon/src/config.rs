use std::ffi::OsStr;
use std::fs;
use std::net::Ipv4Addr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use crate::error::DaemonError;

/// Fixed-width prefix of the config file: 4-byte IPv4 address followed by a
/// 2-byte port, both in network byte order.
const HEADER_LEN: usize = 6;

/// Parsed startup configuration: bind address, bind port, and the directory
/// whose files this instance will serve.
///
/// The on-disk format is intentionally not a text format — no parser, no
/// escaping rules, no optional fields. It mirrors how the server itself
/// reads wire messages: fixed-width fields first, a variable-length byte
/// string last.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the listening socket to.
    pub bind_addr: Ipv4Addr,
    /// Port to bind the listening socket to.
    pub bind_port: u16,
    /// Directory served to clients. Every `FileSize`/`FileRetrieve` request
    /// is resolved relative to this path; see [`crate::path::resolve`].
    pub directory: PathBuf,
}

impl ServerConfig {
    /// Reads and parses a config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DaemonError::Io`] if the file cannot be read, or
    /// [`DaemonError::TruncatedConfig`] if it is shorter than the fixed
    /// 6-byte address/port header. The directory field may be empty (an
    /// empty trailing byte string resolves to `directory.join("")`, i.e. the
    /// process's current directory is never implied).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DaemonError> {
        let bytes = fs::read(path)?;
        if bytes.len() < HEADER_LEN {
            return Err(DaemonError::TruncatedConfig { len: bytes.len() });
        }
        let bind_addr = Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]);
        let bind_port = u16::from_be_bytes([bytes[4], bytes[5]]);
        let directory = PathBuf::from(OsStr::from_bytes(&bytes[HEADER_LEN..]));
        Ok(Self {
            bind_addr,
            bind_port,
            directory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(bytes).expect("write");
        file
    }

    #[test]
    fn parses_address_port_and_directory() {
        let mut bytes = vec![127, 0, 0, 1, 0x1F, 0x90];
        bytes.extend_from_slice(b"/srv/shared");
        let file = write_config(&bytes);

        let config = ServerConfig::from_path(file.path()).expect("parse");
        assert_eq!(config.bind_addr, Ipv4Addr::new(127, 0, 0, 1));
        assert_eq!(config.bind_port, 0x1F90);
        assert_eq!(config.directory, PathBuf::from("/srv/shared"));
    }

    #[test]
    fn empty_directory_is_allowed() {
        let file = write_config(&[0, 0, 0, 0, 0, 80]);
        let config = ServerConfig::from_path(file.path()).expect("parse");
        assert_eq!(config.directory, PathBuf::from(""));
    }

    #[test]
    fn truncated_header_is_rejected() {
        let file = write_config(&[127, 0, 0, 1]);
        let err = ServerConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(err, DaemonError::TruncatedConfig { len: 4 }));
    }
}
