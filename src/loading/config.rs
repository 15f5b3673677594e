// Copyright 2018-2021 Dmitry Tantsur <dtantsur@protonmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Support for configuration files.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::OneViewConfig;
use crate::{Connection, Error, ErrorKind};

const DEFAULT_CONFIG: &str = "oneview.yaml";

fn find_config<S: AsRef<str>>(filename: S) -> Option<PathBuf> {
    let filename = filename.as_ref();
    let current = Path::new(filename);
    if current.is_file() {
        match current.canonicalize() {
            Ok(val) => return Some(val),
            Err(e) => warn!("Cannot canonicalize {:?}: {}", current, e),
        }
    }

    if let Some(mut config) = dirs::config_dir() {
        config.push("oneview");
        config.push(filename);
        if config.is_file() {
            return Some(config);
        }
    } else {
        warn!("Cannot find the configuration directory");
    }

    let abs = PathBuf::from(format!("/etc/oneview/{}", filename));
    if abs.is_file() {
        Some(abs)
    } else {
        None
    }
}

fn read_config(path: &Path) -> Result<OneViewConfig, Error> {
    debug!("Reading configuration from {:?}", path);
    let content = File::open(path).map_err(|e| {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("Cannot read {:?}: {}", path, e),
        )
    })?;

    // JSON files are valid YAML as well.
    serde_yaml::from_reader(content).map_err(|e| {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("Cannot parse {:?}: {}", path, e),
        )
    })
}

/// Create a `Connection` from a YAML or JSON configuration file.
///
/// The file looks like:
///
/// ```yaml
/// ip: 172.16.102.59
/// api_version: 800
/// ssl_certificate: /etc/pki/oneview.crt
/// credentials:
///   sessionID: LTIxNjUzMjc0OTUzzHoF7eEkZLEUWVA-fuOZP4VGA3U8e67E
/// ```
///
/// An `endpoint` URL may be used instead of the `ip`.
pub fn from_config<P: AsRef<Path>>(path: P) -> Result<Connection, Error> {
    read_config(path.as_ref())?.create_connection()
}

/// Create a `Connection` from `oneview.yaml`.
///
/// The file is looked for in the current directory, then in the `oneview` subdirectory of the
/// user configuration directory, then in `/etc/oneview`.
pub fn from_default_config() -> Result<Connection, Error> {
    let path = find_config(DEFAULT_CONFIG).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("{} was not found in any location", DEFAULT_CONFIG),
        )
    })?;
    from_config(path)
}

#[cfg(test)]
pub mod test {
    use std::io::Write;
    use std::path::Path;

    use super::{from_config, read_config};
    use crate::loading::Credentials;
    use crate::{ApiVersion, ErrorKind};

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_yaml() {
        let file = write_config(
            r#"ip: 172.16.102.59
api_version: 800
credentials:
  sessionID: "123"
"#,
        );
        let config = read_config(file.path()).unwrap();
        assert_eq!(config.ip.as_deref(), Some("172.16.102.59"));
        assert_eq!(config.api_version, Some(ApiVersion(800)));
        assert_eq!(
            config.credentials,
            Some(Credentials {
                session_id: Some("123".into()),
                ..Credentials::default()
            })
        );
    }

    #[test]
    fn test_from_config_json() {
        let file = write_config(
            r#"{
  "ip": "172.16.102.59",
  "api_version": "500",
  "credentials": {
    "userName": "",
    "authLoginDomain": "",
    "password": "",
    "sessionID": "123"
  }
}"#,
        );
        let conn = from_config(file.path()).unwrap();
        assert_eq!(conn.api_version(), ApiVersion(500));
        assert_eq!(conn.endpoint().as_str(), "https://172.16.102.59/");
    }

    #[test]
    fn test_from_config_endpoint() {
        let file = write_config("endpoint: https://oneview.example.com:8443\n");
        let conn = from_config(file.path()).unwrap();
        assert_eq!(conn.endpoint().port(), Some(8443));
        assert_eq!(conn.api_version(), ApiVersion(300));
    }

    #[test]
    fn test_from_config_password_rejected() {
        let file = write_config(
            r#"ip: 172.16.102.59
credentials:
  userName: administrator
  password: secret123
"#,
        );
        let err = from_config(file.path()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_from_config_missing_file() {
        let err = from_config(Path::new("/nonexistent/oneview.yaml"))
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_from_config_garbage() {
        let file = write_config("- just\n- a list\n");
        let err = from_config(file.path()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[cfg(feature = "native-tls")]
    #[test]
    fn test_from_config_invalid_certificate() {
        let cert = write_config("not a certificate");
        let file = write_config(&format!(
            "ip: 172.16.102.59\nssl_certificate: {}\n",
            cert.path().display()
        ));
        let err = from_config(file.path()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}
