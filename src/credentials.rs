use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::path::Path;

use log::info;
use thiserror::Error;

use crate::storage;

/// Written to a fresh credential file.
pub const DEFAULT_ACCOUNTS: [(&str, &str); 2] = [("admin", "1234"), ("user", "userpass")];

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Usernames and their plaintext passwords, read from a
/// `username,password` CSV file.
#[derive(Debug)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    /// Reads the credential file at `path`, first creating it with the
    /// default accounts if it does not exist.
    pub fn open(path: &Path) -> Result<Self, CredentialError> {
        if let Some(file) = storage::open_existing(path)? {
            return Self::from_reader(file);
        }
        storage::replace_file(path, |f| write_defaults(f))?;
        info!("created credential file {:?} with default accounts", path);
        match storage::open_existing(path)? {
            Some(file) => Self::from_reader(file),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{:?} vanished after being created", path),
            )
            .into()),
        }
    }

    /// Reads `username,password` rows, found by header name. A row missing
    /// the password field has an empty password; rows without a username
    /// are skipped.
    pub fn from_reader<R: Read>(r: R) -> Result<Self, CredentialError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(r);
        let headers = rdr.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h == name);
        let (username_idx, password_idx) = (column("username"), column("password"));

        let mut users = HashMap::new();
        for result in rdr.records() {
            let row = result?;
            let field = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("");
            let username = field(username_idx);
            if !username.is_empty() {
                users.insert(username.to_string(), field(password_idx).to_string());
            }
        }
        Ok(CredentialStore { users })
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .map_or(false, |expected| expected == password)
    }
}

fn write_defaults<W: Write>(w: W) -> Result<(), CredentialError> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(["username", "password"])?;
    for (username, password) in DEFAULT_ACCOUNTS {
        wtr.write_record([username, password])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use test_case::test_case;

    use super::*;

    fn parse_string_store(s: &str) -> CredentialStore {
        CredentialStore::from_reader(textwrap::dedent(s).as_bytes()).expect("parses")
    }

    #[test_case("alice", "secret" => true)]
    #[test_case("alice", "Secret" => false ; "password is case sensitive")]
    #[test_case("bob", "hunter2" => true ; "fields are trimmed")]
    #[test_case("carol", "" => true ; "missing password column")]
    #[test_case("", "nobody" => false ; "empty username row ignored")]
    #[test_case("mallory", "secret" => false ; "unknown user")]
    fn verify(username: &str, password: &str) -> bool {
        let store = parse_string_store(
            r#"
            username,password
            alice,secret
              bob , hunter2
            carol
            ,nobody
        "#,
        );
        store.verify(username, password)
    }

    #[test]
    fn missing_file_is_seeded_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.csv");

        let store = CredentialStore::open(&path).unwrap();

        assert!(store.verify("admin", "1234"));
        assert!(store.verify("user", "userpass"));
        assert!(!store.verify("admin", "userpass"));
        assert_eq!(
            "username,password\nadmin,1234\nuser,userpass\n",
            fs::read_to_string(&path).unwrap()
        );
    }

    #[test]
    fn short_rows_still_allow_login() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.csv");
        fs::write(&path, "username,password\nguest\nadmin,1234\n").unwrap();

        let store = CredentialStore::open(&path).unwrap();

        assert!(store.verify("admin", "1234"));
        assert!(store.verify("guest", ""));
        assert!(!store.verify("guest", "1234"));
    }

    #[test]
    fn columns_are_found_by_header() {
        let store = parse_string_store(
            r#"
            password,username
            pw,dora
        "#,
        );
        assert!(store.verify("dora", "pw"));
    }

    #[test]
    fn existing_file_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.csv");
        fs::write(&path, "username,password\nroot,toor\n").unwrap();

        let store = CredentialStore::open(&path).unwrap();

        assert!(store.verify("root", "toor"));
        assert!(!store.verify("admin", "1234"));
        assert_eq!(
            "username,password\nroot,toor\n",
            fs::read_to_string(&path).unwrap()
        );
    }
}
