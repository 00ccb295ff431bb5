use std::error::Error;
use std::fmt;
use std::fmt::Formatter;
use std::io;
use std::path::PathBuf;

/// Failures raised while opening the data directory. These are fatal: the
/// dealership cannot start without its database directory.
#[derive(Debug)]
pub enum DirectoryError {
    EmptyPath,
    NotFound(PathBuf),
    NotADirectory(PathBuf),
    Unreadable(PathBuf, io::Error),
}

/// A single rejected row. Row errors are reported and skipped, they never
/// abort a load.
#[derive(Debug, PartialEq)]
pub enum RowError {
    /// The row has fewer columns than the layout requires.
    Malformed { file: String, fields: Vec<String> },

    /// A numeric column (year, mileage or price) failed to parse.
    InvalidNumber { file: String, fields: Vec<String> },
}

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
}

fn field_list(fields: &[String]) -> String {
    format!("[{}]", fields.join(", "))
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::EmptyPath => {
                write!(f, "data directory cannot be null or an empty string")
            }
            DirectoryError::NotFound(path) => write!(
                f,
                "Can't open data directory for read: {} does not exist",
                path.display()
            ),
            DirectoryError::NotADirectory(path) => write!(
                f,
                "Can't open data directory for read: {} is not a directory",
                path.display()
            ),
            DirectoryError::Unreadable(path, err) => write!(
                f,
                "Can't open data directory for read: {}: {}",
                path.display(),
                err
            ),
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RowError::Malformed { file, fields } if file == crate::db::USERS_FILE_NAME => {
                write!(f, "ERROR: Malformed user data -> {}", field_list(fields))
            }
            RowError::Malformed { fields, .. } => {
                write!(f, "ERROR: Malformed CSV line -> {}", field_list(fields))
            }
            RowError::InvalidNumber { file, fields } => write!(
                f,
                "ERROR: Invalid number format in {} -> {}",
                file,
                field_list(fields)
            ),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "{}", err),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl Error for DirectoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DirectoryError::Unreadable(_, err) => Some(err),
            _ => None,
        }
    }
}

impl Error for RowError {}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_invalid_number_with_field_list() {
        let err = RowError::InvalidNumber {
            file: String::from("inventory.csv"),
            fields: vec![String::from("V2"), String::from("abcd")],
        };
        assert_eq!(
            err.to_string(),
            "ERROR: Invalid number format in inventory.csv -> [V2, abcd]"
        );
    }

    #[test]
    fn should_render_malformed_rows_per_file() {
        let fields = vec![String::from("a"), String::from("b")];
        let inventory = RowError::Malformed {
            file: String::from("inventory.csv"),
            fields: fields.clone(),
        };
        let users = RowError::Malformed {
            file: String::from("users.csv"),
            fields,
        };

        assert_eq!(inventory.to_string(), "ERROR: Malformed CSV line -> [a, b]");
        assert_eq!(users.to_string(), "ERROR: Malformed user data -> [a, b]");
    }
}
