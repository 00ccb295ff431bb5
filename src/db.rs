use crate::data_dir::DataDirectory;
use crate::errors::{DirectoryError, LoadError, RowError};
use crate::model::{Car, Dealership, User};
use crate::parser::{split_record, DEFAULT_DELIMITER};
use csv::StringRecord;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

pub const INVENTORY_FILE_NAME: &str = "inventory.csv";
pub const USERS_FILE_NAME: &str = "users.csv";
pub const SALES_FILE_NAME: &str = "sales.csv";

const DROP_COMMENT_LINES: bool = true;
const DROP_EMPTY_LINES: bool = true;

/// Number of columns in the canonical inventory layout.
pub const LEGACY_FIELD_COUNT: usize = 8;

/// Rows with at least this many columns use the extended inventory layout.
pub const EXTENDED_FIELD_COUNT: usize = 12;

/// Columns of the canonical inventory layout, in file order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Column {
    Vin,
    Make,
    Model,
    Year,
    Mileage,
    Color,
    Price,
    Status,
}

/// Where each canonical column lives in an extended inventory row. Column 1
/// and columns 8 to 10 of the extended layout (a date and three coordinates)
/// are not used.
pub const EXTENDED_LAYOUT: [(Column, usize); LEGACY_FIELD_COUNT] = [
    (Column::Vin, 0),
    (Column::Make, 2),
    (Column::Model, 3),
    (Column::Year, 4),
    (Column::Mileage, 5),
    (Column::Color, 6),
    (Column::Price, 7),
    (Column::Status, 11),
];

/// Users rows carry eight columns; only the last three are consumed.
const USER_FIELD_COUNT: usize = 8;
const USER_ROLE_COLUMN: usize = 5;
const USER_NAME_COLUMN: usize = 6;
const USER_PASSWORD_COLUMN: usize = 7;

/// Rewrites an extended inventory row into the canonical layout. Rows that
/// are too short to be extended are returned untouched.
pub fn remap_extended(fields: Vec<String>) -> Vec<String> {
    if fields.len() < EXTENDED_FIELD_COUNT {
        return fields;
    }

    EXTENDED_LAYOUT
        .iter()
        .map(|(_, position)| fields[*position].clone())
        .collect()
}

/// Loads the dealership's data files from its database directory.
pub struct DealershipDb {
    dir: DataDirectory,
}

impl DealershipDb {
    pub fn new(dir: DataDirectory) -> Self {
        Self { dir }
    }

    pub fn open<P: AsRef<Path>>(path: P, comment_char: char) -> Result<Self, DirectoryError> {
        Ok(Self::new(DataDirectory::open(path, comment_char)?))
    }

    /// Loads every user and car and bundles them for the session.
    pub fn load_dealership<W: Write>(&self, diagnostics: &mut W) -> Result<Dealership, LoadError> {
        let users = self.load_users(diagnostics)?;
        let inventory = self.load_inventory(diagnostics)?;

        Ok(Dealership::new(users, inventory))
    }

    /// Loads the cars in `inventory.csv`.
    ///
    /// Rows in the extended layout are first remapped onto the canonical
    /// eight columns. Rows that are still too short, or whose year, mileage or
    /// price is not a number, are reported to `diagnostics` and skipped.
    pub fn load_inventory<W: Write>(&self, diagnostics: &mut W) -> Result<Vec<Car>, LoadError> {
        let lines = self
            .dir
            .read_lines(INVENTORY_FILE_NAME, DROP_COMMENT_LINES, DROP_EMPTY_LINES)?;

        let mut cars = Vec::with_capacity(lines.len());
        let mut rejected = 0;
        for line in lines {
            match parse_car(&line) {
                Ok(car) => {
                    debug!("loaded car {}", car);
                    cars.push(car);
                }
                Err(err) => {
                    rejected += 1;
                    report(diagnostics, &err)?;
                }
            }
        }

        info!(
            "loaded {} cars from {} ({} rejected)",
            cars.len(),
            INVENTORY_FILE_NAME,
            rejected
        );
        Ok(cars)
    }

    /// Loads the accounts in `users.csv`.
    ///
    /// The role column is stripped of anything that is not an ASCII letter,
    /// so `Mana1ger` loads as `Manager`. Short rows are reported and skipped.
    pub fn load_users<W: Write>(&self, diagnostics: &mut W) -> Result<Vec<User>, LoadError> {
        let lines = self
            .dir
            .read_lines(USERS_FILE_NAME, DROP_COMMENT_LINES, DROP_EMPTY_LINES)?;

        let mut users = Vec::with_capacity(lines.len());
        let mut rejected = 0;
        for line in lines {
            match parse_user(&line) {
                Ok(user) => users.push(user),
                Err(err) => {
                    rejected += 1;
                    report(diagnostics, &err)?;
                }
            }
        }

        info!(
            "loaded {} users from {} ({} rejected)",
            users.len(),
            USERS_FILE_NAME,
            rejected
        );
        Ok(users)
    }

    /// Returns the rows of `sales.csv` as they appear in the file.
    pub fn load_sales(&self) -> Result<Vec<String>, LoadError> {
        let lines = self
            .dir
            .read_lines(SALES_FILE_NAME, DROP_COMMENT_LINES, DROP_EMPTY_LINES)?;

        info!("loaded {} sales rows from {}", lines.len(), SALES_FILE_NAME);
        Ok(lines)
    }
}

fn report<W: Write>(diagnostics: &mut W, err: &RowError) -> Result<(), LoadError> {
    warn!("skipping row: {}", err);
    writeln!(diagnostics, "{}", err)?;
    Ok(())
}

/// Splits a data row the way the legacy files were written: trailing empty
/// columns do not count towards the row's width.
fn split_fields(line: &str) -> Vec<String> {
    // An in-memory line cannot fail to split; an empty row is reported as
    // malformed anyway.
    let mut fields = split_record(line, DEFAULT_DELIMITER, true).unwrap_or_default();
    while fields.last().map_or(false, |field| field.is_empty()) {
        fields.pop();
    }
    fields
}

fn parse_car(line: &str) -> Result<Car, RowError> {
    let fields = remap_extended(split_fields(line));

    if fields.len() < LEGACY_FIELD_COUNT {
        return Err(RowError::Malformed {
            file: INVENTORY_FILE_NAME.to_string(),
            fields,
        });
    }

    let record = StringRecord::from(fields[..LEGACY_FIELD_COUNT].to_vec());
    record
        .deserialize::<Car>(None)
        .map_err(|_| RowError::InvalidNumber {
            file: INVENTORY_FILE_NAME.to_string(),
            fields,
        })
}

fn parse_user(line: &str) -> Result<User, RowError> {
    let fields = split_fields(line);

    if fields.len() < USER_FIELD_COUNT {
        return Err(RowError::Malformed {
            file: USERS_FILE_NAME.to_string(),
            fields,
        });
    }

    let role: String = fields[USER_ROLE_COLUMN]
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect();

    Ok(User::new(
        &fields[USER_NAME_COLUMN],
        &fields[USER_PASSWORD_COLUMN],
        &role,
    ))
}
