use serde::Deserialize;
use std::fmt;
use std::fmt::Formatter;

pub const MANAGER_ROLE: &str = "Manager";
pub const SALESPERSON_ROLE: &str = "Salesperson";

/// A single car in the dealership inventory.
///
/// Field order matches the canonical eight-column inventory layout, which is
/// what lets a row be decoded positionally.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Car {
    vin: String,
    make: String,
    model: String,
    year: i32,

    /// Odometer reading in miles.
    mileage: i32,
    color: String,

    /// Asking price in USD.
    price: f64,

    /// Free text, usually "Available", "Sold" or "In-Service".
    status: String,
}

impl Car {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        vin: &str,
        make: &str,
        model: &str,
        year: i32,
        mileage: i32,
        color: &str,
        price: f64,
        status: &str,
    ) -> Self {
        Self {
            vin: vin.to_string(),
            make: make.to_string(),
            model: model.to_string(),
            year,
            mileage,
            color: color.to_string(),
            price,
            status: status.to_string(),
        }
    }

    pub fn vin(&self) -> &str {
        &self.vin
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn mileage(&self) -> i32 {
        self.mileage
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {} miles, {}, ${:?}, Status: {}",
            self.vin,
            self.make,
            self.model,
            self.year,
            self.mileage,
            self.color,
            self.price,
            self.status
        )
    }
}

/// A stored credential.
///
/// This is the only code that compares passwords. Stored values are
/// plaintext today, so verification is plain equality.
#[derive(Clone, PartialEq)]
pub struct Password(String);

impl Password {
    pub fn new(secret: &str) -> Self {
        Self(secret.to_string())
    }

    pub fn verify(&self, attempt: &str) -> bool {
        self.0 == attempt
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Password(***)")
    }
}

/// A dealership user, either a manager or a salesperson.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    username: String,
    password: Password,
    role: String,
}

impl User {
    pub fn new(username: &str, password: &str, role: &str) -> Self {
        Self {
            username: username.to_string(),
            password: Password::new(password),
            role: role.to_string(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn is_manager(&self) -> bool {
        self.role == MANAGER_ROLE
    }

    pub fn authenticate(&self, password: &str) -> bool {
        self.password.verify(password)
    }
}

/// Everything the session needs: the users who may log in and the cars on
/// the lot. Built once at startup and only read afterwards.
#[derive(Debug, Default)]
pub struct Dealership {
    users: Vec<User>,
    inventory: Vec<Car>,
}

impl Dealership {
    pub fn new(users: Vec<User>, inventory: Vec<Car>) -> Self {
        Self { users, inventory }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn inventory(&self) -> &[Car] {
        &self.inventory
    }

    /// Returns the first user whose name matches exactly and whose password
    /// checks out.
    pub fn find_user(&self, username: &str, password: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|user| user.username == username && user.authenticate(password))
    }
}
