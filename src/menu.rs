//! The interactive menu session.
//!
//! A session walks a small state machine: the login menu, the manager menu
//! and the report menu. Each step renders one menu, reads one choice and
//! decides which menu comes next. Logging in and viewing the inventory happen
//! inside those transitions.

use crate::console::PasswordReader;
use crate::model::{Car, Dealership};
use std::io::{self, BufRead, Write};
use tracing::debug;

const BANNER_RULE: &str = "================================";
const TABLE_RULE: &str =
    "---------------------------------------------------------------------------";

const CHOICE_PROMPT: &str = "Please make a choice: ";
const USERNAME_PROMPT: &str = "Username: ";
pub const PASSWORD_PROMPT: &str = "Enter password: ";

pub const EXIT_MESSAGE: &str = "Exiting the system...";
pub const INVALID_CHOICE_MESSAGE: &str = "Invalid choice. Please try again.";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. No matching username and password found.";
pub const SALESPERSON_MESSAGE: &str = "Salesperson functionality not implemented yet.";
pub const LOGOUT_MESSAGE: &str = "Logging out...";
pub const NO_CARS_MESSAGE: &str = "No cars available in inventory.";
pub const CONTINUE_MESSAGE: &str = "Press the return key to continue...";

/// The menus a session can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    Login,
    Manager,
    Report,
    Exit,
}

/// A console session over a loaded dealership.
pub struct Session<'a, R, W, P> {
    dealership: &'a Dealership,
    input: R,
    output: W,
    passwords: P,
}

impl<'a, R: BufRead, W: Write, P: PasswordReader> Session<'a, R, W, P> {
    pub fn new(dealership: &'a Dealership, input: R, output: W, passwords: P) -> Self {
        Self {
            dealership,
            input,
            output,
            passwords,
        }
    }

    /// Runs the session from the login menu until the user exits or input
    /// runs out.
    pub fn run(&mut self) -> io::Result<()> {
        let mut state = MenuState::Login;
        while state != MenuState::Exit {
            let next = self.step(state)?;
            if next != state {
                debug!("menu transition {:?} -> {:?}", state, next);
            }
            state = next;
        }

        self.output.flush()
    }

    /// Renders the menu for `state`, handles one choice and returns the state
    /// to continue in.
    pub fn step(&mut self, state: MenuState) -> io::Result<MenuState> {
        match state {
            MenuState::Login => self.login_menu(),
            MenuState::Manager => self.manager_menu(),
            MenuState::Report => self.report_menu(),
            MenuState::Exit => Ok(MenuState::Exit),
        }
    }

    fn login_menu(&mut self) -> io::Result<MenuState> {
        writeln!(self.output, "Welcome to Best Cars Dealership!")?;
        writeln!(self.output, "{}", BANNER_RULE)?;
        writeln!(self.output, "1. Manager")?;
        writeln!(self.output, "2. Salesperson")?;
        writeln!(self.output, "3. Exit")?;

        let choice = match self.prompt(CHOICE_PROMPT)? {
            Some(choice) => choice,
            None => return Ok(MenuState::Exit),
        };

        match choice.as_str() {
            "1" | "2" => self.login(),
            "3" => {
                writeln!(self.output, "{}", EXIT_MESSAGE)?;
                Ok(MenuState::Exit)
            }
            _ => {
                writeln!(self.output, "{}", INVALID_CHOICE_MESSAGE)?;
                Ok(MenuState::Login)
            }
        }
    }

    /// Asks for credentials and routes the user by their stored role. A failed
    /// attempt goes straight back to the login menu.
    fn login(&mut self) -> io::Result<MenuState> {
        let username = match self.prompt(USERNAME_PROMPT)? {
            Some(username) => username.trim().to_string(),
            None => return Ok(MenuState::Exit),
        };

        let password = match self.passwords.read_password(PASSWORD_PROMPT)? {
            Some(password) => password,
            None => match self.prompt(PASSWORD_PROMPT)? {
                Some(password) => password.trim().to_string(),
                None => return Ok(MenuState::Exit),
            },
        };

        let user = match self.dealership.find_user(&username, &password) {
            Some(user) => user,
            None => {
                debug!("login failed for {:?}", username);
                writeln!(self.output, "{}", LOGIN_FAILED_MESSAGE)?;
                return Ok(MenuState::Login);
            }
        };

        debug!("{:?} logged in with role {:?}", user.username(), user.role());
        writeln!(self.output, "Successfully logged in as {}.", user.role())?;
        if user.is_manager() {
            return Ok(MenuState::Manager);
        }

        writeln!(self.output, "{}", SALESPERSON_MESSAGE)?;
        Ok(MenuState::Login)
    }

    fn manager_menu(&mut self) -> io::Result<MenuState> {
        writeln!(self.output, "{}", BANNER_RULE)?;
        writeln!(self.output, "=       Manager Main Menu      =")?;
        writeln!(self.output, "{}", BANNER_RULE)?;
        writeln!(self.output, "1. Add a Car")?;
        writeln!(self.output, "2. Delete a Car")?;
        writeln!(self.output, "3. Generate Reports")?;
        writeln!(self.output, "4. Log out")?;

        let choice = match self.prompt(CHOICE_PROMPT)? {
            Some(choice) => choice,
            None => return Ok(MenuState::Exit),
        };

        match choice.as_str() {
            "3" => Ok(MenuState::Report),
            "4" => {
                writeln!(self.output, "{}", LOGOUT_MESSAGE)?;
                Ok(MenuState::Login)
            }
            other => {
                writeln!(
                    self.output,
                    "I’m sorry, but option {} has not been implemented yet. Please pick option 3 or 4.",
                    other
                )?;
                Ok(MenuState::Manager)
            }
        }
    }

    /// The report menu lists a sales report, but only the inventory report
    /// exists; choosing "2" gets the same answer as any other unknown option.
    fn report_menu(&mut self) -> io::Result<MenuState> {
        writeln!(self.output, "{}", BANNER_RULE)?;
        writeln!(self.output, "=          Report Menu         =")?;
        writeln!(self.output, "{}", BANNER_RULE)?;
        writeln!(self.output, "1. Inventory")?;
        writeln!(self.output, "2. Sales")?;
        writeln!(self.output, "3. Main Menu")?;

        let choice = match self.prompt(CHOICE_PROMPT)? {
            Some(choice) => choice,
            None => return Ok(MenuState::Exit),
        };

        match choice.as_str() {
            "1" => self.inventory_view(),
            "3" => Ok(MenuState::Manager),
            other => {
                writeln!(
                    self.output,
                    "I’m sorry, but option {} has not been implemented yet. Please pick option 1 or 3.",
                    other
                )?;
                Ok(MenuState::Report)
            }
        }
    }

    fn inventory_view(&mut self) -> io::Result<MenuState> {
        let inventory = self.dealership.inventory();
        if inventory.is_empty() {
            writeln!(self.output, "{}", NO_CARS_MESSAGE)?;
            return Ok(MenuState::Report);
        }

        render_inventory(inventory, &mut self.output)?;
        writeln!(self.output, "{}", CONTINUE_MESSAGE)?;
        self.output.flush()?;

        match self.read_line()? {
            Some(_) => Ok(MenuState::Report),
            None => Ok(MenuState::Exit),
        }
    }

    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Reads one line without its terminator, or `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

/// Writes the fixed-width inventory report for `cars`.
pub fn render_inventory<W: Write>(cars: &[Car], out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", BANNER_RULE)?;
    writeln!(out, "=          Inventory           =")?;
    writeln!(out, "{}", BANNER_RULE)?;
    writeln!(
        out,
        "{:<10} {:<10} {:<10} {:<6} {:<10} {:<10} {:<10} {:<12}",
        "VIN", "Make", "Model", "Year", "Mileage", "Color", "Price", "Status"
    )?;
    writeln!(out, "{}", TABLE_RULE)?;

    for car in cars {
        writeln!(
            out,
            "{:<10} {:<10} {:<10} {:<6} {:<10} {:<10} ${:<9.2} {:<12}",
            car.vin(),
            car.make(),
            car.model(),
            car.year(),
            car.mileage(),
            car.color(),
            car.price(),
            car.status()
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::NoMaskedInput;
    use crate::model::{User, MANAGER_ROLE, SALESPERSON_ROLE};
    use std::io::Cursor;

    /// Hands out a fixed password as if it had been typed at a masked prompt.
    struct MaskedInput(&'static str);

    impl PasswordReader for MaskedInput {
        fn read_password(&mut self, _prompt: &str) -> io::Result<Option<String>> {
            Ok(Some(self.0.to_string()))
        }
    }

    fn dealership(inventory: Vec<Car>) -> Dealership {
        Dealership::new(
            Vec::from([
                User::new("alice", "secret", MANAGER_ROLE),
                User::new("bob", "hunter2", SALESPERSON_ROLE),
            ]),
            inventory,
        )
    }

    fn camry() -> Car {
        Car::new("V1", "Toyota", "Camry", 2020, 15000, "Blue", 25000.0, "Available")
    }

    fn run_session(dealership: &Dealership, input: &str) -> String {
        let mut output = Vec::new();
        Session::new(dealership, Cursor::new(input), &mut output, NoMaskedInput)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn step_once(dealership: &Dealership, state: MenuState, input: &str) -> (MenuState, String) {
        let mut output = Vec::new();
        let next = Session::new(dealership, Cursor::new(input), &mut output, NoMaskedInput)
            .step(state)
            .unwrap();
        (next, String::from_utf8(output).unwrap())
    }

    #[test]
    fn should_route_manager_to_manager_menu() {
        let dealership = dealership(Vec::new());

        let (next, output) = step_once(&dealership, MenuState::Login, "1\nalice\nsecret\n");

        assert_eq!(next, MenuState::Manager);
        assert!(output.contains("Username: Enter password: "));
        assert!(output.contains("Successfully logged in as Manager."));
    }

    #[test]
    fn should_route_salesperson_back_to_login() {
        let dealership = dealership(Vec::new());

        let (next, output) = step_once(&dealership, MenuState::Login, "2\nbob\nhunter2\n");

        assert_eq!(next, MenuState::Login);
        assert!(output.contains("Successfully logged in as Salesperson."));
        assert!(output.contains(SALESPERSON_MESSAGE));
    }

    #[test]
    fn should_return_to_login_after_failed_login() {
        let dealership = dealership(Vec::new());

        let (next, output) = step_once(&dealership, MenuState::Login, "1\nalice\nwrong\n");

        assert_eq!(next, MenuState::Login);
        assert!(output.contains(LOGIN_FAILED_MESSAGE));
        assert!(!output.contains("Successfully"));
    }

    #[test]
    fn should_fail_login_with_empty_fallback_password() {
        let dealership = dealership(Vec::new());

        // Pressing return at the visible password prompt submits "".
        let (next, output) = step_once(&dealership, MenuState::Login, "1\nalice\n\n");

        assert_eq!(next, MenuState::Login);
        assert!(output.contains("Username: Enter password: "));
        assert!(output.contains(LOGIN_FAILED_MESSAGE));
    }

    #[test]
    fn should_trim_fallback_credentials() {
        let dealership = dealership(Vec::new());

        let (next, _) = step_once(&dealership, MenuState::Login, "1\n  alice \n secret \n");
        assert_eq!(next, MenuState::Manager);
    }

    #[test]
    fn should_prefer_masked_password_input() {
        let dealership = dealership(Vec::new());
        let mut output = Vec::new();

        // Only the username comes from the line input; the password is masked.
        let next = Session::new(
            &dealership,
            Cursor::new("1\nalice\n"),
            &mut output,
            MaskedInput("secret"),
        )
        .step(MenuState::Login)
        .unwrap();

        assert_eq!(next, MenuState::Manager);
        let output = String::from_utf8(output).unwrap();
        assert!(!output.contains(PASSWORD_PROMPT));
    }

    #[test]
    fn should_reject_unknown_login_choice() {
        let dealership = dealership(Vec::new());

        let (next, output) = step_once(&dealership, MenuState::Login, "4\n");
        assert_eq!(next, MenuState::Login);
        assert!(output.ends_with(&format!("{}\n", INVALID_CHOICE_MESSAGE)));

        // Choices are matched exactly.
        let (next, _) = step_once(&dealership, MenuState::Login, " 1\n");
        assert_eq!(next, MenuState::Login);
    }

    #[test]
    fn should_name_unimplemented_manager_options() {
        let dealership = dealership(Vec::new());

        let (next, output) = step_once(&dealership, MenuState::Manager, "1\n");

        assert_eq!(next, MenuState::Manager);
        assert!(output.contains(
            "I’m sorry, but option 1 has not been implemented yet. Please pick option 3 or 4."
        ));
    }

    #[test]
    fn should_treat_sales_report_as_unimplemented() {
        let dealership = dealership(Vec::from([camry()]));

        let (next, output) = step_once(&dealership, MenuState::Report, "2\n");

        assert_eq!(next, MenuState::Report);
        assert!(output.contains("2. Sales"));
        assert!(output.contains(
            "I’m sorry, but option 2 has not been implemented yet. Please pick option 1 or 3."
        ));
    }

    #[test]
    fn should_navigate_between_manager_and_report_menus() {
        let dealership = dealership(Vec::new());

        assert_eq!(
            step_once(&dealership, MenuState::Manager, "3\n").0,
            MenuState::Report
        );
        assert_eq!(
            step_once(&dealership, MenuState::Report, "3\n").0,
            MenuState::Manager
        );

        let (next, output) = step_once(&dealership, MenuState::Manager, "4\n");
        assert_eq!(next, MenuState::Login);
        assert!(output.contains(LOGOUT_MESSAGE));
    }

    #[test]
    fn should_show_no_cars_without_waiting() {
        let dealership = dealership(Vec::new());

        // No acknowledgement line follows the "1": the view must not read one.
        let (next, output) = step_once(&dealership, MenuState::Report, "1\n");

        assert_eq!(next, MenuState::Report);
        assert!(output.ends_with(&format!("{}\n", NO_CARS_MESSAGE)));
        assert!(!output.contains(CONTINUE_MESSAGE));
    }

    #[test]
    fn should_render_inventory_table() {
        let mut output = Vec::new();
        render_inventory(&[camry()], &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[3],
            "VIN        Make       Model      Year   Mileage    Color      Price      Status      "
        );
        assert_eq!(lines[4].len(), 75);
        assert_eq!(
            lines[5],
            "V1         Toyota     Camry      2020   15000      Blue       $25000.00  Available   "
        );
    }

    #[test]
    fn should_wait_for_acknowledgement_after_inventory() {
        let dealership = dealership(Vec::from([camry()]));

        let (next, output) = step_once(&dealership, MenuState::Report, "1\n\n");

        assert_eq!(next, MenuState::Report);
        assert!(output.contains("V1         Toyota"));
        assert!(output.ends_with(&format!("{}\n", CONTINUE_MESSAGE)));
    }

    #[test]
    fn should_run_full_manager_session() {
        let dealership = dealership(Vec::from([camry()]));

        let output = run_session(&dealership, "1\nalice\nsecret\n3\n1\n\n3\n4\n3\n");

        assert!(output.contains("=       Manager Main Menu      ="));
        assert!(output.contains("=          Inventory           ="));
        assert!(output.contains(LOGOUT_MESSAGE));
        assert!(output.ends_with(&format!("{}{}\n", CHOICE_PROMPT, EXIT_MESSAGE)));
    }

    #[test]
    fn should_end_session_at_end_of_input() {
        let dealership = dealership(Vec::new());

        let output = run_session(&dealership, "1\nalice\nsecret\n");

        assert!(output.contains("=       Manager Main Menu      ="));
        assert!(!output.contains(EXIT_MESSAGE));
    }
}
