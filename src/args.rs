use crate::data_dir::DEFAULT_COMMENT_CHAR;
use clap::{App, Arg, ArgMatches};
use std::ffi::OsString;

pub struct Args {
    pub data_dir: String,
    pub comment_char: char,
    pub verbosity: u64,
}

fn app() -> App<'static, 'static> {
    App::new("dealership")
        .version("0.1.0")
        .arg(
            Arg::with_name("data_dir")
                .takes_value(true)
                .required(true)
                .help("path of the database directory to load"),
        )
        .arg(
            Arg::with_name("comment_char")
                .long("comment-char")
                .takes_value(true)
                .default_value("#")
                .validator(|value| match value.chars().count() {
                    1 => Ok(()),
                    _ => Err(String::from("the comment marker must be a single character")),
                })
                .help("lines starting with this character are ignored"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("log more detail to stderr (repeat for debug output)"),
        )
}

impl Args {
    pub fn parse() -> Self {
        Self::from_matches(&app().get_matches())
    }

    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::from_matches(&app().get_matches_from_safe(args)?))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            data_dir: matches.value_of("data_dir").unwrap_or_default().to_string(),
            comment_char: matches
                .value_of("comment_char")
                .and_then(|value| value.chars().next())
                .unwrap_or(DEFAULT_COMMENT_CHAR),
            verbosity: matches.occurrences_of("verbose"),
        }
    }

    /// The default log filter for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
