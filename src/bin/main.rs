use dealership::args::Args;
use dealership::console::TerminalPasswordReader;
use dealership::db::DealershipDb;
use dealership::menu::Session;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level())),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    let db = match DealershipDb::open(&args.data_dir, args.comment_char) {
        Ok(db) => db,
        Err(err) => {
            eprintln!("failed to open data directory: {}", err);
            process::exit(1);
        }
    };

    let dealership = match db.load_dealership(&mut io::stderr()) {
        Ok(dealership) => dealership,
        Err(err) => {
            eprintln!("Error loading database: {}", err);
            process::exit(1);
        }
    };

    let mut session = Session::new(
        &dealership,
        io::stdin().lock(),
        io::stdout(),
        TerminalPasswordReader,
    );
    if let Err(err) = session.run() {
        eprintln!("session ended unexpectedly: {}", err);
        process::exit(1);
    }
}
