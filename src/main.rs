use clap::Parser;
use log::debug;
use snafu::ErrorCompat;

mod args;
mod forms;

fn exit_with(e: &forms::FormsError) -> ! {
    eprintln!("An error occured: {}", e);
    if let Some(bt) = ErrorCompat::backtrace(e) {
        eprintln!("{}", bt);
    }
    std::process::exit(1);
}

fn main() {
    let args = args::Args::parse();
    let started = chrono::Local::now().naive_local();

    // The configuration tells where the log file goes, so it is read first.
    let config = match forms::config_reader::read_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => exit_with(&e),
    };

    let level = if args.verbose || forms::config_reader::debug_enabled() {
        "debug"
    } else {
        "info"
    };
    forms::io_log::init_logging(level, &config.log_dir(), &started);
    debug!("args: {:?}", args);
    debug!("config: {:?}", config);

    if let Err(e) = forms::run(&args, &config) {
        exit_with(&e);
    }
}
