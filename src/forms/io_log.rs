// Logging setup: every record goes to the standard error and to a log file per run.

use std::io::{self, Write};

use chrono::{Local, NaiveDateTime};
use env_logger::{Builder, Env, Target};

use crate::forms::*;

pub const LOG_FILE_PREFIX: &str = "awardforms";
const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The name of the log file of a run: `awardforms_{YYYY-mm-dd_HH-MM-SS}.log`.
pub fn log_file_name(started: &NaiveDateTime) -> String {
    format!(
        "{}_{}.log",
        LOG_FILE_PREFIX,
        started.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Creates the log file of a run, and the log directory when needed.
pub fn create_log_file(log_dir: &Path, started: &NaiveDateTime) -> FResult<(PathBuf, fs::File)> {
    fs::create_dir_all(log_dir).context(IoSnafu {
        path: log_dir.display().to_string(),
    })?;
    let path = log_dir.join(log_file_name(started));
    let file = fs::File::create(&path).context(IoSnafu {
        path: path.display().to_string(),
    })?;
    Ok((path, file))
}

/// Writes everything to both writers.
pub struct Tee<A: Write, B: Write> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> Tee<A, B> {
    pub fn new(first: A, second: B) -> Tee<A, B> {
        Tee { first, second }
    }
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}

/// Installs the logger. `level` is the filter used when RUST_LOG is not set.
/// Falls back to the standard error alone when the log file cannot be created.
pub fn init_logging(level: &str, log_dir: &Path, started: &NaiveDateTime) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(level));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {} - {}: {}",
            Local::now().format(LOG_TIME_FORMAT),
            record.level(),
            record.module_path().unwrap_or_else(|| record.target()),
            record.args()
        )
    });
    match create_log_file(log_dir, started) {
        Ok((path, file)) => {
            builder.target(Target::Pipe(Box::new(Tee::new(file, io::stderr()))));
            builder.init();
            info!("Logging to {}", path.display());
        }
        Err(e) => {
            builder.init();
            warn!("No log file for this run: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn started() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    #[test]
    fn log_file_is_named_after_the_start_of_the_run() {
        assert_eq!(log_file_name(&started()), "awardforms_2024-03-01_14-05-09.log");
    }

    #[test]
    fn creates_the_log_directory() {
        let dir = std::env::temp_dir().join(format!("awardforms-log-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let (path, mut file) = create_log_file(&dir.join("logs"), &started()).unwrap();
        assert_eq!(path, dir.join("logs").join("awardforms_2024-03-01_14-05-09.log"));
        writeln!(file, "hello").unwrap();
        drop(file);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn tee_writes_to_both_sides() {
        let mut tee = Tee::new(Vec::new(), Vec::new());
        write!(tee, "{} {}", "INFO", "line").unwrap();
        tee.flush().unwrap();
        assert_eq!(tee.first, b"INFO line".to_vec());
        assert_eq!(tee.second, b"INFO line".to_vec());
    }
}
