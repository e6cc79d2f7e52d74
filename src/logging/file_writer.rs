//! Daily-rotating file writer
//!
//! A `LogWriter` owns one open file named for the UTC date it was opened on.
//! Every emission checks, under the writer's lock, whether the date has moved
//! on or the file has disappeared, and reopens before writing if so.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDate, Utc};

use super::clock::{Clock, SystemClock};
use super::color::ColorAssociation;
use super::error::LogError;
use super::level::LogLevel;
use super::painter::Painter;

/// Settings captured once when a writer is built
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Directory the daily files are written to
    pub directory: PathBuf,
    /// Level used when `configure` is called without an explicit level
    pub default_level: LogLevel,
    /// Color policy applied to every message
    pub colors: ColorAssociation,
    /// Leading part of every file name, normally the executable's basename
    pub program_name: String,
}

impl LoggerConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            default_level: LogLevel::Error,
            colors: ColorAssociation::disabled(),
            program_name: program_name(),
        }
    }

    pub fn with_default_level(mut self, level: LogLevel) -> Self {
        self.default_level = level;
        self
    }

    pub fn with_colors(mut self, colors: ColorAssociation) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }
}

/// Basename of the running executable
pub fn program_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "ilog".to_string())
}

/// File name for a given program and date: `<program>i_<YYYY>_<MM>_<DD>.log`
pub fn log_file_name(program: &str, date: NaiveDate) -> String {
    format!("{}i_{}.log", program, date.format("%Y_%m_%d"))
}

/// Render one output line: `YYYY/MM/DD HH:MM:SS file.rs:LINE: message`
fn format_line(now: DateTime<Utc>, location: &Location<'_>, message: &str) -> String {
    let file = Path::new(location.file())
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| location.file().into());

    let mut line = format!(
        "{} {}:{}: {}",
        now.format("%Y/%m/%d %H:%M:%S"),
        file,
        location.line(),
        message
    );
    if !line.ends_with('\n') {
        line.push('\n');
    }
    line
}

struct WriterState {
    directory: PathBuf,
    level: LogLevel,
    date: Option<NaiveDate>,
    file: Option<File>,
    path: Option<PathBuf>,
}

impl WriterState {
    fn needs_reopen(&self, today: NaiveDate) -> bool {
        if self.file.is_none() || self.date != Some(today) {
            return true;
        }
        match &self.path {
            Some(path) => !path.exists(),
            None => true,
        }
    }

    fn close(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(e) = file.sync_all() {
                tracing::warn!(
                    "unable to close logger ({}): {}",
                    self.path.as_deref().unwrap_or(Path::new("")).display(),
                    e
                );
            }
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), LogError> {
        let path = self.path.clone().unwrap_or_default();
        let Some(file) = self.file.as_mut() else {
            return Err(LogError::Write {
                path,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "log file not open"),
            });
        };

        file.write_all(line.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|source| LogError::Write { path, source })
    }
}

/// Leveled writer for one directory of daily log files
///
/// Share it through an `Arc`. All state changes and writes are serialized
/// by an internal mutex; the level gate is checked against an atomic copy of
/// the threshold so filtered calls never take the lock.
pub struct LogWriter {
    state: Mutex<WriterState>,
    threshold: AtomicU8,
    default_level: LogLevel,
    program_name: String,
    painter: Painter,
    clock: Arc<dyn Clock>,
}

impl LogWriter {
    /// Create an unopened writer using the system clock
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an unopened writer with a custom time source
    pub fn with_clock(config: LoggerConfig, clock: Arc<dyn Clock>) -> Self {
        let LoggerConfig {
            directory,
            default_level,
            colors,
            program_name,
        } = config;

        Self {
            state: Mutex::new(WriterState {
                directory,
                level: default_level,
                date: None,
                file: None,
                path: None,
            }),
            threshold: AtomicU8::new(default_level.value()),
            default_level,
            program_name,
            painter: Painter::new(colors),
            clock,
        }
    }

    /// Create a writer and open today's file in the configured directory
    pub fn open(config: LoggerConfig) -> Result<Self, LogError> {
        let directory = config.directory.clone();
        let writer = Self::new(config);
        writer.configure(directory, None)?;
        Ok(writer)
    }

    fn lock(&self) -> MutexGuard<'_, WriterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Point the writer at `directory` and (re)open today's file
    ///
    /// `level` `None` resets the threshold to the configured default.
    pub fn configure(
        &self,
        directory: impl AsRef<Path>,
        level: Option<LogLevel>,
    ) -> Result<(), LogError> {
        let mut state = self.lock();
        state.directory = directory.as_ref().to_path_buf();
        self.open_or_rotate(&mut state, level)
    }

    fn open_or_rotate(
        &self,
        state: &mut WriterState,
        level: Option<LogLevel>,
    ) -> Result<(), LogError> {
        if state.directory.as_os_str().is_empty() {
            return Err(LogError::EmptyDirectory);
        }

        create_log_dir(&state.directory).map_err(|source| LogError::CreateDirectory {
            path: state.directory.clone(),
            source,
        })?;

        state.close();

        let level = level.unwrap_or(self.default_level);
        state.level = level;
        self.threshold.store(level.value(), Ordering::Release);

        let date = self.clock.now().date_naive();
        let path = state
            .directory
            .join(log_file_name(&self.program_name, date));

        let file = open_log_file(&path).map_err(|source| LogError::OpenFile {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Opened log file {}", path.display());

        state.file = Some(file);
        state.path = Some(path);
        state.date = Some(date);
        Ok(())
    }

    /// Set the threshold from a level name; unknown names select `Error`
    pub fn set_level(&self, name: &str) {
        self.set_log_level(LogLevel::from_name_or_error(name));
    }

    /// Set the threshold
    pub fn set_log_level(&self, level: LogLevel) {
        let mut state = self.lock();
        state.level = level;
        self.threshold.store(level.value(), Ordering::Release);
    }

    /// Current threshold
    pub fn level(&self) -> LogLevel {
        LogLevel::from_value(self.threshold.load(Ordering::Acquire)).unwrap_or_default()
    }

    /// Whether a message at `level` would currently be written
    pub fn enabled(&self, level: LogLevel) -> bool {
        level.passes(self.level())
    }

    /// Path of the open file, if any
    pub fn current_path(&self) -> Option<PathBuf> {
        let state = self.lock();
        state.file.as_ref().and(state.path.clone())
    }

    /// Write a message without a prefix, returning sink failures to the caller
    #[track_caller]
    pub fn try_log(&self, level: LogLevel, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        self.emit(level, "", args, Location::caller(), Gate::Threshold)
    }

    /// Write a message without a prefix
    ///
    /// If the file cannot be reopened or written, the process exits.
    #[track_caller]
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.write_or_exit(level, "", args, Location::caller());
    }

    /// Write regardless of the threshold
    #[track_caller]
    pub fn mandatory(&self, args: fmt::Arguments<'_>) {
        self.write_or_exit(LogLevel::Mandatory, "", args, Location::caller());
    }

    /// Write an error value's description at `Error`
    #[track_caller]
    pub fn error(&self, err: &dyn std::error::Error) {
        self.write_or_exit(
            LogLevel::Error,
            "",
            format_args!("{}", err),
            Location::caller(),
        );
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.leveled(LogLevel::Error, args, Location::caller());
    }

    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.leveled(LogLevel::Warn, args, Location::caller());
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.leveled(LogLevel::Info, args, Location::caller());
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.leveled(LogLevel::Debug, args, Location::caller());
    }

    /// Sync the open file to disk
    pub fn flush(&self) -> Result<(), LogError> {
        let state = self.lock();
        match (&state.file, &state.path) {
            (Some(file), Some(path)) => file.sync_data().map_err(|source| LogError::Write {
                path: path.clone(),
                source,
            }),
            _ => Ok(()),
        }
    }

    /// Sync and close the open file
    ///
    /// A later emission reopens it.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        state.close();
        state.date = None;
    }

    fn leveled(
        &self,
        level: LogLevel,
        args: fmt::Arguments<'_>,
        location: &'static Location<'static>,
    ) {
        self.write_or_exit(level, level.prefix(), args, location);
    }

    pub(crate) fn write_or_exit(
        &self,
        level: LogLevel,
        prefix: &str,
        args: fmt::Arguments<'_>,
        location: &'static Location<'static>,
    ) {
        if let Err(e) = self.emit(level, prefix, args, location, Gate::Threshold) {
            super::termination::exit_on_sink_error(&e);
        }
    }

    /// Like `write_or_exit`, but never filtered by the threshold
    ///
    /// The line is still painted with `level`'s color.
    pub(crate) fn write_unfiltered_or_exit(
        &self,
        level: LogLevel,
        args: fmt::Arguments<'_>,
        location: &'static Location<'static>,
    ) {
        if let Err(e) = self.emit(level, "", args, location, Gate::Bypass) {
            super::termination::exit_on_sink_error(&e);
        }
    }

    fn emit(
        &self,
        level: LogLevel,
        prefix: &str,
        args: fmt::Arguments<'_>,
        location: &'static Location<'static>,
        gate: Gate,
    ) -> Result<(), LogError> {
        let filtered = gate == Gate::Threshold;
        if filtered && !self.enabled(level) {
            return Ok(());
        }

        let message = if prefix.is_empty() {
            args.to_string()
        } else {
            format!("{}{}", prefix, args)
        };
        let painted = self.painter.paint(level, &message);

        let mut state = self.lock();
        // The threshold may have changed while waiting for the lock
        if filtered && !level.passes(state.level) {
            return Ok(());
        }

        let now = self.clock.now();
        if state.needs_reopen(now.date_naive()) {
            let current = state.level;
            self.open_or_rotate(&mut state, Some(current))?;
        }

        state.write_line(&format_line(now, location, &painted))
    }
}

/// Whether `emit` applies the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Threshold,
    Bypass,
}

fn create_log_dir(path: &Path) -> std::io::Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(path)
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    options.open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::clock::ManualClock;
    use crate::logging::color::ColorRecord;
    use crossterm::style::{Color, Stylize};
    use std::collections::HashSet;
    use std::fs;
    use std::sync::Barrier;
    use std::thread;
    use tempfile::TempDir;

    use chrono::{Duration, TimeZone};

    const PROGRAM: &str = "test";

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn writer_at(dir: &Path, now: DateTime<Utc>, level: LogLevel) -> (LogWriter, ManualClock) {
        let clock = ManualClock::new(now);
        let config = LoggerConfig::new(dir).with_program_name(PROGRAM);
        let writer = LogWriter::with_clock(config, Arc::new(clock.clone()));
        writer.configure(dir, Some(level)).unwrap();
        (writer, clock)
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn log_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".log"))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_log_file_name() {
        assert_eq!(log_file_name("server", date(2026, 3, 7)), "serveri_2026_03_07.log");
    }

    #[test]
    fn test_configure_opens_todays_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("logs");
        let (writer, _clock) = writer_at(&dir, at(2026, 5, 4, 12, 0, 0), LogLevel::Info);

        let path = writer.current_path().unwrap();
        assert_eq!(path, dir.join("testi_2026_05_04.log"));
        assert!(path.exists());
        assert_eq!(writer.level(), LogLevel::Info);
    }

    #[cfg(unix)]
    #[test]
    fn test_created_paths_have_no_group_or_world_write() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("logs");
        let (writer, _clock) = writer_at(&dir, at(2026, 5, 4, 12, 0, 0), LogLevel::Info);

        let dir_mode = fs::metadata(&dir).unwrap().permissions().mode();
        let file_mode = fs::metadata(writer.current_path().unwrap())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(dir_mode & 0o022, 0);
        assert_eq!(file_mode & 0o022, 0);
    }

    #[test]
    fn test_empty_directory_is_rejected() {
        let writer = LogWriter::new(LoggerConfig::new("").with_program_name(PROGRAM));
        assert!(matches!(
            writer.configure("", None),
            Err(LogError::EmptyDirectory)
        ));
        assert!(matches!(
            writer.try_log(LogLevel::Mandatory, format_args!("nowhere")),
            Err(LogError::EmptyDirectory)
        ));
        assert!(writer.current_path().is_none());
    }

    #[test]
    fn test_unusable_directory_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let writer = LogWriter::new(LoggerConfig::new(&blocker).with_program_name(PROGRAM));
        let result = writer.configure(blocker.join("logs"), None);
        assert!(matches!(result, Err(LogError::CreateDirectory { .. })));
    }

    #[test]
    fn test_missing_level_uses_configured_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = LoggerConfig::new(temp_dir.path())
            .with_program_name(PROGRAM)
            .with_default_level(LogLevel::Warn);
        let writer = LogWriter::new(config);

        writer.configure(temp_dir.path(), Some(LogLevel::Debug)).unwrap();
        assert_eq!(writer.level(), LogLevel::Debug);

        writer.configure(temp_dir.path(), None).unwrap();
        assert_eq!(writer.level(), LogLevel::Warn);
    }

    #[test]
    fn test_open_uses_config_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config = LoggerConfig::new(temp_dir.path())
            .with_program_name(PROGRAM)
            .with_default_level(LogLevel::Info);
        let writer = LogWriter::open(config).unwrap();

        let path = writer.current_path().unwrap();
        assert_eq!(path.parent(), Some(temp_dir.path()));
        assert_eq!(writer.level(), LogLevel::Info);
    }

    #[test]
    fn test_info_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let (writer, _clock) = writer_at(temp_dir.path(), at(2026, 5, 4, 9, 30, 0), LogLevel::Info);
        let path = writer.current_path().unwrap();

        crate::infof!(writer, "hello {}", "world");
        let lines = read_lines(&path);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("INFO - hello world"), "{}", lines[0]);

        crate::debugf!(writer, "skip");
        assert_eq!(read_lines(&path).len(), 1);
    }

    #[test]
    fn test_line_has_timestamp_and_call_site() {
        let temp_dir = TempDir::new().unwrap();
        let (writer, _clock) = writer_at(temp_dir.path(), at(2026, 5, 4, 9, 30, 15), LogLevel::Debug);

        writer.warnf(format_args!("disk at {}%", 91));

        let lines = read_lines(&writer.current_path().unwrap());
        assert!(lines[0].starts_with("2026/05/04 09:30:15 file_writer.rs:"), "{}", lines[0]);
        assert!(lines[0].ends_with(": WARN - disk at 91%"), "{}", lines[0]);
    }

    #[test]
    fn test_wrapper_prefixes() {
        let temp_dir = TempDir::new().unwrap();
        let (writer, _clock) = writer_at(temp_dir.path(), at(2026, 5, 4, 9, 0, 0), LogLevel::Debug);

        crate::errorf!(writer, "e");
        crate::warnf!(writer, "w");
        crate::infof!(writer, "i");
        crate::debugf!(writer, "d");
        crate::mandatory!(writer, "m");
        writer.error(&std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));

        let lines = read_lines(&writer.current_path().unwrap());
        let tails: Vec<&str> = lines
            .iter()
            .map(|l| l.splitn(4, ' ').nth(3).unwrap())
            .collect();
        assert_eq!(
            tails,
            vec!["ERROR - e", "WARN - w", "INFO - i", "DEBUG - d", "m", "disk gone"]
        );
    }

    #[test]
    fn test_gate_all_levels_and_thresholds() {
        let temp_dir = TempDir::new().unwrap();
        let (writer, _clock) = writer_at(temp_dir.path(), at(2026, 5, 4, 9, 0, 0), LogLevel::Error);
        let path = writer.current_path().unwrap();

        for threshold in LogLevel::ALL {
            writer.set_log_level(threshold);
            for level in LogLevel::ALL {
                let before = read_lines(&path).len();
                writer.log(level, format_args!("{} at {}", level, threshold));
                let written = read_lines(&path).len() - before;

                let expected = level == LogLevel::Mandatory || level.value() <= threshold.value();
                assert_eq!(written, usize::from(expected), "{} at {}", level, threshold);
            }
        }
    }

    #[test]
    fn test_unknown_level_name_means_error() {
        let temp_dir = TempDir::new().unwrap();
        let (writer, _clock) = writer_at(temp_dir.path(), at(2026, 5, 4, 9, 0, 0), LogLevel::Debug);
        let path = writer.current_path().unwrap();

        writer.set_level("bogus");
        assert_eq!(writer.level(), LogLevel::Error);

        crate::warnf!(writer, "w");
        crate::infof!(writer, "i");
        crate::debugf!(writer, "d");
        assert!(read_lines(&path).is_empty());

        crate::errorf!(writer, "e");
        let lines = read_lines(&path);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("ERROR - e"));
    }

    #[test]
    fn test_set_level_is_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        let (writer, _clock) = writer_at(temp_dir.path(), at(2026, 5, 4, 9, 0, 0), LogLevel::Error);

        writer.set_level("debug");
        assert_eq!(writer.level(), LogLevel::Debug);
        writer.set_level("Warn");
        assert_eq!(writer.level(), LogLevel::Warn);
    }

    #[test]
    fn test_rotates_on_new_day() {
        let temp_dir = TempDir::new().unwrap();
        let (writer, clock) = writer_at(temp_dir.path(), at(2026, 3, 31, 23, 59, 58), LogLevel::Info);
        let old_path = writer.current_path().unwrap();

        crate::infof!(writer, "before midnight");
        clock.advance(Duration::seconds(5));
        crate::infof!(writer, "after midnight");
        crate::infof!(writer, "later");

        let new_path = writer.current_path().unwrap();
        assert_eq!(new_path, temp_dir.path().join("testi_2026_04_01.log"));
        assert_eq!(
            log_files(temp_dir.path()),
            vec!["testi_2026_03_31.log", "testi_2026_04_01.log"]
        );

        let old_lines = read_lines(&old_path);
        assert_eq!(old_lines.len(), 1);
        assert!(old_lines[0].ends_with("before midnight"));

        let new_lines = read_lines(&new_path);
        assert_eq!(new_lines.len(), 2);
        assert!(new_lines[0].ends_with("after midnight"));
    }

    #[test]
    fn test_rotates_when_only_month_changes() {
        let temp_dir = TempDir::new().unwrap();
        let (writer, clock) = writer_at(temp_dir.path(), at(2026, 1, 15, 8, 0, 0), LogLevel::Info);

        clock.set(at(2026, 2, 15, 8, 0, 0));
        crate::infof!(writer, "a month later");

        assert_eq!(
            writer.current_path().unwrap(),
            temp_dir.path().join("testi_2026_02_15.log")
        );
    }

    #[test]
    fn test_reconfigure_names_file_for_today_only() {
        let temp_dir = TempDir::new().unwrap();
        let (writer, clock) = writer_at(temp_dir.path(), at(2026, 5, 30, 10, 0, 0), LogLevel::Info);

        clock.set(at(2026, 6, 1, 10, 0, 0));
        writer.configure(temp_dir.path(), Some(LogLevel::Info)).unwrap();

        let today = temp_dir.path().join("testi_2026_06_01.log");
        assert_eq!(writer.current_path().unwrap(), today);

        crate::infof!(writer, "today");
        assert_eq!(read_lines(&today).len(), 1);

        // Only the file opened on the 30th and today's; no file for any other date
        assert_eq!(
            log_files(temp_dir.path()),
            vec!["testi_2026_05_30.log".to_string(), "testi_2026_06_01.log".to_string()]
        );
    }

    #[test]
    fn test_recreates_deleted_file() {
        let temp_dir = TempDir::new().unwrap();
        let (writer, _clock) = writer_at(temp_dir.path(), at(2026, 5, 4, 9, 0, 0), LogLevel::Info);
        let path = writer.current_path().unwrap();

        crate::infof!(writer, "first");
        fs::remove_file(&path).unwrap();
        assert!(!path.exists());

        crate::infof!(writer, "second");
        assert_eq!(writer.current_path().unwrap(), path);
        let lines = read_lines(&path);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("INFO - second"));
    }

    #[test]
    fn test_recreates_deleted_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("logs");
        let (writer, _clock) = writer_at(&dir, at(2026, 5, 4, 9, 0, 0), LogLevel::Info);

        fs::remove_dir_all(&dir).unwrap();
        crate::mandatory!(writer, "still here");

        let lines = read_lines(&dir.join("testi_2026_05_04.log"));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("still here"));
    }

    #[test]
    fn test_first_emission_opens_unconfigured_writer() {
        let temp_dir = TempDir::new().unwrap();
        let clock = ManualClock::new(at(2026, 5, 4, 9, 0, 0));
        let config = LoggerConfig::new(temp_dir.path())
            .with_program_name(PROGRAM)
            .with_default_level(LogLevel::Info);
        let writer = LogWriter::with_clock(config, Arc::new(clock));
        assert!(writer.current_path().is_none());

        writer
            .try_log(LogLevel::Info, format_args!("lazy open"))
            .unwrap();
        let lines = read_lines(&temp_dir.path().join("testi_2026_05_04.log"));
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_shutdown_then_log_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let (writer, _clock) = writer_at(temp_dir.path(), at(2026, 5, 4, 9, 0, 0), LogLevel::Info);
        let path = writer.current_path().unwrap();

        crate::infof!(writer, "one");
        writer.flush().unwrap();
        writer.shutdown();
        assert!(writer.current_path().is_none());

        crate::infof!(writer, "two");
        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_colors_are_applied_when_enabled() {
        let temp_dir = TempDir::new().unwrap();
        let clock = ManualClock::new(at(2026, 5, 4, 9, 0, 0));
        let colors = ColorAssociation::from_records([ColorRecord::new("error", "red")]);
        let config = LoggerConfig::new(temp_dir.path())
            .with_program_name(PROGRAM)
            .with_colors(colors);
        let writer = LogWriter::with_clock(config, Arc::new(clock));
        writer.configure(temp_dir.path(), Some(LogLevel::Info)).unwrap();

        crate::errorf!(writer, "red alert");
        crate::infof!(writer, "plain");

        let content = fs::read_to_string(writer.current_path().unwrap()).unwrap();
        assert!(content.contains(&"ERROR - red alert".with(Color::Red).to_string()));
        assert!(content.contains(": INFO - plain\n"));
    }

    #[test]
    fn test_bad_color_config_writes_plain_text() {
        let temp_dir = TempDir::new().unwrap();
        let bad = temp_dir.path().join("colors.yaml");
        fs::write(&bad, "{{{ not yaml").unwrap();

        let clock = ManualClock::new(at(2026, 5, 4, 9, 0, 0));
        let config = LoggerConfig::new(temp_dir.path())
            .with_program_name(PROGRAM)
            .with_colors(ColorAssociation::from_path(Some(&bad)));
        let writer = LogWriter::with_clock(config, Arc::new(clock));
        writer.configure(temp_dir.path(), Some(LogLevel::Debug)).unwrap();

        crate::errorf!(writer, "e");
        crate::debugf!(writer, "d");

        let content = fs::read_to_string(writer.current_path().unwrap()).unwrap();
        assert!(!content.contains('\u{1b}'));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_concurrent_callers_after_rollover() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 50;

        let temp_dir = TempDir::new().unwrap();
        let (writer, clock) = writer_at(temp_dir.path(), at(2026, 12, 31, 23, 59, 59), LogLevel::Info);
        crate::infof!(writer, "last of the year");
        let writer = Arc::new(writer);

        clock.set(at(2027, 1, 1, 0, 0, 0));

        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let writer = Arc::clone(&writer);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..PER_THREAD {
                        crate::infof!(writer, "msg {}-{}", t, i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            log_files(temp_dir.path()),
            vec!["testi_2026_12_31.log", "testi_2027_01_01.log"]
        );
        assert_eq!(read_lines(&temp_dir.path().join("testi_2026_12_31.log")).len(), 1);

        let lines = read_lines(&temp_dir.path().join("testi_2027_01_01.log"));
        assert_eq!(lines.len(), THREADS * PER_THREAD);
        let unique: HashSet<&str> = lines
            .iter()
            .map(|l| l.split_once("INFO - ").unwrap().1)
            .collect();
        assert_eq!(unique.len(), THREADS * PER_THREAD);
    }

    #[test]
    fn test_concurrent_callers_across_rollover() {
        const THREADS: usize = 6;
        const PER_THREAD: usize = 100;

        let temp_dir = TempDir::new().unwrap();
        let (writer, clock) = writer_at(temp_dir.path(), at(2026, 7, 9, 23, 59, 59), LogLevel::Info);
        let writer = Arc::new(writer);

        let barrier = Arc::new(Barrier::new(THREADS + 1));
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let writer = Arc::clone(&writer);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..PER_THREAD {
                        crate::infof!(writer, "msg {}-{}", t, i);
                    }
                })
            })
            .collect();

        barrier.wait();
        clock.advance(Duration::seconds(1));
        for handle in handles {
            handle.join().unwrap();
        }
        // Ensure the new day's file exists even if every thread finished early
        crate::mandatory!(writer, "done");

        assert_eq!(
            log_files(temp_dir.path()),
            vec!["testi_2026_07_09.log", "testi_2026_07_10.log"]
        );

        let mut seen = HashSet::new();
        let mut total = 0;
        for name in ["testi_2026_07_09.log", "testi_2026_07_10.log"] {
            for line in read_lines(&temp_dir.path().join(name)) {
                if let Some((_, msg)) = line.split_once("INFO - ") {
                    total += 1;
                    seen.insert(msg.to_string());
                }
            }
        }
        assert_eq!(total, THREADS * PER_THREAD);
        assert_eq!(seen.len(), THREADS * PER_THREAD);
    }
}
