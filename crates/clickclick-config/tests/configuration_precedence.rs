use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use clickclick_config::{Config, LogFormat, PROGRAM_NAME};

// Scenarios share the process environment.
static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct Harness {
    temp_dir: TempDir,
    args: RefCell<Vec<OsString>>,
    restore: RefCell<Vec<(String, Option<OsString>)>>,
    loaded: RefCell<Option<Config>>,
    error: RefCell<Option<String>>,
    _env: MutexGuard<'static, ()>,
}

impl Harness {
    fn new() -> Self {
        let env = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let temp_dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(error) => panic!("failed to create temporary directory: {error}"),
        };
        Self {
            temp_dir,
            args: RefCell::new(vec![OsString::from(PROGRAM_NAME)]),
            restore: RefCell::new(Vec::new()),
            loaded: RefCell::new(None),
            error: RefCell::new(None),
            _env: env,
        }
    }

    fn write_config(&self, contents: &str) {
        let path = self.temp_dir.path().join("clickclick.toml");
        if let Err(error) = fs::write(&path, contents) {
            panic!("failed to write configuration: {error}");
        }
        let mut args = self.args.borrow_mut();
        args.push(OsString::from("--config-path"));
        args.push(path.into_os_string());
    }

    fn set_env(&self, key: &str, value: &str) {
        let previous = std::env::var_os(key);
        // Edition 2024 marks environment mutation unsafe; `ENV_LOCK` serialises
        // access and `Drop` restores the previous value.
        unsafe { std::env::set_var(key, value) };
        self.restore.borrow_mut().push((key.to_owned(), previous));
    }

    fn push_args(&self, flag: &str, value: &str) {
        let mut args = self.args.borrow_mut();
        args.push(OsString::from(flag));
        args.push(OsString::from(value));
    }

    fn load(&self) {
        if self.loaded.borrow().is_some() || self.error.borrow().is_some() {
            return;
        }
        let args = self.args.borrow().clone();
        match Config::resolve_from_args(args) {
            Ok(config) => *self.loaded.borrow_mut() = Some(config),
            Err(error) => *self.error.borrow_mut() = Some(error.to_string()),
        }
    }

    fn config(&self) -> Config {
        self.load();
        if let Some(error) = self.error.borrow().as_ref() {
            panic!("configuration failed to load: {error}");
        }
        match self.loaded.borrow().as_ref() {
            Some(config) => config.clone(),
            None => panic!("configuration was not loaded"),
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let mut restore = self.restore.borrow_mut();
        while let Some((key, previous)) = restore.pop() {
            match previous {
                Some(value) => unsafe { std::env::set_var(&key, value) },
                None => unsafe { std::env::remove_var(&key) },
            }
        }
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

fn strip_quotes(value: &str) -> &str {
    value.trim_matches('"')
}

#[given("a configuration file setting the log filter to {filter}")]
fn given_configuration_file(harness: &Harness, filter: String) {
    harness.write_config(&format!("log_filter = \"{}\"\n", strip_quotes(&filter)));
}

#[given("the environment sets {variable} to {value}")]
fn given_environment(harness: &Harness, variable: String, value: String) {
    harness.set_env(strip_quotes(&variable), strip_quotes(&value));
}

#[given("the command line sets {flag} to {value}")]
fn given_command_line(harness: &Harness, flag: String, value: String) {
    harness.push_args(strip_quotes(&flag), strip_quotes(&value));
}

#[when("the configuration loads")]
fn when_configuration_loads(harness: &Harness) {
    harness.load();
}

#[then("the log filter resolves to {filter}")]
fn then_log_filter(harness: &Harness, filter: String) {
    assert_eq!(harness.config().log_filter(), strip_quotes(&filter));
}

#[then("the log format resolves to {format}")]
fn then_log_format(harness: &Harness, format: String) {
    let expected: LogFormat = match strip_quotes(&format).parse() {
        Ok(format) => format,
        Err(error) => panic!("invalid expected format '{format}': {error}"),
    };
    assert_eq!(harness.config().log_format(), expected);
}

#[then("the marker parameter resolves to {parameter}")]
fn then_marker_parameter(harness: &Harness, parameter: String) {
    assert_eq!(
        harness.config().ajax().marker_parameter,
        strip_quotes(&parameter)
    );
}

#[scenario(path = "tests/features/configuration_precedence.feature")]
fn configuration_precedence(#[from(harness)] harness: Harness) {
    drop(harness);
}
