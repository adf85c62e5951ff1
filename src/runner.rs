use std::fmt::Display;

use crate::resource::Report;
use crate::severity::Severity;

type ErrorHandler<E> = Box<dyn FnOnce(&E) -> (Severity, E)>;

/// Runs a check and turns an error into a plugin result.
///
/// Errors are reported as [Severity::Unknown] unless a different handler is set with
/// [Runner::on_error].
pub struct Runner<E> {
    on_error: Option<ErrorHandler<E>>,
}

impl<E: Display> Default for Runner<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Display> Runner<E> {
    pub fn new() -> Self {
        Self { on_error: None }
    }

    pub fn on_error(mut self, f: impl FnOnce(&E) -> (Severity, E) + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Runs `f`. An error is mapped by the handler given to [Runner::on_error], or into an
    /// unknown state if there is none.
    pub fn safe_run<R: Into<Report>>(self, f: impl FnOnce() -> Result<R, E>) -> RunnerResult<E> {
        match f() {
            Ok(report) => RunnerResult::Ok(report.into()),
            Err(err) => {
                let (state, err) = match self.on_error {
                    Some(handler) => handler(&err),
                    None => (Severity::Unknown, err),
                };

                RunnerResult::Err(state, err)
            }
        }
    }
}

pub enum RunnerResult<E> {
    Ok(Report),
    Err(Severity, E),
}

impl<E: Display> RunnerResult<E> {
    pub fn state(&self) -> Severity {
        match self {
            RunnerResult::Ok(report) => report.state(),
            RunnerResult::Err(state, _) => *state,
        }
    }

    pub fn to_nagios_string(&self) -> String {
        match self {
            RunnerResult::Ok(report) => report.to_nagios_string(),
            RunnerResult::Err(state, err) => format!("{}: {:#}", state, err),
        }
    }

    pub fn print_and_exit(self) -> ! {
        println!("{}", self.to_nagios_string());
        std::process::exit(self.state().exit_code());
    }
}
