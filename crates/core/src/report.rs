//! Start-up failure reporting.
//!
//! A failed start is shown to the user once and then abandoned. The host
//! supplies a [`Reporter`] (an alert in the browser, a closure in tests)
//! and routes the start-up result through [`report_failure`].

use crate::error::SwatchError;
use crate::shader::ShaderError;

/// Receives the user-facing message for a failed start.
pub trait Reporter {
    fn report(&mut self, message: &str);
}

impl<F: FnMut(&str)> Reporter for F {
    fn report(&mut self, message: &str) {
        self(message)
    }
}

/// The message shown to the user when start-up fails.
pub fn failure_message(err: &SwatchError) -> String {
    match err {
        SwatchError::ContextUnavailable(_) => {
            "Unable to initialize WebGL. Your browser may not support it.".to_string()
        }
        SwatchError::Shader(ShaderError::CompileError { stage, log }) => {
            format!("An error occurred compiling the {stage} shader:\n{log}")
        }
        SwatchError::Shader(ShaderError::LinkError(log)) => {
            format!("Unable to initialize the shader program: {log}")
        }
        other => format!("Unable to start: {other}"),
    }
}

/// Passes `Ok` through untouched. On `Err`, logs the failure message, hands
/// it to `reporter` exactly once and returns it.
pub fn report_failure<T, R>(result: Result<T, SwatchError>, reporter: &mut R) -> Result<T, String>
where
    R: Reporter + ?Sized,
{
    result.map_err(|err| {
        let message = failure_message(&err);
        log::error!("{message}");
        reporter.report(&message);
        message
    })
}
