// self
use crate::_prelude::*;

/// Severity levels understood by a [`Logger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
	/// Diagnostic detail.
	Debug,
	/// Routine but noteworthy events, such as token expiry.
	Info,
	/// Accepted responses carrying an application-level error.
	Warning,
	/// Failures surfaced to the caller.
	Error,
	/// Remote service failures.
	Critical,
}
impl LogLevel {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LogLevel::Debug => "debug",
			LogLevel::Info => "info",
			LogLevel::Warning => "warning",
			LogLevel::Error => "error",
			LogLevel::Critical => "critical",
		}
	}
}
impl Display for LogLevel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Structured key/value context attached to a log record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogContext(BTreeMap<&'static str, String>);
impl LogContext {
	/// Creates an empty context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a field, returning the context for chaining.
	pub fn with(mut self, key: &'static str, value: impl Display) -> Self {
		self.0.insert(key, value.to_string());

		self
	}

	/// Returns a field by key.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}
}
impl Display for LogContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		for (idx, (key, value)) in self.0.iter().enumerate() {
			if idx > 0 {
				f.write_str(" ")?;
			}

			write!(f, "{key}={value}")?;
		}

		Ok(())
	}
}

/// Leveled sink the engine reports state transitions to.
///
/// Writing is fire-and-forget: implementations must swallow their own failures.
pub trait Logger
where
	Self: Send + Sync,
{
	/// Writes one record.
	fn write(&self, level: LogLevel, message: &str, context: &LogContext);

	/// Writes a [`LogLevel::Debug`] record.
	fn debug(&self, message: &str, context: &LogContext) {
		self.write(LogLevel::Debug, message, context);
	}

	/// Writes a [`LogLevel::Info`] record.
	fn info(&self, message: &str, context: &LogContext) {
		self.write(LogLevel::Info, message, context);
	}

	/// Writes a [`LogLevel::Warning`] record.
	fn warning(&self, message: &str, context: &LogContext) {
		self.write(LogLevel::Warning, message, context);
	}

	/// Writes a [`LogLevel::Error`] record.
	fn error(&self, message: &str, context: &LogContext) {
		self.write(LogLevel::Error, message, context);
	}

	/// Writes a [`LogLevel::Critical`] record.
	fn critical(&self, message: &str, context: &LogContext) {
		self.write(LogLevel::Critical, message, context);
	}
}

/// Default logger forwarding records to `tracing` events under the `fiscal_open_api` target.
///
/// `tracing` has no critical level, so critical records become `ERROR` events carrying
/// `severity = "critical"`. Without the `tracing` feature this logger discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;
impl Logger for TracingLogger {
	fn write(&self, level: LogLevel, message: &str, context: &LogContext) {
		#[cfg(feature = "tracing")]
		{
			let severity = level.as_str();

			match level {
				LogLevel::Debug =>
					tracing::debug!(target: "fiscal_open_api", severity, %context, "{message}"),
				LogLevel::Info =>
					tracing::info!(target: "fiscal_open_api", severity, %context, "{message}"),
				LogLevel::Warning =>
					tracing::warn!(target: "fiscal_open_api", severity, %context, "{message}"),
				LogLevel::Error | LogLevel::Critical =>
					tracing::error!(target: "fiscal_open_api", severity, %context, "{message}"),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (level, message, context);
		}
	}
}

/// Logger that discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;
impl Logger for NoopLogger {
	fn write(&self, _level: LogLevel, _message: &str, _context: &LogContext) {}
}
