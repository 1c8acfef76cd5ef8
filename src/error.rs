// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	Config,
	ModuleNotFound,
	SymbolNotFound,
	InvalidArgument,
}

/// The error type for loader operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The loader was configured in a way it cannot run.
	#[error("gload error: invalid configuration: {0}")]
	Config(String),
	/// None of the candidate modules could be opened.
	#[error("gload error: no module could be opened from {candidates:?}: {reason}")]
	ModuleNotFound {
		candidates: Vec<String>,
		reason: String,
	},
	/// The resolver returned nothing for a symbol.
	#[error("gload error: function `{0}` not found")]
	SymbolNotFound(String),
	/// An argument was rejected before any work was done, such as a null resolver.
	#[error("gload error: invalid argument: {0}")]
	InvalidArgument(&'static str),
}

impl Error {
	#[inline]
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Config(_) => ErrorKind::Config,
			Self::ModuleNotFound { .. } => ErrorKind::ModuleNotFound,
			Self::SymbolNotFound(_) => ErrorKind::SymbolNotFound,
			Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
		}
	}

	/// Name of the symbol that failed to resolve, if this is a symbol error.
	pub fn symbol(&self) -> Option<&str> {
		match self {
			Self::SymbolNotFound(name) => Some(name.as_str()),
			_ => None,
		}
	}
}
