// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::{ffi, fmt, io};

use crate::{os, Error, Proc, Result};

/// Platform primitives for opening a shared module and looking up its exports.
///
/// [`System`] is the real implementation. Custom implementations can be supplied to
/// [`Library`] to change how modules are discovered.
///
/// # Safety
/// `symbol` must only return addresses exported by the opened module, and `close`
/// must release whatever `open` acquired.
pub unsafe trait Dylib: Sized {
	/// Attempts to open a shared module.
	unsafe fn open(path: &str) -> io::Result<Self>;
	/// Retrieves the address of an exported symbol.
	unsafe fn symbol(&self, name: &str) -> io::Result<*const ffi::c_void>;
	/// Decrements the module's reference count, unloading it when it reaches zero.
	unsafe fn close(self) -> io::Result<()>;
}

/// An object providing access to an open shared module on the filesystem.
#[derive(Debug)]
pub struct System(os::Handle);

// internal type is opaque and managed by OS, so it's `Send` safe
unsafe impl Send for System {}

unsafe impl Dylib for System {
	unsafe fn open(path: &str) -> io::Result<Self> {
		os::dylib_open(path).map(Self)
	}

	unsafe fn symbol(&self, name: &str) -> io::Result<*const ffi::c_void> {
		os::dylib_symbol(self.0, name)
	}

	unsafe fn close(self) -> io::Result<()> {
		os::dylib_close(self.0)
	}
}

/// Owns a lazily opened shared module.
///
/// The candidate list is tried by priority (index `0` is highest), and only the first
/// module that opens is used. This provides a fallback in case the module has a
/// variety of names or lives in a separate directory.
///
/// The module stays open until [`release`](Library::release) is called, even if the
/// `Library` itself is dropped, so resolved addresses stay valid.
pub struct Library<D: Dylib = System> {
	candidates: Vec<String>,
	// index of the candidate that opened, and its handle
	hlib: Option<(usize, D)>,
	verbose: bool,
}

impl<D: Dylib> Library<D> {
	/// Constructs a new `Library` over a custom [`Dylib`] that will probe
	/// `candidates` in order.
	pub fn with_dylib<I, S>(candidates: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			candidates: candidates.into_iter().map(Into::into).collect(),
			hlib: None,
			verbose: cfg!(feature = "verbose"),
		}
	}

	pub fn with_verbose(mut self, verbose: bool) -> Self {
		self.verbose = verbose;
		self
	}

	#[inline]
	pub fn candidates(&self) -> &[String] {
		&self.candidates
	}

	#[inline]
	pub fn is_open(&self) -> bool {
		self.hlib.is_some()
	}

	/// The candidate the held module was opened from.
	pub fn opened_candidate(&self) -> Option<&str> {
		self.hlib
			.as_ref()
			.map(|(index, _)| self.candidates[*index].as_str())
	}

	/// Returns the held module, opening it first if needed.
	///
	/// # Errors
	/// Fails if no candidate could be opened. Nothing is held afterwards, so a later
	/// call probes the candidates again.
	pub fn ensure_handle(&mut self) -> Result<&D> {
		let hlib = match self.hlib.take() {
			Some(hlib) => hlib,
			None => self.open_first()?,
		};
		Ok(&self.hlib.insert(hlib).1)
	}

	fn open_first(&self) -> Result<(usize, D)> {
		let mut last_error = None;
		for (index, path) in self.candidates.iter().enumerate() {
			match unsafe { D::open(path) } {
				Ok(handle) => {
					diag!(self.verbose, debug, "opened module `{path}`");
					return Ok((index, handle));
				}
				Err(e) => {
					diag!(self.verbose, debug, "failed to open module `{path}`: {e}");
					last_error = Some(e);
				}
			}
		}
		diag!(
			self.verbose,
			warn,
			"no module could be opened from {:?}",
			self.candidates
		);
		Err(Error::ModuleNotFound {
			candidates: self.candidates.clone(),
			reason: last_error.map_or_else(|| "no candidates given".to_owned(), |e| e.to_string()),
		})
	}

	/// Looks up `name` in the held module, opening it first if needed.
	pub fn resolve_symbol(&mut self, name: &str) -> Result<Proc> {
		let verbose = self.verbose;
		let handle = self.ensure_handle()?;
		match unsafe { handle.symbol(name) } {
			Ok(addr) => Proc::new(addr).ok_or_else(|| Error::SymbolNotFound(name.to_owned())),
			Err(e) => {
				diag!(verbose, debug, "symbol `{name}` not found: {e}");
				Err(Error::SymbolNotFound(name.to_owned()))
			}
		}
	}

	/// Closes the held module. Does nothing if no module is held.
	///
	/// # Errors
	/// Reports the platform's close error. The handle is dropped either way.
	pub fn release(&mut self) -> io::Result<()> {
		match self.hlib.take() {
			Some((index, handle)) => {
				diag!(
					self.verbose,
					debug,
					"closing module `{}`",
					self.candidates[index]
				);
				unsafe { handle.close() }
			}
			None => Ok(()),
		}
	}
}

impl Library<System> {
	/// Constructs a new `Library` that will probe `candidates` in order.
	///
	/// # Examples
	/// ```no_run
	/// # use gload::*;
	/// let mut libgl = Library::new(["libGL.so.1", "libGL.so"]);
	/// let clear = libgl.resolve_symbol("glClear").unwrap();
	/// ```
	pub fn new<I, S>(candidates: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::with_dylib(candidates)
	}

	/// A `Library` over the platform's default OpenGL module candidates.
	pub fn gl() -> Self {
		Self::new(os::DEFAULT_CANDIDATES.iter().copied())
	}
}

impl<D: Dylib> fmt::Debug for Library<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Library")
			.field("candidates", &self.candidates)
			.field("opened", &self.opened_candidate())
			.finish()
	}
}
