// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::{ffi, fmt};

use crate::library::{Dylib, Library};
use crate::{os, Error, Proc, Result};

/// A C-ABI proc-address function, as handed out by windowing toolkits
/// (`glfwGetProcAddress`, `SDL_GL_GetProcAddress`, ...).
pub type RawResolver = unsafe extern "C" fn(*const ffi::c_char) -> *const ffi::c_void;

/// A Rust proc-address callback. Returning null means "not found".
pub type Callback = Box<dyn FnMut(&str) -> *const ffi::c_void + Send>;

/// How a [`Loader`](crate::Loader) turns entry point names into addresses.
///
/// Exactly one strategy is chosen when the loader is built.
#[derive(Default)]
pub enum Strategy {
	/// Open the platform's GL module and look symbols up by name. The default.
	#[default]
	Module,
	/// Ask the platform's own proc-address function (`glXGetProcAddressARB`,
	/// `wglGetProcAddress`), found in the platform's GL module.
	Native,
	/// Ask a caller-supplied proc-address function. No module is opened.
	Callback(Callback),
}

impl Strategy {
	/// Wraps a Rust closure as a callback strategy.
	pub fn callback<F>(f: F) -> Self
	where
		F: FnMut(&str) -> *const ffi::c_void + Send + 'static,
	{
		Self::Callback(Box::new(f))
	}

	/// Wraps a C-ABI proc-address function as a callback strategy.
	pub fn raw(f: RawResolver) -> Self {
		Self::callback(move |name| call_raw(f, name))
	}

	pub fn name(&self) -> &'static str {
		match self {
			Self::Module => "module",
			Self::Native => "native",
			Self::Callback(_) => "callback",
		}
	}

	pub(crate) fn uses_module(&self) -> bool {
		!matches!(self, Self::Callback(_))
	}
}

impl fmt::Debug for Strategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Hands `f` a NUL-terminated copy of `name`. Names with an interior NUL are never
/// exported, so they resolve to null without calling `f`.
fn with_c_name<F>(name: &str, f: F) -> *const ffi::c_void
where
	F: FnOnce(*const ffi::c_char) -> *const ffi::c_void,
{
	match ffi::CString::new(name) {
		Ok(c_name) => f(c_name.as_ptr()),
		Err(_) => std::ptr::null(),
	}
}

/// Calls a raw resolver with a NUL-terminated copy of `name`.
pub(crate) fn call_raw(f: RawResolver, name: &str) -> *const ffi::c_void {
	with_c_name(name, |c_name| unsafe { f(c_name) })
}

/// The live form of a [`Strategy`], owning whatever state it needs.
pub(crate) enum Backend<D: Dylib> {
	Module(Library<D>),
	Native {
		library: Library<D>,
		proc_fn: Option<os::NativeProcFn>,
	},
	Callback(Callback),
}

impl<D: Dylib> Backend<D> {
	pub(crate) fn new(strategy: Strategy, library: Library<D>) -> Self {
		match strategy {
			Strategy::Module => Self::Module(library),
			Strategy::Native => Self::Native {
				library,
				proc_fn: None,
			},
			Strategy::Callback(f) => Self::Callback(f),
		}
	}

	pub(crate) fn library(&self) -> Option<&Library<D>> {
		match self {
			Self::Module(library) | Self::Native { library, .. } => Some(library),
			Self::Callback(_) => None,
		}
	}

	pub(crate) fn resolve(&mut self, name: &str) -> Result<Proc> {
		match self {
			Self::Module(library) => library.resolve_symbol(name),
			Self::Native { library, proc_fn } => {
				let f = match *proc_fn {
					Some(f) => f,
					None => {
						let f = native_proc_fn(library)?;
						*proc_fn = Some(f);
						f
					}
				};
				let addr = with_c_name(name, |c_name| unsafe { f(c_name) });
				if os::is_failed_proc(addr) {
					Err(Error::SymbolNotFound(name.to_owned()))
				} else {
					Proc::new(addr).ok_or_else(|| Error::SymbolNotFound(name.to_owned()))
				}
			}
			Self::Callback(f) => Proc::new(f(name)).ok_or_else(|| Error::SymbolNotFound(name.to_owned())),
		}
	}

	/// Closes the module if this backend opened one.
	pub(crate) fn release(&mut self) -> std::io::Result<()> {
		match self {
			Self::Module(library) => library.release(),
			Self::Native { library, proc_fn } => {
				// the function lives in the module being closed
				*proc_fn = None;
				library.release()
			}
			Self::Callback(_) => Ok(()),
		}
	}
}

fn native_proc_fn<D: Dylib>(library: &mut Library<D>) -> Result<os::NativeProcFn> {
	library.ensure_handle()?;
	for name in os::NATIVE_PROC_NAMES {
		if let Ok(addr) = library.resolve_symbol(name) {
			return Ok(unsafe { addr.cast::<os::NativeProcFn>() });
		}
	}
	Err(Error::SymbolNotFound(
		os::NATIVE_PROC_NAMES.first().copied().unwrap_or("<native proc-address>").to_owned(),
	))
}
