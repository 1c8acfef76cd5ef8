// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

//! Run-time OpenGL entry point loader.
//!
//! A [`Loader`] owns one slot per entry point of a [`Registry`] and fills the slots
//! with addresses from a single resolution [`Strategy`]:
//!
//! - [`Strategy::Module`] opens the platform's GL module and looks symbols up by name.
//! - [`Strategy::Native`] asks the platform's own proc-address function.
//! - [`Strategy::Callback`] asks a proc-address function supplied by the caller,
//!   usually a windowing toolkit.
//!
//! Loading is idempotent and stops at the first entry point that cannot be resolved.
//!
//! ```no_run
//! use gload::{gl, Loader};
//!
//! let mut loader = Loader::builder(&gl::REGISTRY)
//! 	.up_to(gl::GL_VERSION_3_3)
//! 	.build()
//! 	.unwrap();
//! loader.load().unwrap();
//! assert!(loader.is_loaded(gl::GL_VERSION_3_3));
//! loader.unload();
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

// `registry!` expands to `::gload::` paths, which inside this crate must resolve to `self`.
extern crate self as gload;

macro_rules! diag {
	($verbose:expr, $lvl:ident, $($arg:tt)+) => {
		if $verbose {
			::log::$lvl!(target: "gload", $($arg)+);
		}
	};
}

mod builder;
pub mod error;
pub mod gl;
pub mod library;
mod loader;
mod os;
pub mod registry;
pub mod strategy;
mod sym;

use std::ffi;

pub use builder::LoaderBuilder;
pub use error::{Error, ErrorKind};
pub use gload_macro::registry;
pub use library::{Dylib, Library, System};
pub use loader::{drive, LoadState, Loader};
pub use os::DEFAULT_CANDIDATES;
pub use registry::{Feature, FeatureId, Registry, SymbolId};
pub use strategy::{RawResolver, Strategy};
pub use sym::Proc;

/// The result of a gload function
pub type Result<T> = std::result::Result<T, Error>;

/// Builds a loader for the whole bundled GL registry with the default strategy, and
/// loads it.
///
/// This needs every core and compatibility command up to GL 4.6. Narrow the scope with
/// [`LoaderBuilder::up_to`] for anything less.
pub fn load_gl() -> Result<Loader> {
	let mut loader = Loader::gl()?;
	loader.load()?;
	Ok(loader)
}

/// Builds a loader for the bundled GL registry and loads it through `resolver`.
pub fn load_gl_with<F>(resolver: F) -> Result<Loader>
where
	F: FnMut(&str) -> *const ffi::c_void + Send + 'static,
{
	let mut loader = LoaderBuilder::new(&gl::REGISTRY).callback(resolver).build()?;
	loader.load()?;
	Ok(loader)
}
