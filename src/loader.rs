// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::{ffi, fmt, ops::Range};

use crate::library::{Dylib, Library, System};
use crate::registry::{FeatureId, Registry, SymbolId};
use crate::strategy::{self, Backend, RawResolver};
use crate::{Error, LoaderBuilder, Proc, Result};

/// Fills `slots[scope]` with addresses from `resolver`, in registry order.
///
/// Slots that already hold an address are skipped without calling `resolver`.
/// Stops at the first failure; slots filled before it stay filled. A `None`
/// resolver fails before any slot is touched.
///
/// Returns how many slots were filled by this call.
///
/// # Errors
/// Fails with [`ErrorKind::InvalidArgument`](crate::ErrorKind::InvalidArgument), touching
/// no slot, when `resolver` is `None`, `slots` is not as long as the registry, or `scope`
/// is not a range of the registry.
pub fn drive<R>(
	registry: &Registry,
	scope: Range<usize>,
	slots: &mut [Option<Proc>],
	resolver: Option<R>,
) -> Result<usize>
where
	R: FnMut(&str) -> Result<Proc>,
{
	let Some(mut resolve) = resolver else {
		return Err(Error::InvalidArgument("resolver is null"));
	};
	if slots.len() != registry.len() {
		return Err(Error::InvalidArgument("slot count does not match the registry"));
	}
	if scope.start > scope.end || scope.end > registry.len() {
		return Err(Error::InvalidArgument("scope is outside the registry"));
	}
	let names = &registry.names()[scope.clone()];
	let mut filled = 0;
	for (slot, &name) in slots[scope].iter_mut().zip(names) {
		if slot.is_some() {
			continue;
		}
		*slot = Some(resolve(name)?);
		filled += 1;
	}
	Ok(filled)
}

/// Where a [`Loader`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
	/// Nothing was loaded yet.
	Unloaded,
	/// Every slot in scope holds an address.
	Loaded,
	/// The last load stopped early. Some slots may be filled; loading again
	/// resumes from the first empty one.
	FailedPartial,
}

/// An owned loader context: the slot storage for one registry, plus the strategy
/// that fills it.
///
/// Mutating operations take `&mut self`, so they are serialized by construction.
///
/// # Examples
/// ```no_run
/// use gload::{gl, Loader};
///
/// let mut loader = Loader::builder(&gl::REGISTRY).up_to(gl::GL_VERSION_4_6).build().unwrap();
/// loader.load().unwrap();
/// let clear: unsafe extern "system" fn(u32) = unsafe { loader.get(gl::glClear).unwrap().cast() };
/// ```
pub struct Loader<D: Dylib = System> {
	pub(crate) registry: &'static Registry,
	pub(crate) scope: Range<usize>,
	pub(crate) slots: Box<[Option<Proc>]>,
	pub(crate) backend: Backend<D>,
	pub(crate) state: LoadState,
	pub(crate) verbose: bool,
}

impl Loader<System> {
	/// Starts configuring a loader for `registry`.
	pub fn builder(registry: &'static Registry) -> LoaderBuilder {
		LoaderBuilder::new(registry)
	}

	/// A loader for the bundled GL registry with the default strategy.
	pub fn gl() -> Result<Self> {
		LoaderBuilder::new(&crate::gl::REGISTRY).build()
	}
}

impl<D: Dylib> Loader<D> {
	/// Fills every empty slot using the configured strategy.
	///
	/// # Errors
	/// Fails on the first symbol that cannot be resolved, or if the module backing
	/// the strategy cannot be opened.
	pub fn load(&mut self) -> Result<()> {
		let backend = &mut self.backend;
		let result = drive(
			self.registry,
			self.scope.clone(),
			&mut self.slots,
			Some(|name: &str| backend.resolve(name)),
		);
		self.finish(result)
	}

	/// Fills every empty slot using `resolver`, which returns null for unknown names.
	///
	/// The configured strategy is not consulted.
	pub fn load_with<F>(&mut self, mut resolver: F) -> Result<()>
	where
		F: FnMut(&str) -> *const ffi::c_void,
	{
		let result = drive(
			self.registry,
			self.scope.clone(),
			&mut self.slots,
			Some(|name: &str| Proc::new(resolver(name)).ok_or_else(|| Error::SymbolNotFound(name.to_owned()))),
		);
		self.finish(result)
	}

	/// Fills every empty slot using a C-ABI proc-address function.
	///
	/// # Errors
	/// `None` fails with [`ErrorKind::InvalidArgument`](crate::ErrorKind::InvalidArgument)
	/// and leaves every slot as it was.
	pub fn load_with_raw(&mut self, resolver: Option<RawResolver>) -> Result<()> {
		let result = drive(
			self.registry,
			self.scope.clone(),
			&mut self.slots,
			resolver.map(|f| {
				move |name: &str| {
					Proc::new(strategy::call_raw(f, name))
						.ok_or_else(|| Error::SymbolNotFound(name.to_owned()))
				}
			}),
		);
		self.finish(result)
	}

	fn finish(&mut self, result: Result<usize>) -> Result<()> {
		match result {
			Ok(filled) => {
				self.state = LoadState::Loaded;
				diag!(
					self.verbose,
					info,
					"loaded {filled} new entry points, {} in scope",
					self.scope.len()
				);
				Ok(())
			}
			Err(e @ Error::InvalidArgument(_)) => {
				diag!(self.verbose, warn, "load rejected: {e}");
				Err(e)
			}
			Err(e) => {
				self.state = LoadState::FailedPartial;
				diag!(self.verbose, warn, "load failed: {e}");
				Err(e)
			}
		}
	}

	/// Closes the module opened by the module or native strategy.
	///
	/// Never fails, and does nothing for the callback strategy or when no module is
	/// open. Resolved slots are left as they are.
	pub fn unload(&mut self) {
		if let Err(e) = self.backend.release() {
			diag!(self.verbose, warn, "failed to close module: {e}");
		}
	}

	/// Resolves a single name through the configured strategy, without touching any
	/// slot.
	pub fn resolve(&mut self, name: &str) -> Result<Proc> {
		self.backend.resolve(name)
	}

	/// The address held by a slot, if it is resolved.
	#[inline]
	pub fn get(&self, id: SymbolId) -> Option<Proc> {
		self.slots.get(id.index()).copied().flatten()
	}

	pub fn get_by_name(&self, name: &str) -> Option<Proc> {
		self.registry.id(name).and_then(|id| self.get(id))
	}

	/// Names in scope whose slot is still empty, in registry order.
	pub fn missing(&self) -> impl Iterator<Item = &'static str> + '_ {
		let names = self.registry.names();
		self.scope
			.clone()
			.filter(move |&i| self.slots[i].is_none())
			.map(move |i| names[i])
	}

	/// Whether every entry of `feature` is resolved.
	pub fn is_loaded(&self, feature: FeatureId) -> bool {
		self.registry
			.feature(feature)
			.is_some_and(|f| self.slots[f.range()].iter().all(Option::is_some))
	}

	#[inline]
	pub fn state(&self) -> LoadState {
		self.state
	}

	#[inline]
	pub fn registry(&self) -> &'static Registry {
		self.registry
	}

	/// Registry indices this loader fills.
	#[inline]
	pub fn scope(&self) -> Range<usize> {
		self.scope.clone()
	}

	/// The module manager, if the strategy uses one.
	pub fn library(&self) -> Option<&Library<D>> {
		self.backend.library()
	}
}

impl<D: Dylib> fmt::Debug for Loader<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Loader")
			.field("scope", &self.scope)
			.field("state", &self.state)
			.field("library", &self.library())
			.finish_non_exhaustive()
	}
}
