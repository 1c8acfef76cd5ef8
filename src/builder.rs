// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::{ffi, marker::PhantomData};

use crate::library::{Dylib, Library, System};
use crate::registry::{FeatureId, Registry};
use crate::strategy::{Backend, RawResolver, Strategy};
use crate::{os, Error, LoadState, Loader, Result};

/// Configures a [`Loader`].
///
/// Every choice is checked in [`build`](LoaderBuilder::build), so a misconfigured
/// loader is never constructed.
///
/// # Examples
/// ```no_run
/// use gload::{gl, Loader, Strategy};
///
/// let mut loader = Loader::builder(&gl::REGISTRY)
/// 	.strategy(Strategy::Native)
/// 	.up_to(gl::GL_VERSION_3_3)
/// 	.build()
/// 	.unwrap();
/// loader.load().unwrap();
/// ```
pub struct LoaderBuilder<D: Dylib = System> {
	registry: &'static Registry,
	strategies: Vec<Strategy>,
	candidates: Option<Vec<String>>,
	up_to: Option<FeatureId>,
	verbose: bool,
	_dylib: PhantomData<fn() -> D>,
}

impl LoaderBuilder<System> {
	pub fn new(registry: &'static Registry) -> Self {
		Self::with_dylib(registry)
	}
}

impl<D: Dylib> LoaderBuilder<D> {
	/// A builder whose module strategies open modules through `D`.
	pub fn with_dylib(registry: &'static Registry) -> Self {
		Self {
			registry,
			strategies: Vec::new(),
			candidates: None,
			up_to: None,
			verbose: cfg!(feature = "verbose"),
			_dylib: PhantomData,
		}
	}

	/// Selects the resolution strategy. Selecting more than one is an error at
	/// build time. Defaults to [`Strategy::Module`].
	pub fn strategy(mut self, strategy: Strategy) -> Self {
		self.strategies.push(strategy);
		self
	}

	/// Shorthand for `strategy(Strategy::callback(f))`.
	pub fn callback<F>(self, f: F) -> Self
	where
		F: FnMut(&str) -> *const ffi::c_void + Send + 'static,
	{
		self.strategy(Strategy::callback(f))
	}

	/// Shorthand for `strategy(Strategy::raw(f))`.
	pub fn raw(self, f: RawResolver) -> Self {
		self.strategy(Strategy::raw(f))
	}

	/// Replaces the platform's default module candidates.
	pub fn candidates<I, S>(mut self, candidates: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.candidates = Some(candidates.into_iter().map(Into::into).collect());
		self
	}

	/// Limits the loader to `feature` and every feature before it.
	pub fn up_to(mut self, feature: FeatureId) -> Self {
		self.up_to = Some(feature);
		self
	}

	/// Whether diagnostics are sent to the `log` facade. Defaults to the `verbose`
	/// crate feature.
	pub fn verbose(mut self, verbose: bool) -> Self {
		self.verbose = verbose;
		self
	}

	/// # Errors
	/// Fails with [`ErrorKind::Config`](crate::ErrorKind::Config) when more than one
	/// strategy was selected, the strategy is unsupported on this platform, the
	/// candidate list does not fit the strategy, or the feature is not in the registry.
	pub fn build(self) -> Result<Loader<D>> {
		let mut strategies = self.strategies.into_iter();
		let strategy = strategies.next().unwrap_or_default();
		if let Some(other) = strategies.next() {
			return Err(Error::Config(format!(
				"conflicting strategies `{}` and `{}`, select exactly one",
				strategy.name(),
				other.name()
			)));
		}
		if matches!(strategy, Strategy::Native) && os::NATIVE_PROC_NAMES.is_empty() {
			return Err(Error::Config(
				"the native strategy is not available on this platform".to_owned(),
			));
		}

		let candidates = match self.candidates {
			Some(_) if !strategy.uses_module() => {
				return Err(Error::Config(
					"module candidates are only used by the module and native strategies".to_owned(),
				))
			}
			Some(candidates) if candidates.is_empty() => {
				return Err(Error::Config("module candidate list is empty".to_owned()))
			}
			Some(candidates) => candidates,
			None => os::DEFAULT_CANDIDATES.iter().map(|&c| c.to_owned()).collect(),
		};

		let scope = match self.up_to {
			Some(feature) => self.registry.range_up_to(feature).ok_or_else(|| {
				Error::Config(format!("feature #{} is not in the registry", feature.index()))
			})?,
			None => 0..self.registry.len(),
		};

		let library = Library::<D>::with_dylib(candidates).with_verbose(self.verbose);
		Ok(Loader {
			registry: self.registry,
			scope,
			slots: vec![None; self.registry.len()].into_boxed_slice(),
			backend: Backend::new(strategy, library),
			state: LoadState::Unloaded,
			verbose: self.verbose,
		})
	}
}
