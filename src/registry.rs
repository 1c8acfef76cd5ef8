// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

//! Symbol registries: ordered entry point names grouped into features.
//!
//! A registry is pure data. The slot for entry `i` lives at index `i` of the
//! slot array owned by a [`Loader`](crate::Loader).

use std::ops::Range;

/// Index of an entry in a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u16);

impl SymbolId {
	#[inline]
	pub const fn new(index: u16) -> Self {
		Self(index)
	}

	#[inline]
	pub const fn index(self) -> usize {
		self.0 as usize
	}
}

/// Index of a feature in a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureId(u16);

impl FeatureId {
	#[inline]
	pub const fn new(index: u16) -> Self {
		Self(index)
	}

	#[inline]
	pub const fn index(self) -> usize {
		self.0 as usize
	}
}

/// A named, contiguous range of registry entries, such as `GL_VERSION_3_3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
	name: &'static str,
	start: u16,
	end: u16,
}

impl Feature {
	pub const fn new(name: &'static str, start: u16, end: u16) -> Self {
		assert!(start <= end);
		Self { name, start, end }
	}

	#[inline]
	pub const fn name(&self) -> &'static str {
		self.name
	}

	#[inline]
	pub fn range(&self) -> Range<usize> {
		usize::from(self.start)..usize::from(self.end)
	}
}

#[derive(Debug)]
pub struct Registry {
	names: &'static [&'static str],
	features: &'static [Feature],
}

impl Registry {
	/// Constructs a registry without features.
	///
	/// # Panics
	/// Panics if a name is empty or appears twice, or if there are more names than a
	/// [`SymbolId`] can index. In a `static` this is a compile error.
	pub const fn new(names: &'static [&'static str]) -> Self {
		assert!(
			names.len() <= u16::MAX as usize,
			"registry holds more names than a `SymbolId` can index"
		);
		let mut i = 0;
		while i < names.len() {
			assert!(!names[i].is_empty(), "registry names must not be empty");
			let mut j = i + 1;
			while j < names.len() {
				assert!(!str_eq(names[i], names[j]), "registry names must be unique");
				j += 1;
			}
			i += 1;
		}
		Self { names, features: &[] }
	}

	/// Constructs a registry from already validated parts.
	///
	/// Used by [`registry!`](crate::registry), which checks names at expansion time.
	#[doc(hidden)]
	pub const fn from_parts(names: &'static [&'static str], features: &'static [Feature]) -> Self {
		Self { names, features }
	}

	#[inline]
	pub const fn len(&self) -> usize {
		self.names.len()
	}

	#[inline]
	pub const fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	#[inline]
	pub fn name(&self, id: SymbolId) -> Option<&'static str> {
		self.names.get(id.index()).copied()
	}

	#[inline]
	pub fn names(&self) -> &'static [&'static str] {
		self.names
	}

	/// Looks up an entry by name.
	pub fn id(&self, name: &str) -> Option<SymbolId> {
		self.names
			.iter()
			.position(|n| *n == name)
			.map(|i| SymbolId::new(i as u16))
	}

	#[inline]
	pub fn features(&self) -> &'static [Feature] {
		self.features
	}

	#[inline]
	pub fn feature(&self, id: FeatureId) -> Option<&'static Feature> {
		self.features.get(id.index())
	}

	pub fn feature_by_name(&self, name: &str) -> Option<FeatureId> {
		self.features
			.iter()
			.position(|f| f.name == name)
			.map(|i| FeatureId::new(i as u16))
	}

	/// Entries covered by `id` and every feature before it.
	pub fn range_up_to(&self, id: FeatureId) -> Option<Range<usize>> {
		self.feature(id).map(|f| 0..f.range().end)
	}
}

const fn str_eq(a: &str, b: &str) -> bool {
	let (a, b) = (a.as_bytes(), b.as_bytes());
	if a.len() != b.len() {
		return false;
	}
	let mut i = 0;
	while i < a.len() {
		if a[i] != b[i] {
			return false;
		}
		i += 1;
	}
	true
}
