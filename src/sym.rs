// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

use std::{ffi, fmt, mem, ptr::NonNull};

/// A resolved entry point address. Never null.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Proc(NonNull<ffi::c_void>);

// a code address carries no thread affinity.
unsafe impl Send for Proc {}
unsafe impl Sync for Proc {}

trait AssertSize<F> {
	const ASSERT_SIZE: () = assert!(
		mem::size_of::<F>() == mem::size_of::<Proc>(),
		"`Proc::cast` target must be the size of a function pointer"
	);
}
impl<F> AssertSize<F> for Proc {}

impl Proc {
	/// Wraps a raw address, returning `None` for null.
	#[inline]
	pub fn new(addr: *const ffi::c_void) -> Option<Self> {
		NonNull::new(addr.cast_mut()).map(Self)
	}

	#[inline]
	pub const fn as_ptr(self) -> *const ffi::c_void {
		self.0.as_ptr()
	}

	/// Reinterprets the address as a function pointer type `F`.
	///
	/// The size of `F` is checked at compile time.
	///
	/// # Safety
	/// `F` must match the real signature and calling convention of the entry point.
	#[inline]
	pub unsafe fn cast<F: Copy>(self) -> F {
		#[allow(clippy::let_unit_value)]
		let _ = <Self as AssertSize<F>>::ASSERT_SIZE;
		mem::transmute_copy(&self.0)
	}
}

impl fmt::Debug for Proc {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Proc({:p})", self.0)
	}
}
