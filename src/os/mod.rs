// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
use unix as imp;
#[cfg(windows)]
use windows as imp;

#[cfg(not(any(unix, windows)))]
compile_error!("gload: no supported platform recognized, expected a unix or windows target");

use std::ffi;

pub(crate) use imp::{dylib_close, dylib_open, dylib_symbol, Handle};

/// Modules probed by the built-in strategy, most version-qualified first.
#[cfg(windows)]
#[cfg_attr(docsrs, doc(cfg(windows)))]
pub const DEFAULT_CANDIDATES: &[&str] = &["opengl32.dll"];
#[cfg(target_os = "macos")]
#[cfg_attr(docsrs, doc(cfg(target_os = "macos")))]
pub const DEFAULT_CANDIDATES: &[&str] = &[
	"../Frameworks/OpenGL.framework/OpenGL",
	"/Library/Frameworks/OpenGL.framework/OpenGL",
	"/System/Library/Frameworks/OpenGL.framework/OpenGL",
	"/System/Library/Frameworks/OpenGL.framework/Versions/Current/OpenGL",
];
#[cfg(all(unix, not(target_os = "macos")))]
#[cfg_attr(docsrs, doc(cfg(all(unix, not(target_os = "macos")))))]
pub const DEFAULT_CANDIDATES: &[&str] = &["libGL.so.1", "libGL.so"];

// Names of the platform's own proc-address function, in lookup order.
// macOS has none.
#[cfg(windows)]
pub(crate) const NATIVE_PROC_NAMES: &[&str] = &["wglGetProcAddress"];
#[cfg(target_os = "macos")]
pub(crate) const NATIVE_PROC_NAMES: &[&str] = &[];
#[cfg(all(unix, not(target_os = "macos")))]
pub(crate) const NATIVE_PROC_NAMES: &[&str] = &["glXGetProcAddressARB", "glXGetProcAddress"];

pub(crate) type NativeProcFn = unsafe extern "system" fn(*const ffi::c_char) -> *const ffi::c_void;

/// Some native proc-address functions report failure with small sentinel values
/// instead of null.
#[inline]
pub(crate) fn is_failed_proc(addr: *const ffi::c_void) -> bool {
	#[cfg(windows)]
	{
		matches!(addr as isize, 0 | 1 | 2 | 3 | -1)
	}
	#[cfg(not(windows))]
	{
		addr.is_null()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn raw(n: isize) -> *const ffi::c_void {
		n as *const ffi::c_void
	}

	#[test]
	fn null_proc_fails() {
		assert!(is_failed_proc(std::ptr::null()));
		assert!(!is_failed_proc(raw(0x1000)));
	}

	#[test]
	fn default_candidates_are_most_qualified_first() {
		#[cfg(windows)]
		assert_eq!(DEFAULT_CANDIDATES, ["opengl32.dll"]);
		#[cfg(target_os = "macos")]
		assert!(DEFAULT_CANDIDATES[0].starts_with("../Frameworks"));
		#[cfg(all(unix, not(target_os = "macos")))]
		assert_eq!(DEFAULT_CANDIDATES, ["libGL.so.1", "libGL.so"]);
	}

	#[cfg(windows)]
	#[test]
	fn wgl_sentinels_fail() {
		for sentinel in [1, 2, 3, -1] {
			assert!(is_failed_proc(raw(sentinel)), "{sentinel}");
		}
		assert!(!is_failed_proc(raw(4)));
	}

	#[cfg(not(windows))]
	#[test]
	fn small_addresses_pass_outside_windows() {
		assert!(!is_failed_proc(raw(1)));
		assert!(!is_failed_proc(raw(-1)));
	}
}
