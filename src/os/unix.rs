// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
use std::{ffi, io};

#[cfg(not(any(target_os = "linux", target_os = "macos", target_env = "gnu")))]
use std::sync;

pub(crate) type Handle = *mut ffi::c_void;

// `dlerror` is only thread-local on some platforms.
#[cfg(not(any(target_os = "linux", target_os = "macos", target_env = "gnu")))]
#[inline]
fn dylib_guard<'a>() -> sync::MutexGuard<'a, ()> {
	static LOCK: sync::Mutex<()> = sync::Mutex::new(());
	LOCK.lock().unwrap_or_else(sync::PoisonError::into_inner)
}

#[cfg(any(target_os = "linux", target_os = "macos", target_env = "gnu"))]
#[inline(always)]
fn dylib_guard() {}

unsafe fn dylib_error() -> io::Error {
	let e = libc::dlerror();
	if e.is_null() {
		io::Error::other("unknown dynamic linker error")
	} else {
		io::Error::other(ffi::CStr::from_ptr(e).to_string_lossy().into_owned())
	}
}

unsafe fn map_result<F>(f: F) -> io::Result<*mut ffi::c_void>
where
	F: FnOnce() -> *mut ffi::c_void,
{
	let _lock = dylib_guard();
	let _ = libc::dlerror(); // clear existing errors
	let handle = f();
	if handle.is_null() {
		Err(dylib_error())
	} else {
		Ok(handle)
	}
}

pub(crate) unsafe fn dylib_open(path: &str) -> io::Result<Handle> {
	let c_str = ffi::CString::new(path)?;
	map_result(|| libc::dlopen(c_str.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL))
}

pub(crate) unsafe fn dylib_symbol(lib_handle: Handle, name: &str) -> io::Result<*const ffi::c_void> {
	let c_str = ffi::CString::new(name)?;
	map_result(|| libc::dlsym(lib_handle, c_str.as_ptr())).map(|p| p.cast_const())
}

pub(crate) unsafe fn dylib_close(lib_handle: Handle) -> io::Result<()> {
	let _lock = dylib_guard();
	let _ = libc::dlerror(); // clear existing errors
	if libc::dlclose(lib_handle) != 0 {
		Err(dylib_error())
	} else {
		Ok(())
	}
}
