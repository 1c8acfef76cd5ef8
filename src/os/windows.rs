// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

// The windows API conventions are kept deliberately, so it's easier to refer to references.
#![allow(clippy::upper_case_acronyms)]

use std::{ffi, io, ptr};

pub(crate) type Handle = HMODULE;

type HANDLE = *mut ffi::c_void;
type HMODULE = HANDLE;
type PCSTR = *const ffi::c_char;
type PCWSTR = *const u16;
type BOOL = i32;
const LOAD_LIBRARY_SEARCH_DEFAULT_DIRS: u32 = 0x00001000u32;

#[link(name = "kernel32")]
extern "system" {
	fn LoadLibraryExW(lplibfilename: PCWSTR, hfile: HANDLE, dwflags: u32) -> HMODULE;
	fn GetProcAddress(hmodule: HMODULE, lpprocname: PCSTR) -> *const ffi::c_void;
	fn FreeLibrary(hlibmodule: HMODULE) -> BOOL;
}

pub(crate) unsafe fn dylib_open(path: &str) -> io::Result<Handle> {
	let wide_str: Vec<u16> = path.encode_utf16().chain(std::iter::once(0u16)).collect();
	let handle = LoadLibraryExW(
		wide_str.as_ptr(),
		ptr::null_mut(),
		LOAD_LIBRARY_SEARCH_DEFAULT_DIRS,
	);
	if handle.is_null() {
		Err(io::Error::last_os_error())
	} else {
		Ok(handle)
	}
}

pub(crate) unsafe fn dylib_symbol(lib_handle: Handle, name: &str) -> io::Result<*const ffi::c_void> {
	let c_str = ffi::CString::new(name)?;
	let addr = GetProcAddress(lib_handle, c_str.as_ptr());
	if addr.is_null() {
		Err(io::Error::last_os_error())
	} else {
		Ok(addr)
	}
}

pub(crate) unsafe fn dylib_close(lib_handle: Handle) -> io::Result<()> {
	if FreeLibrary(lib_handle) == 0 {
		Err(io::Error::last_os_error())
	} else {
		Ok(())
	}
}
