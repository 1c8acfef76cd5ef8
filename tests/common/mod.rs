#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::ffi::{c_char, c_void, CStr};
use std::io;

use gload::Dylib;

pub fn init_log() {
	let _ = env_logger::builder().is_test(true).try_init();
}

pub fn addr(n: usize) -> *const c_void {
	n as *const c_void
}

thread_local! {
	static OPENED: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
	static CLOSED: Cell<usize> = const { Cell::new(0) };
}

/// Paths the current thread's `FakeLib` tried to open, in order.
pub fn opened() -> Vec<String> {
	OPENED.with(|o| o.borrow().clone())
}

pub fn closed() -> usize {
	CLOSED.with(Cell::get)
}

/// A module prober that opens any path starting with `good` and exports every
/// symbol except `missing`.
///
/// Paths containing `no-arb` do not export `glXGetProcAddressARB`, and paths
/// containing `no-proc` export no proc-address function at all.
#[derive(Debug)]
pub struct FakeLib {
	pub path: String,
}

unsafe impl Dylib for FakeLib {
	unsafe fn open(path: &str) -> io::Result<Self> {
		OPENED.with(|o| o.borrow_mut().push(path.to_owned()));
		if path.starts_with("good") {
			Ok(Self {
				path: path.to_owned(),
			})
		} else {
			Err(io::Error::new(io::ErrorKind::NotFound, format!("{path}: no such module")))
		}
	}

	unsafe fn symbol(&self, name: &str) -> io::Result<*const c_void> {
		let no_arb = self.path.contains("no-arb") || self.path.contains("no-proc");
		let no_proc = self.path.contains("no-proc");
		match name {
			"missing" => Err(io::Error::new(io::ErrorKind::NotFound, "undefined symbol")),
			"glXGetProcAddressARB" if no_arb => Err(io::Error::new(io::ErrorKind::NotFound, "undefined symbol")),
			"glXGetProcAddress" | "wglGetProcAddress" if no_proc => {
				Err(io::Error::new(io::ErrorKind::NotFound, "undefined symbol"))
			}
			"glXGetProcAddressARB" | "wglGetProcAddress" => Ok(fake_get_proc_address as *const c_void),
			"glXGetProcAddress" => Ok(fake_get_proc_address_legacy as *const c_void),
			_ => Ok(addr(0x1000 + name.len())),
		}
	}

	unsafe fn close(self) -> io::Result<()> {
		CLOSED.with(|c| c.set(c.get() + 1));
		Ok(())
	}
}

/// Stands in for `glXGetProcAddressARB`: knows every name except `missing`.
pub unsafe extern "system" fn fake_get_proc_address(name: *const c_char) -> *const c_void {
	match CStr::from_ptr(name).to_bytes() {
		b"missing" => std::ptr::null(),
		bytes => addr(0x5000 + bytes.len()),
	}
}

/// Stands in for the older `glXGetProcAddress`, at a different base address.
pub unsafe extern "system" fn fake_get_proc_address_legacy(name: *const c_char) -> *const c_void {
	match CStr::from_ptr(name).to_bytes() {
		b"missing" => std::ptr::null(),
		bytes => addr(0x6000 + bytes.len()),
	}
}
