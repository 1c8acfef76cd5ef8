#![cfg(target_os = "linux")]

mod common;

use std::ffi::{c_char, c_int};

use common::init_log;
use gload::*;

static LIBC_FNS: Registry = Registry::new(&["strlen", "atoi", "abs"]);
static LIBC_MISSING: Registry = Registry::new(&["strlen", "gload_no_such_symbol", "atoi"]);

#[test]
fn test_libc_fallback() {
	init_log();
	let mut libc = Library::new(["libgload-does-not-exist.so.0", "libc.so.6"]);
	let strlen = libc.resolve_symbol("strlen").unwrap();
	assert_eq!(libc.opened_candidate(), Some("libc.so.6"));

	let strlen: unsafe extern "C" fn(*const c_char) -> usize = unsafe { strlen.cast() };
	assert_eq!(unsafe { strlen(b"hello\0".as_ptr().cast()) }, 5);
	libc.release().unwrap();
}

#[test]
fn test_libc_loader() {
	init_log();
	let mut loader = Loader::builder(&LIBC_FNS)
		.candidates(["libc.so.6"])
		.build()
		.unwrap();
	loader.load().unwrap();

	let atoi: unsafe extern "C" fn(*const c_char) -> c_int =
		unsafe { loader.get(SymbolId::new(1)).unwrap().cast() };
	assert_eq!(unsafe { atoi(b"42\0".as_ptr().cast()) }, 42);

	loader.unload();
	loader.unload();
}

#[test]
fn test_libc_missing_symbol() {
	let mut loader = Loader::builder(&LIBC_MISSING)
		.candidates(["libc.so.6"])
		.build()
		.unwrap();
	let err = loader.load().unwrap_err();
	assert_eq!(err.symbol(), Some("gload_no_such_symbol"));
	assert!(loader.get_by_name("strlen").is_some());
	assert!(loader.get_by_name("atoi").is_none());
	loader.unload();
}

#[test]
fn test_missing_module() {
	let mut lib = Library::new(["libgload-does-not-exist.so.0"]);
	let err = lib.ensure_handle().unwrap_err();
	assert_eq!(err.kind(), ErrorKind::ModuleNotFound);
}
