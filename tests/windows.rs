#![cfg(windows)]

mod common;

use common::init_log;
use gload::*;

static KERNEL32_FNS: Registry = Registry::new(&["SetLastError", "GetLastError"]);

#[test]
fn test_kernel32_loader() {
	init_log();
	let mut loader = Loader::builder(&KERNEL32_FNS)
		.candidates(["gload-does-not-exist.dll", "Kernel32.dll"])
		.build()
		.unwrap();
	loader.load().unwrap();
	assert_eq!(loader.library().unwrap().opened_candidate(), Some("Kernel32.dll"));

	let set_last_error: unsafe extern "system" fn(u32) =
		unsafe { loader.get(SymbolId::new(0)).unwrap().cast() };
	let get_last_error: unsafe extern "system" fn() -> u32 =
		unsafe { loader.get(SymbolId::new(1)).unwrap().cast() };
	unsafe {
		set_last_error(53);
		assert_eq!(get_last_error(), 53);
	}
	loader.unload();
}

#[test]
fn test_kernel32_missing_symbol() {
	let mut lib = Library::new(["Kernel32.dll"]);
	let err = lib.resolve_symbol("gload_no_such_symbol").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::SymbolNotFound);
	lib.release().unwrap();
}
