mod common;

use std::ffi::{c_char, c_void, CStr};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{addr, init_log};
use gload::*;

static FOO_BAR_BAZ: Registry = Registry::new(&["foo", "bar", "baz"]);

fn loader() -> Loader {
	init_log();
	LoaderBuilder::new(&FOO_BAR_BAZ).build().unwrap()
}

fn slot(loader: &Loader, name: &str) -> *const c_void {
	loader.get_by_name(name).map_or(ptr::null(), Proc::as_ptr)
}

#[test]
fn test_scenario_stops_at_first_unresolved() {
	let mut loader = loader();
	let mut calls = vec![];
	let err = loader
		.load_with(|name| {
			calls.push(name.to_owned());
			match name {
				"foo" => addr(0x1000),
				"bar" => ptr::null(),
				"baz" => addr(0x3000),
				_ => unreachable!(),
			}
		})
		.unwrap_err();

	assert_eq!(err.kind(), ErrorKind::SymbolNotFound);
	assert_eq!(err.symbol(), Some("bar"));
	assert_eq!(calls, ["foo", "bar"]);
	assert_eq!(slot(&loader, "foo"), addr(0x1000));
	assert!(slot(&loader, "bar").is_null());
	assert!(slot(&loader, "baz").is_null());
	assert_eq!(loader.state(), LoadState::FailedPartial);
	assert_eq!(loader.missing().collect::<Vec<_>>(), ["bar", "baz"]);
}

#[test]
fn test_fail_fast_keeps_prefix() {
	for failing in 0..FOO_BAR_BAZ.len() {
		let mut loader = loader();
		let fail_name = FOO_BAR_BAZ.names()[failing];
		let result = loader.load_with(|name| if name == fail_name { ptr::null() } else { addr(0x10) });
		assert!(result.is_err());
		for (i, name) in FOO_BAR_BAZ.names().iter().enumerate() {
			assert_eq!(loader.get_by_name(name).is_some(), i < failing, "{name} after failing at {fail_name}");
		}
	}
}

#[test]
fn test_load_is_idempotent() {
	let mut loader = loader();
	let mut calls = 0;
	loader
		.load_with(|_| {
			calls += 1;
			addr(0x40)
		})
		.unwrap();
	assert_eq!(calls, 3);
	assert_eq!(loader.state(), LoadState::Loaded);

	let mut second_calls = 0;
	loader
		.load_with(|_| {
			second_calls += 1;
			addr(0x80)
		})
		.unwrap();
	assert_eq!(second_calls, 0);
	assert_eq!(slot(&loader, "baz"), addr(0x40));
}

#[test]
fn test_retry_resumes_after_failure() {
	let mut loader = loader();
	assert!(loader.load_with(|name| if name == "baz" { ptr::null() } else { addr(1) }).is_err());

	let mut calls = vec![];
	loader
		.load_with(|name| {
			calls.push(name.to_owned());
			addr(2)
		})
		.unwrap();
	assert_eq!(calls, ["baz"]);
	assert_eq!(slot(&loader, "foo"), addr(1));
	assert_eq!(slot(&loader, "baz"), addr(2));
}

#[test]
fn test_null_resolver_is_rejected() {
	let mut loader = loader();
	let err = loader.load_with_raw(None).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::InvalidArgument);
	assert_eq!(loader.missing().count(), 3);
	assert_eq!(loader.state(), LoadState::Unloaded);

	// a partially loaded context keeps its slots too
	assert!(loader.load_with(|name| if name == "foo" { addr(7) } else { ptr::null() }).is_err());
	assert!(loader.load_with_raw(None).is_err());
	assert_eq!(slot(&loader, "foo"), addr(7));
	assert_eq!(loader.missing().count(), 2);
	assert_eq!(loader.state(), LoadState::FailedPartial);
}

#[test]
fn test_raw_resolver() {
	unsafe extern "C" fn resolve(name: *const c_char) -> *const c_void {
		match CStr::from_ptr(name).to_bytes() {
			b"foo" => 0x100 as *const c_void,
			b"bar" => 0x200 as *const c_void,
			b"baz" => 0x300 as *const c_void,
			_ => ptr::null(),
		}
	}
	let mut loader = loader();
	loader.load_with_raw(Some(resolve)).unwrap();
	assert_eq!(slot(&loader, "bar"), addr(0x200));
}

#[test]
fn test_callback_strategy() {
	init_log();
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&calls);
	let mut loader = LoaderBuilder::new(&FOO_BAR_BAZ)
		.callback(move |name| {
			counter.fetch_add(1, Ordering::SeqCst);
			addr(name.len())
		})
		.build()
		.unwrap();

	loader.load().unwrap();
	loader.load().unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 3);
	assert!(loader.library().is_none());
	assert_eq!(loader.resolve("quux").unwrap().as_ptr(), addr(4));

	// nothing was opened, so there is nothing to close
	loader.unload();
	assert_eq!(slot(&loader, "foo"), addr(3));
}

#[test]
fn test_conflicting_strategies() {
	let err = LoaderBuilder::new(&FOO_BAR_BAZ)
		.strategy(Strategy::Module)
		.strategy(Strategy::Native)
		.build()
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Config);

	let err = LoaderBuilder::new(&FOO_BAR_BAZ)
		.callback(|_| ptr::null())
		.strategy(Strategy::Module)
		.build()
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn test_invalid_configuration() {
	let err = LoaderBuilder::new(&FOO_BAR_BAZ)
		.callback(|_| ptr::null())
		.candidates(["libGL.so.1"])
		.build()
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Config);

	let err = LoaderBuilder::new(&FOO_BAR_BAZ)
		.candidates(Vec::<String>::new())
		.build()
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Config);

	let err = LoaderBuilder::new(&FOO_BAR_BAZ)
		.up_to(FeatureId::new(0))
		.build()
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Config);
}

#[cfg(target_os = "macos")]
#[test]
fn test_native_unsupported_on_macos() {
	let err = LoaderBuilder::new(&FOO_BAR_BAZ)
		.strategy(Strategy::Native)
		.build()
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn test_unload_without_module() {
	let mut loader = loader();
	loader.unload();
	loader.unload();
	assert!(!loader.library().unwrap().is_open());
	assert_eq!(loader.state(), LoadState::Unloaded);
}

#[test]
fn test_unload_keeps_slots() {
	let mut loader = loader();
	loader.load_with(|_| addr(9)).unwrap();
	loader.unload();
	assert_eq!(loader.missing().count(), 0);
	assert_eq!(slot(&loader, "bar"), addr(9));
}

#[test]
fn test_gl_scope() {
	init_log();
	let mut loader = Loader::builder(&gl::REGISTRY)
		.up_to(gl::GL_VERSION_1_1)
		.build()
		.unwrap();
	let mut calls = 0;
	loader
		.load_with(|_| {
			calls += 1;
			addr(0x10)
		})
		.unwrap();

	assert_eq!(calls, 62);
	assert_eq!(loader.scope(), 0..62);
	assert!(loader.is_loaded(gl::GL_VERSION_1_0));
	assert!(loader.is_loaded(gl::GL_VERSION_1_1));
	assert!(!loader.is_loaded(gl::GL_VERSION_1_2));
	assert!(loader.get(gl::glDrawArrays).is_some());
	assert!(loader.get(gl::glGenVertexArrays).is_none());
	assert_eq!(loader.missing().count(), 0);
}

#[test]
fn test_load_gl_with() {
	init_log();
	let loader = load_gl_with(|_| addr(0x20)).unwrap();
	assert!(loader.is_loaded(gl::GL_VERSION_3_3));
	assert_eq!(loader.get(gl::glClear).unwrap().as_ptr(), addr(0x20));

	let err = load_gl_with(|name| if name == "glGetStringi" { ptr::null() } else { addr(1) }).unwrap_err();
	assert_eq!(err.symbol(), Some("glGetStringi"));
}

#[test]
fn test_gl_modern_and_legacy_names() {
	init_log();
	let mut loader = Loader::gl().unwrap();
	loader.load_with(|name| addr(0x100 + name.len())).unwrap();

	for name in ["glCreateBuffers", "glNamedBufferData", "glVertexArrayAttribFormat", "glSpecializeShader"] {
		assert_eq!(slot(&loader, name), addr(0x100 + name.len()), "{name}");
	}
	for name in ["glBegin", "glVertex2f", "glEnd", "glMatrixMode"] {
		assert_eq!(slot(&loader, name), addr(0x100 + name.len()), "{name}");
	}
	assert!(loader.is_loaded(gl::GL_VERSION_4_6));
	assert!(loader.is_loaded(gl::GL_VERSION_1_0_COMPAT));
}

#[test]
fn test_gl_core_scope_skips_legacy() {
	init_log();
	let mut loader = Loader::builder(&gl::REGISTRY)
		.up_to(gl::GL_VERSION_4_6)
		.build()
		.unwrap();
	let mut calls = vec![];
	loader
		.load_with(|name| {
			calls.push(name.to_owned());
			addr(0x10)
		})
		.unwrap();

	assert!(calls.iter().any(|name| name == "glPolygonOffsetClamp"));
	assert!(!calls.iter().any(|name| name == "glBegin"));
	assert!(loader.get(gl::glEnd).is_none());
	assert!(!loader.is_loaded(gl::GL_VERSION_1_0_COMPAT));
}
