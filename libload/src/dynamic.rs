//! Loading external plugins from shared libraries.

use std::borrow::Cow;
use std::env::consts::DLL_SUFFIX;
use std::ffi::{c_char, c_void, CStr, CString};
use std::path::PathBuf;
use std::sync::Arc;

use libloading::Library;
use libplugin::{PluginContext, Transform, TransformError};

use crate::{LoadError, LoadedPlugin, PluginResolver};

/// The capability an external plugin must export.
///
/// The contract is the classic C one: return the input pointer for a
/// passthrough, a freshly `malloc`ed string (ownership moves to the
/// caller) for a mutation, or null for a failure.
const TRANSFORM_SYMBOL: &str = "plugin_transform";

type RawTransform = unsafe extern "C" fn(*const c_char) -> *const c_char;

/// Resolves plugin names against shared libraries on disk.
///
/// Candidates are probed in order: `output/<name><DLL_SUFFIX>`, then
/// `./<name><DLL_SUFFIX>`. The error reported when every candidate fails
/// is the last loader error, matching the behaviour of a `dlopen` chain.
#[derive(Debug, Default)]
pub struct DynamicResolver;

impl DynamicResolver {
    /// Creates a resolver probing the default candidate paths.
    pub fn new() -> Self {
        Self::default()
    }

    fn candidates(name: &str) -> [PathBuf; 2] {
        let file = format!("{name}{DLL_SUFFIX}");
        [PathBuf::from("output").join(&file), PathBuf::from(&file)]
    }
}

impl PluginResolver for DynamicResolver {
    fn resolve(&self, name: &str) -> Result<LoadedPlugin, LoadError> {
        if name.is_empty() || name.contains(std::path::is_separator) {
            return Err(LoadError::InvalidName(name.to_owned()));
        }

        // Loading foreign code; the library must only export the
        // documented capability set. When both candidates fail, the
        // fallback's error is the one reported.
        let [primary, fallback] = Self::candidates(name);
        let library = match unsafe { Library::new(&primary) } {
            Ok(library) => library,
            Err(_) => match unsafe { Library::new(&fallback) } {
                Ok(library) => library,
                Err(source) => {
                    return Err(LoadError::Open {
                        name: name.to_owned(),
                        source,
                    })
                }
            },
        };

        let raw = unsafe {
            library
                .get::<RawTransform>(TRANSFORM_SYMBOL.as_bytes())
                .map(|symbol| *symbol)
                .map_err(|source| LoadError::SymbolMissing {
                    name: name.to_owned(),
                    symbol: TRANSFORM_SYMBOL,
                    source,
                })?
        };

        let context = PluginContext::new(name, Arc::new(CTransform { raw }))?;
        Ok(LoadedPlugin::with_library(Arc::new(context), library))
    }
}

/// Bridges a C `plugin_transform` into the [`Transform`] trait.
///
/// The C side signals ownership through pointer identity; this wrapper
/// translates that into the tagged `Cow` the consumer understands.
struct CTransform {
    raw: RawTransform,
}

impl Transform for CTransform {
    fn apply<'a>(&self, input: &'a str) -> Result<Cow<'a, str>, TransformError> {
        let c_input = CString::new(input)
            .map_err(|_| TransformError::new("input contains an interior NUL"))?;

        // The callee either returns our pointer untouched, hands us a
        // malloc'd buffer, or reports failure with null. The buffer is
        // only read before `free`, while `c_input` is still alive.
        let output = unsafe { (self.raw)(c_input.as_ptr()) };

        if output.is_null() {
            return Err(TransformError::new("transform failed"));
        }
        if output == c_input.as_ptr() {
            return Ok(Cow::Borrowed(input));
        }

        let owned = unsafe { CStr::from_ptr(output) }
            .to_string_lossy()
            .into_owned();
        unsafe { libc::free(output as *mut c_void) };
        Ok(Cow::Owned(owned))
    }
}
