//! Source locations attached to fatal diagnostics.

use std::fmt;
use std::panic::Location;

/// Where a fatal condition was reported: file, line and enclosing routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Source file path as reported by `file!()` or `Location::file`.
    pub file: &'static str,
    /// 1-based line number.
    pub line: u32,
    /// Path of the routine that reported the failure.
    pub function: &'static str,
}

impl SourceLocation {
    /// Create a location from its parts.
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// Location of the outermost caller in the current `#[track_caller]` chain.
    ///
    /// `function` names the routine doing the reporting, since the caller's
    /// own function name is not available through [`Location`].
    #[track_caller]
    pub fn caller(function: &'static str) -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line(), function)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.function)
    }
}

/// Expands to the path of the enclosing function, e.g. `ry_alloc::checked::allocate`.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __here() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(__here);
        match name.strip_suffix("::__here") {
            Some(stripped) => stripped,
            None => name,
        }
    }};
}

/// Expands to the [`SourceLocation`] of the macro invocation.
#[macro_export]
macro_rules! here {
    () => {
        $crate::location::SourceLocation::new(
            ::std::file!(),
            ::std::line!(),
            $crate::function_name!(),
        )
    };
}
