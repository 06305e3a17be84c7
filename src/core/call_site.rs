//! Call-site metadata and thread labelling
//!
//! Everything a dispatch pass needs to know about *where* a log call came
//! from: source file, enclosing function, line and the calling thread.

use std::cell::RefCell;
use std::thread::{self, ThreadId};

/// Source location of a log call
///
/// Normally produced by the [`call_site!`](crate::call_site) macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite<'a> {
    pub file: &'a str,
    pub function: &'a str,
    pub line: u32,
}

impl<'a> CallSite<'a> {
    pub const fn new(file: &'a str, function: &'a str, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }
}

impl CallSite<'static> {
    /// Location of the caller, without a function name
    ///
    /// For callers that cannot use the [`call_site!`](crate::call_site) macro.
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self {
            file: location.file(),
            function: "",
            line: location.line(),
        }
    }
}

/// Remove the parameter list from a function signature
///
/// Everything from the first `(` is dropped and `()` is appended, so
/// `"doWork(x: Int, y: Int)"` and `"doWork"` both become `"doWork()"`.
///
/// ```
/// use rust_log_dispatcher::core::strip_params;
///
/// assert_eq!(strip_params("doWork(x:y:)"), "doWork()");
/// assert_eq!(strip_params("app::run"), "app::run()");
/// ```
pub fn strip_params(function: &str) -> String {
    let name = function
        .find('(')
        .map_or(function, |brace| &function[..brace]);
    format!("{}()", name)
}

#[doc(hidden)]
pub fn type_name_of<T>(_: T) -> &'static str {
    std::any::type_name::<T>()
}

/// Path of the function enclosing a marker item named `__here`
///
/// Used by [`function_name!`](crate::function_name); closure frames are
/// folded into their enclosing function.
#[doc(hidden)]
pub fn enclosing_function(marker_path: &'static str) -> &'static str {
    let mut name = marker_path
        .strip_suffix("::__here")
        .unwrap_or(marker_path);
    while let Some(outer) = name.strip_suffix("::{{closure}}") {
        name = outer;
    }
    name
}

thread_local! {
    static THREAD_LABEL_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Display label of the calling thread
///
/// The main thread is labelled `""`. With `main_thread` set, that thread is
/// the main one; otherwise a thread whose std name is `"main"` is. Any other
/// thread gets its name, or its `ThreadId` debug form when unnamed. The
/// label is cached per thread, so it is stable for the thread's lifetime.
pub fn thread_label(main_thread: Option<ThreadId>) -> String {
    let current = thread::current();
    let is_main = match main_thread {
        Some(id) => current.id() == id,
        None => current.name() == Some("main"),
    };
    if is_main {
        return String::new();
    }

    THREAD_LABEL_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| match current.name() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => format!("{:?}", current.id()),
            })
            .clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_params() {
        assert_eq!(strip_params("doWork(x: Int, y: Int)"), "doWork()");
        assert_eq!(strip_params("doWork(x:y:)"), "doWork()");
        assert_eq!(strip_params("main"), "main()");
        assert_eq!(strip_params(""), "()");
        assert_eq!(strip_params("f(a)(b)"), "f()");
    }

    #[test]
    fn test_enclosing_function() {
        assert_eq!(enclosing_function("app::worker::run::__here"), "app::worker::run");
        assert_eq!(
            enclosing_function("app::run::{{closure}}::{{closure}}::__here"),
            "app::run"
        );
    }

    #[test]
    fn test_function_name_macro() {
        let name = crate::function_name!();
        assert!(name.ends_with("test_function_name_macro"), "got {}", name);

        let from_closure = (|| crate::function_name!())();
        assert_eq!(from_closure, name);
    }

    #[test]
    fn test_call_site_macro() {
        let site = crate::call_site!();
        assert!(site.file.ends_with("call_site.rs"));
        assert!(site.function.ends_with("test_call_site_macro"));
        assert!(site.line > 0);
    }

    #[test]
    fn test_caller_location() {
        let site = CallSite::caller();
        assert!(site.file.ends_with("call_site.rs"));
        assert_eq!(site.function, "");
    }

    #[test]
    fn test_designated_main_thread_is_empty() {
        let id = thread::current().id();
        assert_eq!(thread_label(Some(id)), "");
    }

    #[test]
    fn test_named_thread_label() {
        let label = thread::Builder::new()
            .name("worker-7".into())
            .spawn(|| thread_label(None))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(label, "worker-7");
    }

    #[test]
    fn test_unnamed_thread_label_is_stable() {
        let (first, second) = thread::spawn(|| (thread_label(None), thread_label(None)))
            .join()
            .unwrap();
        assert!(first.starts_with("ThreadId("), "got {}", first);
        assert_eq!(first, second);
    }
}
