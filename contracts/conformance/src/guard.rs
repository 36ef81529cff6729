//! Panic containment for calls into plugin code
//!
//! Plugin loaders, factories, listings and entry methods all run through
//! [`contain`]. A panic becomes an `Err` carrying the panic message, and the
//! process panic hook stays quiet for the contained call so the only trace
//! left is the violation recorded in the report.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

thread_local! {
    static CONTAINING: Cell<u32> = const { Cell::new(0) };
}

static QUIET_HOOK: Once = Once::new();

/// Wrap the current hook once; it stays silent on threads inside `contain`
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CONTAINING.with(|depth| depth.get()) == 0 {
                previous(info);
            }
        }));
    });
}

/// Restores the nesting depth even when `call` unwinds
struct Containing;

impl Containing {
    fn enter() -> Self {
        CONTAINING.with(|depth| depth.set(depth.get() + 1));
        Containing
    }
}

impl Drop for Containing {
    fn drop(&mut self) {
        CONTAINING.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run `call`, returning the panic message if it panicked
pub fn contain<T>(call: impl FnOnce() -> T) -> Result<T, String> {
    install_quiet_hook();
    let _containing = Containing::enter();
    panic::catch_unwind(AssertUnwindSafe(call)).map_err(panic_message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contain_passes_value_through() {
        assert_eq!(contain(|| 7), Ok(7));
    }

    #[test]
    fn test_contain_captures_panic_message() {
        let err = contain(|| -> u8 { panic!("gateway down") }).unwrap_err();
        assert_eq!(err, "gateway down");

        let port = 8000;
        let err = contain(|| -> u8 { panic!("port {port} closed") }).unwrap_err();
        assert_eq!(err, "port 8000 closed");
    }

    #[test]
    fn test_depth_restored_after_panic() {
        let _ = contain(|| -> u8 { panic!("boom") });
        assert_eq!(CONTAINING.with(|depth| depth.get()), 0);

        let nested = contain(|| contain(|| -> u8 { panic!("inner") }));
        assert_eq!(nested, Ok(Err("inner".to_string())));
        assert_eq!(CONTAINING.with(|depth| depth.get()), 0);
    }
}
