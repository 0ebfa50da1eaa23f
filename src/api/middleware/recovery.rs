//! Panic recovery for the outermost layer

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::sync::Once;

use axum::{
    body::Body,
    http::Response,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};
use tracing::error;

use crate::api::types::ApiError;

thread_local! {
    /// Backtrace of the last panic on this thread, left by the panic hook
    static LAST_BACKTRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Log every panic with its backtrace through `tracing`.
///
/// The hook runs before unwinding, so this is the only place the stack is
/// still available. Idempotent.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let backtrace = Backtrace::force_capture().to_string();
            let location = info
                .location()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "unknown".to_string());

            error!(
                panic = %panic_message(info.payload()),
                location = %location,
                backtrace = %backtrace,
                "Panic"
            );

            LAST_BACKTRACE.with(|slot| *slot.borrow_mut() = Some(backtrace));
        }));
    });
}

fn take_backtrace() -> Option<String> {
    LAST_BACKTRACE.with(|slot| slot.borrow_mut().take())
}

/// Turns a handler panic into a 500 JSON error
#[derive(Debug, Clone, Copy)]
pub struct PanicResponder {
    development: bool,
}

impl PanicResponder {
    /// In development the panic message and stack are echoed to the client
    pub fn new(development: bool) -> Self {
        Self { development }
    }
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let detail = panic_message(err.as_ref());
        let backtrace = take_backtrace();
        error!(panic = %detail, "Request handler panicked");

        if !self.development {
            return ApiError::internal("Internal server error")
                .with_code("panic")
                .into_response();
        }

        let error = ApiError::internal(format!("Internal server error: {}", detail))
            .with_code("panic");
        let status = error.status;
        let mut body = serde_json::to_value(&error.response).unwrap_or_default();
        if let Some(stack) = backtrace {
            body["debug"] = json!({ "stack": stack });
        }

        (status, Json(body)).into_response()
    }
}

pub fn recovery_layer(development: bool) -> CatchPanicLayer<PanicResponder> {
    CatchPanicLayer::custom(PanicResponder::new(development))
}

fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    }
}
