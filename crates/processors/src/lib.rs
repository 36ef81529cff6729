//! nifikit processor plugins
//!
//! Each plugin module exposes a `load` function that binds against the host
//! environment and announces the classes it defines. `registry()` maps every
//! module id (as found by conformance discovery under `src/`) to its loader.
//!
//! | module | classes |
//! |---|---|
//! | `demo_processor` | `JsonKeyValueSwap` |
//! | `hello_processor.hello_transform` | `HelloTransform` |
//! | `llm_processor` | `LlmRequestProcessor` (and re-exported `LlmResponse`) |
//! | `llm_processor.llm_response` | `LlmResponse` |

pub mod demo_processor;
pub mod hello_processor;
pub mod llm_processor;
pub mod transport;

pub use demo_processor::JsonKeyValueSwap;
pub use hello_processor::hello_transform::HelloTransform;
pub use llm_processor::{LlmRequestProcessor, LlmResponse};
pub use transport::ReqwestHttpClient;

use nifikit_host_api::ModuleRegistry;

/// Registry of every plugin module in this crate
pub fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry
        .register(demo_processor::MODULE, demo_processor::load)
        .register(demo_processor::swap::MODULE, demo_processor::swap::load)
        .register(hello_processor::hello::MODULE, hello_processor::hello::load)
        .register(
            hello_processor::hello_transform::MODULE,
            hello_processor::hello_transform::load,
        )
        .register(llm_processor::MODULE, llm_processor::load)
        .register(llm_processor::llm_client::MODULE, llm_processor::llm_client::load)
        .register(llm_processor::request::MODULE, llm_processor::request::load)
        .register(
            llm_processor::llm_response::MODULE,
            llm_processor::llm_response::load,
        );
    registry
}

/// First `max_chars` characters of `message`
pub(crate) fn truncate(message: &str, max_chars: usize) -> String {
    message.chars().take(max_chars).collect()
}
