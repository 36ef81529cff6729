//! Greeting logic, independent of the host

use nifikit_host_api::{HostEnvironment, ImportError, ModuleExports};
use std::collections::BTreeMap;

pub const MODULE: &str = "hello_processor.hello";

const GREETING: &str = "Hello";

/// `Hello` for empty input, `Hello <data>` otherwise, plus `greeting=Hello`
pub fn transform(data: &[u8]) -> (Vec<u8>, BTreeMap<String, String>) {
    let body = if data.is_empty() {
        GREETING.as_bytes().to_vec()
    } else {
        let mut body = Vec::with_capacity(GREETING.len() + 1 + data.len());
        body.extend_from_slice(GREETING.as_bytes());
        body.push(b' ');
        body.extend_from_slice(data);
        body
    };

    let mut attributes = BTreeMap::new();
    attributes.insert("greeting".to_string(), GREETING.to_string());
    (body, attributes)
}

pub fn load(_env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    Ok(ModuleExports::new())
}
