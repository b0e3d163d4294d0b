//! Cross-cutting helpers shared by the service and server crates.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_serializes_status() {
        let h = types::Health { status: "ok" };
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, r#"{"status":"ok"}"#);
    }
}
