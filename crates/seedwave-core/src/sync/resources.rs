//! Logical endpoints tracked by the portal's global sync.

use serde::{Deserialize, Serialize};

/// A resource key and the API path it is fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub key: String,
    pub path: String,
}

impl Endpoint {
    pub fn new(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }
}

/// Sector list, brand list, dashboard and admin aggregates.
pub fn default_endpoints() -> Vec<Endpoint> {
    [
        ("sectors", "/api/sectors"),
        ("brands", "/api/brands"),
        ("dashboard-stats", "/api/dashboard/stats"),
        ("system-status", "/api/system-status"),
        ("admin-stats", "/api/admin/stats"),
        ("admin-brands", "/api/admin/brands"),
        ("admin-sector-breakdown", "/api/admin/sector-breakdown"),
        ("complete-sync", "/api/sync/complete"),
    ]
    .into_iter()
    .map(|(key, path)| Endpoint::new(key, path))
    .collect()
}

/// Keys of `endpoints`, in order.
pub fn keys_of(endpoints: &[Endpoint]) -> Vec<String> {
    endpoints.iter().map(|e| e.key.clone()).collect()
}
