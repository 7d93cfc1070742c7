use serde::{Deserialize, Serialize};

/// Qualities searched when a caller does not name any.
pub const DEFAULT_QUALITIES: [&str; 2] = ["smithed", "reconstructed"];

/// Kernel types searched by `searchForKernelsets` when none are named.
pub const ALL_KERNEL_TYPES: [&str; 12] = [
    "ck", "spk", "tspk", "lsk", "mk", "sclk", "iak", "ik", "fk", "dsk", "pck", "ek",
];

pub fn default_qualities() -> Vec<String> {
    DEFAULT_QUALITIES.iter().map(|q| q.to_string()).collect()
}

pub fn all_kernel_types() -> Vec<String> {
    ALL_KERNEL_TYPES.iter().map(|t| t.to_string()).collect()
}

/// Options every engine call carries, regardless of operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KernelSearchOptions {
    /// Always false; this service is itself the web endpoint.
    pub use_web: bool,
    pub search_kernels: bool,
    pub full_kernel_path: bool,
    /// Number of CK kernels to keep, `-1` for all.
    pub limit_ck: i64,
    /// Number of SPK kernels to keep, `-1` for all.
    pub limit_spk: i64,
    /// Additional kernels to furnish before the query runs.
    pub kernel_list: Vec<String>,
}

impl KernelSearchOptions {
    pub const DEFAULT_LIMIT_CK: i64 = -1;
    pub const DEFAULT_LIMIT_SPK: i64 = 1;
}

impl Default for KernelSearchOptions {
    fn default() -> Self {
        Self {
            use_web: false,
            search_kernels: true,
            full_kernel_path: false,
            limit_ck: Self::DEFAULT_LIMIT_CK,
            limit_spk: Self::DEFAULT_LIMIT_SPK,
            kernel_list: Vec::new(),
        }
    }
}
