pub const DEFAULT_MAX_DEPTH: usize = 10;
pub const DEFAULT_MIN_SAMPLES_SPLIT: usize = 2;
pub const DEFAULT_MIN_SAMPLES_LEAF: usize = 1;
pub const N_PARAMS: usize = 3;
pub const LEAF_FEATURE_SENTINEL: i64 = -1;
pub const LEAF_THRESHOLD_SENTINEL: f64 = 0.0;
pub const BRANCH_VALUE_SENTINEL: i64 = 0;
