// Modules
pub mod classifier;
pub mod codec;
pub mod constants;
pub mod data;
pub mod errors;
pub mod metrics;
pub mod model;
pub mod node;
pub mod splitter;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use classifier::DecisionTreeClassifier;
pub use data::Matrix;
pub use model::Model;
