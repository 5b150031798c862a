pub mod correlation;
pub mod inference;
pub mod queries;
pub mod report;
pub mod source_scan;

pub use correlation::{correlate, correlate_with};
pub use inference::{infer_emissions, SimilarityConfig};
pub use queries::{
    address_filter, generate_analytical_queries, generate_analytical_queries_with,
    generate_exploration_queries, generate_exploration_queries_with, QueryLimits,
};
pub use report::{ContractReport, EmissionStatus, FunctionEmission, ReportConfig};
pub use source_scan::{parse_emissions, scan_functions, SourceFunction};
