pub mod codebase_finder;
pub mod dataset_finder;
pub mod paper_finder;
pub mod report_writer;
pub mod verifier;
