pub mod import;
pub mod canonical;
pub mod analysis;
pub mod report;
pub mod diagnostic; // Stage prompt/output dump (FINSIGHT_DUMP_DIR or --dump-dir)
pub mod processor;
