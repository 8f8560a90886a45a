pub mod branch;
pub mod commit;
pub mod completion;
pub mod cutoff;
pub mod record;
pub mod summary;
