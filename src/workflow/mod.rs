pub mod collect;
pub mod record;
pub mod summarize;
