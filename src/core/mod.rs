//! Core data types for VCF records and caller sets.
//!
//! - [`Record`](record::Record): one tab-separated data line with positional accessors
//! - [`InfoField`](info::InfoField): key lookup in the INFO micro-language
//! - [`Severity`](effect::Severity), [`Effect`](effect::Effect): SnpEff impact tokens
//! - [`CallerSetKey`](callerset::CallerSetKey): canonical, order-independent caller sets
//!
//! ## INFO column
//!
//! | Key | Meaning | Used by |
//! |-----|---------|---------|
//! | set | Callers that reported the variant (GATK `CombineVariants`) | set-stats |
//! | QD  | Quality by depth | filter, compile |
//! | FS, DP, MQ, MQRankSum, ReadPosRankSum | GATK hard-filter annotations | filter |
//! | ANN / EFF | SnpEff effects | set-stats, compile |

pub mod callerset;
pub mod effect;
pub mod info;
pub mod record;
