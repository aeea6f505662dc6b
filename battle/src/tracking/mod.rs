mod collator;

pub use collator::Collator;
