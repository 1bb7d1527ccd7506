//! KeywordInjectionGuard: regex screen for common prompt-injection phrasing.

use regex::RegexSet;

use upset_core::errors::{EngineError, EngineResult};
use upset_core::traits::IInjectionGuard;

const DEFAULT_PATTERNS: &[&str] = &[
    r"(?i)\b(ignore|disregard|forget)\b.{0,30}\b(previous|prior|above|earlier|all)\b.{0,20}\b(instructions?|prompts?|rules)\b",
    r"(?i)\bsystem\s+prompt\b",
    r"(?i)\byou\s+are\s+now\b",
    r"(?i)\b(reveal|show|print|dump|leak)\b.{0,30}\b(prompt|instructions|weights|factors|patterns|internals|config)\b",
    r"(?i)\b(developer|debug|god)\s+mode\b",
    r"(?i)\bjailbreak\b",
    r"(?i)\bpretend\s+(to\s+be|you\s+are)\b",
    r"<\|[^|]*\|>",
];

pub struct KeywordInjectionGuard {
    patterns: RegexSet,
}

impl KeywordInjectionGuard {
    pub fn new() -> EngineResult<Self> {
        Self::with_patterns(DEFAULT_PATTERNS)
    }

    /// Build from custom expressions.
    pub fn with_patterns<S: AsRef<str>>(patterns: &[S]) -> EngineResult<Self> {
        let patterns = RegexSet::new(patterns.iter().map(|p| p.as_ref()))
            .map_err(|e| EngineError::Config(format!("injection guard pattern: {e}")))?;
        Ok(Self { patterns })
    }
}

impl IInjectionGuard for KeywordInjectionGuard {
    fn is_injection(&self, raw_message: &str) -> bool {
        self.patterns.is_match(raw_message)
    }
}
