//! Fixed prompts sent by the bootstrap.

/// Minimal request used to prove the credential works.
pub const PROBE_PROMPT: &str = "Say 'API working'";

pub const PROBE_MAX_TOKENS: u32 = 10;

/// Sample proposal analysis used as the end-of-run smoke test.
pub const SAMPLE_ANALYSIS_PROMPT: &str = "\
Analyze this grant proposal summary:
\"We are applying for an environmental grant to develop solar panel recycling technology.\"

Compare with environmental grants and provide:
1. Success probability (0-100%)
2. Key strengths
3. Areas for improvement
";

pub const SAMPLE_ANALYSIS_MAX_TOKENS: u32 = 200;
