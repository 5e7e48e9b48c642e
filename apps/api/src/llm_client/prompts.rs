// Cross-cutting prompt fragments shared by every LLM caller.
// Feature-specific prompts live next to the feature (see analysis/prompts.rs).

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "Always respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Adjudication principles the model must apply to every finding.
pub const ADJUDICATION_PRINCIPLES: &str = "\
    Apply the benefit-of-the-doubt doctrine throughout: when the evidence is in \
    approximate balance, resolve the question in the Veteran's favor. \
    Apply maximization principles to every rating and cite the specific 38 CFR \
    section and diagnostic code for each finding.";
