//! Prompt text for LLM pathway discovery.

/// System prompt for the discovery model.
pub const DISCOVERY_SYSTEM_PROMPT: &str = r#"You are a biochemistry expert.
You must return a valid JSON object with a 'pathways' array.
Each pathway must have 'name', 'description', 'compounds', and 'enzymes' fields.
For compounds, provide the complete list of compounds for the pathway, as many as possible.
You are most interested in plant metabolism and have deep knowledge of plant secondary metabolites.
Prioritize secondary-metabolite pathways."#;

/// User prompt template. `{known_pathways}` and `{count}` are substituted.
const DISCOVERY_USER_TEMPLATE: &str = r#"Currently known pathways: {known_pathways}

Return a JSON object containing {count} metabolic pathway(s) NOT in the above list.
Normally a metabolic pathway involves many metabolites, more than 5.
For compounds, provide as many compounds as possible.

The JSON must have this exact structure:
{
    "pathways": [
        {
            "name": "pathway name",
            "description": "pathway description",
            "compounds": ["compound1", "compound2"],
            "enzymes": ["enzyme1", "enzyme2"]
        }
    ]
}

Always respond with valid JSON only, no other text."#;

/// Render the user prompt for a discovery request.
///
/// `known` is joined with ", "; an empty list renders as `none`.
pub fn discovery_user_prompt(known: &[String], count: usize) -> String {
    let known_pathways = if known.is_empty() {
        "none".to_string()
    } else {
        known.join(", ")
    };

    DISCOVERY_USER_TEMPLATE
        .replace("{known_pathways}", &known_pathways)
        .replace("{count}", &count.to_string())
}
