//! Prompt construction.
//!
//! One fixed instructional template per task. [`build`] is pure and total:
//! the supplied text is treated as opaque, so empty or binary-looking input
//! still yields a well-formed prompt.

use sage_types::TaskKind;

/// Build the prompt for `task` around `text`.
///
/// For most tasks `text` is document content; for snippet generation it is
/// the user's description of the snippet.
#[must_use]
pub fn build(task: &TaskKind, text: &str) -> String {
    match task {
        TaskKind::GenerateDocs => {
            format!("Generate comprehensive documentation for the following code:\n\n{text}")
        }
        TaskKind::AnalyzeBugs => format!(
            "Analyze this code for potential bugs, security issues, and performance problems:\n\n{text}"
        ),
        TaskKind::Suggestions => {
            format!("Provide code suggestions based on the following context:\n\n{text}")
        }
        TaskKind::Refactor => format!(
            "Analyze this code and suggest refactoring improvements. Focus on:\n\
             1. Code organization and structure\n\
             2. Design patterns that could be applied\n\
             3. Reducing code duplication\n\
             4. Improving readability and maintainability\n\
             5. Better naming conventions\n\
             \n\
             Code to analyze:\n{text}"
        ),
        TaskKind::Optimize => format!(
            "Analyze this code for performance optimization opportunities. Focus on:\n\
             1. Time complexity improvements\n\
             2. Memory usage optimization\n\
             3. Resource management\n\
             4. Caching opportunities\n\
             5. Async/await usage optimization\n\
             \n\
             Code to analyze:\n{text}"
        ),
        TaskKind::Snippet { language } => format!(
            "Generate a code snippet in {language} that does the following:\n\
             {text}\n\
             \n\
             Please provide:\n\
             1. The code implementation\n\
             2. Brief explanation of how it works\n\
             3. Example usage"
        ),
        TaskKind::SecurityScan { level } => format!(
            "Perform a {level}-level security vulnerability scan on this code. Focus on:\n\
             1. Common security vulnerabilities (XSS, SQL injection, etc.)\n\
             2. Input validation issues\n\
             3. Authentication and authorization concerns\n\
             4. Data exposure risks\n\
             5. Secure coding practices\n\
             6. Dependencies with known vulnerabilities\n\
             \n\
             Code to analyze:\n{text}"
        ),
        TaskKind::Diagnostics => format!(
            "Analyze this code for potential issues and return them in a structured format:\n\n{text}"
        ),
        TaskKind::Completion => format!(
            "Given this code context, suggest possible method completions:\n\n{text}"
        ),
    }
}
