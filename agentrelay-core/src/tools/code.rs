use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tool::{ToolError, ToolResult};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CodeSnippetInput {
    /// Programming language, e.g. "Python" or "JavaScript".
    pub language: String,
    /// What the code should do.
    pub purpose: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub language: String,
    pub code: String,
    pub explanation: String,
    pub title: String,
}

pub fn create_code_snippet(input: CodeSnippetInput) -> Result<ToolResult, ToolError> {
    ToolResult::json(generate(&input.language, &input.purpose))
}

pub(crate) fn generate(language: &str, purpose: &str) -> CodeSnippet {
    let is_hello = purpose.to_lowercase().contains("hello");

    let (code, title, explanation) = match language.to_lowercase().as_str() {
        "python" if is_hello => (
            format!(
                "# {purpose}\ndef greet(name=\"World\"):\n    return f\"Hello, {{name}}!\"\n\nprint(greet())"
            ),
            format!("Python Hello World - {purpose}"),
            "A simple Python function that greets users with customizable names.".to_string(),
        ),
        "python" => (
            format!(
                "# {purpose}\ndef example_function():\n    \"\"\"{purpose}\"\"\"\n    result = \"This demonstrates {purpose}\"\n    return result\n\nprint(example_function())"
            ),
            format!("Python Function - {purpose}"),
            format!(
                "A Python function demonstrating {purpose} with proper documentation and return value."
            ),
        ),
        "javascript" | "js" if is_hello => (
            format!(
                "// {purpose}\nfunction greet(name = \"World\") {{\n    return `Hello, ${{name}}!`;\n}}\n\nconsole.log(greet());"
            ),
            format!("JavaScript Hello World - {purpose}"),
            "A JavaScript function using template literals for dynamic greetings.".to_string(),
        ),
        "javascript" | "js" => (
            format!(
                "// {purpose}\nfunction exampleFunction() {{\n    // {purpose}\n    const result = \"This demonstrates {purpose}\";\n    return result;\n}}\n\nconsole.log(exampleFunction());"
            ),
            format!("JavaScript Function - {purpose}"),
            format!("A JavaScript function demonstrating {purpose} with modern ES6 syntax."),
        ),
        _ => (
            format!(
                "// {purpose} in {language}\nfunction example() {{\n    return 'Example for {purpose}';\n}}"
            ),
            format!("{language} Example - {purpose}"),
            format!("A basic {language} function template for {purpose}."),
        ),
    };

    CodeSnippet {
        language: language.to_string(),
        code,
        explanation,
        title,
    }
}
