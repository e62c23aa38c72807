use crate::state::Mode;

/// Wrap the user's text in the instruction template for `mode`.
pub fn build_prompt(mode: Mode, input: &str) -> String {
    match mode {
        Mode::CodeGeneration => format!(
            "Write Approach and Generate Python code for the following request:\n\n{}\n\nInclude comments, test cases, and expected output.",
            input
        ),
        Mode::DebugCode => format!(
            "Debug the following Python code:\n\n{}\n\nEnsure the corrected code runs without errors and explain changes.",
            input
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_generation_prompt() {
        assert_eq!(
            build_prompt(Mode::CodeGeneration, "reverse a list"),
            "Write Approach and Generate Python code for the following request:\n\nreverse a list\n\nInclude comments, test cases, and expected output."
        );
    }

    #[test]
    fn test_debug_prompt_keeps_input_verbatim() {
        let code = "def f(x):\n    return x +\n";
        assert_eq!(
            build_prompt(Mode::DebugCode, code),
            format!(
                "Debug the following Python code:\n\n{}\n\nEnsure the corrected code runs without errors and explain changes.",
                code
            )
        );
    }
}
