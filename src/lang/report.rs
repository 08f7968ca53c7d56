//! Human-facing rendering of a [`CompileError`]: the offending source line
//! with the column underlined, colored the way a terminal diagnostic
//! usually is. Exists so a host (a REPL, a test runner, a future CLI) can
//! print something more useful than `Display`'s bare message without this
//! crate taking a dependency on any particular host.

use colored::Colorize;

use crate::error::CompileError;

fn position(err: &CompileError) -> Option<(u32, u32)> {
    match err {
        CompileError::Lex { row, col, .. } => Some((*row, *col)),
        CompileError::Parse { row, col, .. } => Some((*row, *col)),
        CompileError::UnsupportedExpr
        | CompileError::UnsupportedCond
        | CompileError::TooManyVariables { .. }
        | CompileError::DisplacementOverflow { .. }
        | CompileError::UndefinedLabel { .. } => None,
    }
}

/// Render `err` against `source`. Lexer/parser errors are shown with the
/// offending line and a caret under the column; code-generator errors
/// (which carry no source position) fall back to the plain message.
pub fn render_error(source: &str, err: &CompileError) -> String {
    let Some((row, col)) = position(err) else {
        return format!("{} {}", "error:".red().bold(), err);
    };

    let line = source.lines().nth((row as usize).saturating_sub(1)).unwrap_or("");
    let caret_pad = " ".repeat((col as usize).saturating_sub(1));
    format!(
        "{} {}\n{} | {}\n{}   {}{}",
        "error:".red().bold(),
        err,
        row.to_string().dimmed(),
        line,
        " ".repeat(row.to_string().len()),
        caret_pad,
        "^".yellow().bold(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_caret_under_the_offending_column() {
        let err = CompileError::Lex {
            message: "unexpected character '@'".into(),
            row: 1,
            col: 7,
        };
        let rendered = render_error("x = 3 @ 4;", &err);
        assert!(rendered.contains("x = 3 @ 4;"));
        assert!(rendered.contains('^'));
    }

    #[test]
    fn positionless_errors_fall_back_to_the_message() {
        let err = CompileError::UnsupportedExpr;
        let rendered = render_error("", &err);
        assert!(rendered.contains("unsupported expression shape"));
    }
}
